//! lshw hardware tree parsing.
//!
//! `lshw -json` yields a single root object on some releases and a
//! one-element list on others; a class-filtered call yields a list of
//! matching nodes but collapses to a bare object when only one matches.
//! Both entry points normalize so callers never see the difference.
//!
//! A failing lshw invocation is fatal: hardware enumeration is the
//! foundation of every capability decision, and a silently empty tree
//! would corrupt all of them.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{HwcapError, Result};
use crate::shell::{check_output, CommandRunner};

/// One node of the lshw hardware tree.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LshwNode {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub class: String,
    #[serde(default)]
    pub vendor: Option<String>,
    #[serde(default)]
    pub product: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub configuration: HashMap<String, serde_json::Value>,
    #[serde(default)]
    pub children: Vec<LshwNode>,
}

impl LshwNode {
    /// The node id's class prefix: lshw suffixes duplicate ids with an
    /// index (`raid:0`, `raid:1`).
    pub fn id_class(&self) -> &str {
        self.id.split(':').next().unwrap_or("")
    }

    /// The bound kernel driver from the configuration map, if any.
    pub fn driver(&self) -> Option<&str> {
        self.configuration.get("driver").and_then(|v| v.as_str())
    }
}

/// Run `lshw -json` and return the machine's root node.
pub fn tree(runner: &dyn CommandRunner) -> Result<LshwNode> {
    let output = check_output(runner, "lshw", &["-json"])?;
    parse_tree(&output)
}

/// Run `lshw -json -c CLASS` and return the matching nodes.
pub fn class(runner: &dyn CommandRunner, class: &str) -> Result<Vec<LshwNode>> {
    let output = check_output(runner, "lshw", &["-json", "-c", class])?;
    parse_class(&output)
}

/// Parse whole-machine output, accepting both the bare-object and
/// one-element-list shapes.
pub fn parse_tree(json: &str) -> Result<LshwNode> {
    let mut nodes = parse(json)?;
    if nodes.is_empty() {
        return Err(invalid("empty hardware tree"));
    }
    Ok(nodes.remove(0))
}

/// Parse class-filtered output, accepting both the list and bare-object
/// shapes. An empty list is a valid answer: no hardware of that class.
pub fn parse_class(json: &str) -> Result<Vec<LshwNode>> {
    parse(json)
}

/// Normalize lshw JSON into a node list. The top level must be an object
/// or a list of objects; anything else is malformed output, never a node.
fn parse(json: &str) -> Result<Vec<LshwNode>> {
    let value: Value =
        serde_json::from_str(json).map_err(|err| invalid(err.to_string()))?;
    match value {
        Value::Object(_) => Ok(vec![node(value)?]),
        Value::Array(items) => items.into_iter().map(node).collect(),
        _ => Err(invalid("expected an object or a list of objects")),
    }
}

fn node(value: Value) -> Result<LshwNode> {
    if !value.is_object() {
        return Err(invalid("expected a hardware node object"));
    }
    serde_json::from_value(value).map_err(|err| invalid(err.to_string()))
}

fn invalid(message: impl Into<String>) -> HwcapError {
    HwcapError::InvalidOutput {
        tool: "lshw".to_string(),
        message: message.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::testing::ScriptedRunner;
    use crate::shell::CommandOutput;

    const ROOT_OBJECT: &str = r#"{
        "id": "machine",
        "class": "system",
        "vendor": "Dell Inc.",
        "product": "PowerEdge R640",
        "children": [
            {"id": "core", "class": "bus", "children": []}
        ]
    }"#;

    const STORAGE_LIST: &str = r#"[
        {
            "id": "raid",
            "class": "storage",
            "vendor": "Broadcom / LSI",
            "product": "MegaRAID SAS-3 3108",
            "configuration": {"driver": "megaraid_sas", "latency": "0"}
        },
        {
            "id": "sas:0",
            "class": "storage",
            "vendor": "Broadcom / LSI",
            "product": "SAS3008 PCI-Express Fusion-MPT SAS-3"
        }
    ]"#;

    #[test]
    fn parses_bare_root_object() {
        let root = parse_tree(ROOT_OBJECT).unwrap();
        assert_eq!(root.vendor.as_deref(), Some("Dell Inc."));
        assert_eq!(root.children.len(), 1);
    }

    #[test]
    fn parses_root_wrapped_in_list() {
        let wrapped = format!("[{ROOT_OBJECT}]");
        let root = parse_tree(&wrapped).unwrap();
        assert_eq!(root.id, "machine");
    }

    #[test]
    fn parses_class_filtered_list() {
        let nodes = parse_class(STORAGE_LIST).unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0].driver(), Some("megaraid_sas"));
        assert_eq!(nodes[1].id_class(), "sas");
    }

    #[test]
    fn class_filtered_single_object_becomes_one_element_list() {
        let single = r#"{"id": "disk", "class": "disk", "product": "ST4000NM0025"}"#;
        let nodes = parse_class(single).unwrap();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id, "disk");
    }

    #[test]
    fn empty_list_root_is_an_error() {
        assert!(parse_tree("[]").is_err());
    }

    #[test]
    fn empty_class_list_yields_no_nodes() {
        assert!(parse_class("[]").unwrap().is_empty());
    }

    #[test]
    fn non_object_list_element_is_an_error() {
        assert!(parse_class("[42]").is_err());
        assert!(parse_tree("\"machine\"").is_err());
    }

    #[test]
    fn garbage_output_is_a_parse_error() {
        let err = parse_class("not json").unwrap_err();
        assert!(matches!(err, HwcapError::InvalidOutput { .. }));
    }

    #[test]
    fn failing_lshw_invocation_is_fatal() {
        let runner = ScriptedRunner::new().failing("lshw");
        assert!(tree(&runner).is_err());
        assert!(class(&runner, "storage").is_err());
    }

    #[test]
    fn class_invocation_passes_filter() {
        let runner =
            ScriptedRunner::new().with_rule("lshw", CommandOutput::ok(STORAGE_LIST));
        let nodes = class(&runner, "storage").unwrap();
        assert_eq!(nodes.len(), 2);
        assert_eq!(runner.calls_matching("lshw -json -c storage"), 1);
    }

    #[test]
    fn missing_fields_default() {
        let nodes = parse_class(r#"[{"id": "raid"}]"#).unwrap();
        assert!(nodes[0].vendor.is_none());
        assert!(nodes[0].driver().is_none());
    }
}
