//! hwinfo free-text record parsing.
//!
//! `hwinfo --CLASS` prints one record per device. Records start with a
//! numbered header line (`NN: classname ...`); every following indented
//! line is a property of that same record. The splitter only recognizes a
//! record start when the numeric-header pattern matches at the start of a
//! line, so a property value that happens to contain a `NN:`-like substring
//! never splits a block.
//!
//! Some hwinfo builds prepend a debug section; it is stripped before
//! splitting.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::Result;
use crate::pkg::Apt;
use crate::shell::{check_output, CommandRunner};

static RECORD_HEADER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+: \S").unwrap());

const DEBUG_END_MARKER: &str = "=========== end debug info ============";

/// Probe one or more hardware classes with hwinfo, returning record blocks
/// keyed by their header line. The hwinfo package is installed on demand;
/// a failing probe invocation propagates, like lshw.
pub fn probe(
    runner: &dyn CommandRunner,
    apt: &Apt,
    classes: &[&str],
) -> Result<BTreeMap<String, String>> {
    if !apt.installed("hwinfo") {
        apt.install_pinned("hwinfo")?;
    }
    let flags: Vec<String> = classes.iter().map(|class| format!("--{class}")).collect();
    let args: Vec<&str> = flags.iter().map(String::as_str).collect();
    let output = check_output(runner, "hwinfo", &args)?;
    Ok(parse_blocks(&output))
}

/// Split hwinfo output into record blocks keyed by header line.
pub fn parse_blocks(output: &str) -> BTreeMap<String, String> {
    let output = strip_debug_preamble(output);

    let mut blocks = BTreeMap::new();
    let mut current_header: Option<String> = None;
    let mut current_lines: Vec<&str> = Vec::new();

    for line in output.lines() {
        if RECORD_HEADER.is_match(line) {
            if let Some(header) = current_header.take() {
                blocks.insert(header, current_lines.join("\n"));
            }
            current_header = Some(line.trim().to_string());
            current_lines = vec![line];
        } else if current_header.is_some() {
            current_lines.push(line);
        }
        // Lines before the first header (banner noise) are dropped.
    }
    if let Some(header) = current_header {
        blocks.insert(header, current_lines.join("\n"));
    }
    blocks
}

/// Drop the leading debug section emitted by some hwinfo builds.
fn strip_debug_preamble(output: &str) -> &str {
    let first_line = output.lines().next().unwrap_or("");
    if first_line.contains("start debug info") {
        if let Some(index) = output.find(DEBUG_END_MARKER) {
            return &output[index + DEBUG_END_MARKER.len()..];
        }
    }
    output
}
