//! BMC LAN configuration via ipmitool.
//!
//! The only question asked here is "what address does the BMC answer on",
//! which feeds the Redfish probe. A machine without a BMC, or one whose BMC
//! has no LAN channel, simply yields no address; that is ordinary and never
//! an error.

use tracing::debug;

use crate::pkg::Apt;
use crate::shell::CommandRunner;

/// The BMC's LAN IP address, if the machine exposes one.
///
/// Installs ipmitool on demand. Any failure along the way (no apt candidate,
/// no IPMI device, unconfigured LAN channel) yields `None`.
pub fn bmc_address(runner: &dyn CommandRunner, apt: &Apt) -> Option<String> {
    if !apt.installed("ipmitool") {
        if let Err(err) = apt.install_pinned("ipmitool") {
            debug!(%err, "could not install ipmitool, assuming no BMC");
            return None;
        }
    }
    let output = match runner.run("ipmitool", &["lan", "print"]) {
        Ok(output) if output.success => output.stdout,
        Ok(output) => {
            debug!(stderr = %output.stderr.trim(), "ipmitool lan print failed");
            return None;
        }
        Err(err) => {
            debug!(%err, "ipmitool unavailable");
            return None;
        }
    };
    parse_lan_field(&output, "IP Address")
}

/// Pull one `Key : Value` field out of `ipmitool lan print` output.
///
/// ipmitool pads field names, so both sides are trimmed. Returns `None` for
/// an absent field or an empty value.
pub fn parse_lan_field(output: &str, field: &str) -> Option<String> {
    for line in output.lines() {
        if let Some((key, value)) = line.split_once(':') {
            if key.trim() == field {
                let value = value.trim();
                if value.is_empty() {
                    return None;
                }
                return Some(value.to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::testing::ScriptedRunner;
    use crate::shell::CommandOutput;

    const LAN_PRINT: &str = "\
Set in Progress         : Set Complete
IP Address Source       : DHCP Address
IP Address              : 10.30.5.12
Subnet Mask             : 255.255.255.0
MAC Address             : ac:1f:6b:aa:bb:cc
";

    #[test]
    fn extracts_ip_address_field() {
        assert_eq!(
            parse_lan_field(LAN_PRINT, "IP Address").as_deref(),
            Some("10.30.5.12")
        );
    }

    #[test]
    fn field_name_must_match_exactly_after_trim() {
        // "IP Address Source" must not satisfy a lookup for "IP Address".
        let output = "IP Address Source       : Static Address\n";
        assert_eq!(parse_lan_field(output, "IP Address"), None);
    }

    #[test]
    fn empty_value_is_none() {
        let output = "IP Address              :\n";
        assert_eq!(parse_lan_field(output, "IP Address"), None);
    }

    #[test]
    fn bmc_address_reads_lan_print() {
        let runner = ScriptedRunner::new()
            .with_rule("dpkg-query", CommandOutput::ok("install ok installed"))
            .with_rule("ipmitool lan print", CommandOutput::ok(LAN_PRINT));
        let apt = Apt::new(&runner, "/");
        assert_eq!(bmc_address(&runner, &apt).as_deref(), Some("10.30.5.12"));
    }

    #[test]
    fn missing_ipmi_device_yields_none() {
        let runner = ScriptedRunner::new()
            .with_rule("dpkg-query", CommandOutput::ok("install ok installed"))
            .with_rule(
                "ipmitool",
                CommandOutput::failed(1, "Could not open device at /dev/ipmi0"),
            );
        let apt = Apt::new(&runner, "/");
        assert_eq!(bmc_address(&runner, &apt), None);
    }

    #[test]
    fn failed_ipmitool_install_yields_none() {
        let runner = ScriptedRunner::new()
            .with_rule("dpkg-query", CommandOutput::failed(1, "not installed"))
            .failing("apt-cache");
        let apt = Apt::new(&runner, "/");
        assert_eq!(bmc_address(&runner, &apt), None);
    }
}
