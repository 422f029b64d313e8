//! BMC management capability detection: IPMI probes and the Redfish API.
//!
//! All probes here absorb their failures. A machine without a BMC is
//! ordinary hardware, not an error condition, so every negative outcome is
//! a logged exclusion.

use std::collections::BTreeSet;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::capability::Capability;
use crate::inspect::bmc::bmc_address;
use crate::pkg::Apt;
use crate::settings::Settings;
use crate::shell::{run_ok, CommandRunner};

/// Marker field a conforming Redfish service root carries.
const REDFISH_MARKER: &str = "RedfishVersion";

/// Detect IPMI and Redfish capabilities.
///
/// freeipmi-tools provides the probe commands; if it cannot be installed
/// the IPMI probes are skipped, they do not fail the run.
pub fn detect(
    runner: &dyn CommandRunner,
    apt: &Apt,
    settings: &Settings,
) -> BTreeSet<Capability> {
    let mut found = BTreeSet::new();

    if !apt.installed("freeipmi-tools") {
        if let Err(err) = apt.install_pinned("freeipmi-tools") {
            warn!(%err, "could not install freeipmi-tools, skipping IPMI probes");
            found.extend(redfish(runner, apt, settings));
            return found;
        }
    }

    // Each probe stands alone; a dead SEL does not preclude live sensors.
    if run_ok(runner, "ipmimonitoring", &["--sdr-cache-recreate"]) {
        found.insert(Capability::IpmiSensor);
    } else {
        info!("IPMI sensor monitoring is not available");
    }
    if run_ok(runner, "ipmi-sel", &["--sdr-cache-recreate"]) {
        found.insert(Capability::IpmiSel);
    } else {
        info!("IPMI SEL monitoring is not available");
    }
    if run_ok(runner, "ipmi-dcmi", &["--get-system-power-statistics"]) {
        found.insert(Capability::IpmiDcmi);
    } else {
        info!("IPMI DCMI monitoring is not available");
    }

    found.extend(redfish(runner, apt, settings));
    found
}

fn redfish(
    runner: &dyn CommandRunner,
    apt: &Apt,
    settings: &Settings,
) -> BTreeSet<Capability> {
    let Some(address) = bmc_address(runner, apt) else {
        info!("no BMC address, Redfish is not available");
        return BTreeSet::new();
    };
    let endpoint = format!("https://{address}:443/redfish/v1/");
    if redfish_reachable(&endpoint, settings.redfish_timeout, settings.redfish_retries) {
        BTreeSet::from([Capability::Redfish])
    } else {
        info!("Redfish is not available");
        BTreeSet::new()
    }
}

/// Probe a Redfish service root.
///
/// BMCs ship self-signed certificates, so verification is disabled. A slow
/// BMC gets `retries` extra attempts, but only after a timeout; an HTTP
/// error or malformed body is a definitive no.
pub fn redfish_reachable(endpoint: &str, timeout: Duration, retries: u32) -> bool {
    let client = match reqwest::blocking::Client::builder()
        .danger_accept_invalid_certs(true)
        .timeout(timeout)
        .build()
    {
        Ok(client) => client,
        Err(err) => {
            warn!(%err, "could not build HTTP client for Redfish probe");
            return false;
        }
    };

    for attempt in 0..=retries {
        match client.get(endpoint).send() {
            Ok(response) => {
                if !response.status().is_success() {
                    debug!(endpoint, status = %response.status(), "Redfish probe rejected");
                    return false;
                }
                return match response.json::<serde_json::Value>() {
                    Ok(body) => body.get(REDFISH_MARKER).is_some(),
                    Err(err) => {
                        debug!(endpoint, %err, "Redfish probe returned a non-JSON body");
                        false
                    }
                };
            }
            Err(err) if err.is_timeout() && attempt < retries => {
                debug!(endpoint, attempt, "Redfish probe timed out, retrying");
            }
            Err(err) => {
                debug!(endpoint, %err, "Redfish probe failed");
                return false;
            }
        }
    }
    false
}
