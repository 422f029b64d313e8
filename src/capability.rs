//! Capability identifiers.
//!
//! A [`Capability`] is the stable identifier for one detectable,
//! installable hardware-monitoring feature. It is the key shared by the
//! checksum catalog, the capability detectors, and the strategy registry.
//!
//! Variant order is the strategy evaluation order: batch install, check,
//! and remove walk capabilities in the order declared here, and batch
//! reports sort by it.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// One detectable hardware-monitoring feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Capability {
    /// Broadcom MegaRAID controllers (storcli CLI).
    #[serde(rename = "storcli")]
    StorCli,
    /// Dell PowerEdge RAID controllers (perccli CLI).
    #[serde(rename = "perccli")]
    PercCli,
    /// Broadcom SAS-2 HBA families (sas2ircu).
    #[serde(rename = "sas2ircu")]
    Sas2Ircu,
    /// Broadcom SAS-3 HBA families (sas3ircu).
    #[serde(rename = "sas3ircu")]
    Sas3Ircu,
    /// HPE Smart Array controllers (ssacli).
    #[serde(rename = "ssacli")]
    SsaCli,
    /// IPMI system event log polling.
    #[serde(rename = "ipmi_sel")]
    IpmiSel,
    /// IPMI DCMI power statistics.
    #[serde(rename = "ipmi_dcmi")]
    IpmiDcmi,
    /// IPMI sensor monitoring.
    #[serde(rename = "ipmi_sensor")]
    IpmiSensor,
    /// Redfish BMC HTTP API.
    #[serde(rename = "redfish")]
    Redfish,
    /// Disk S.M.A.R.T. health (smartmontools).
    #[serde(rename = "smartctl")]
    SmartCtl,
    /// NVIDIA GPU telemetry (DCGM snap).
    #[serde(rename = "dcgm")]
    Dcgm,
}

impl Capability {
    /// Every known capability, in evaluation order.
    pub const ALL: [Capability; 11] = [
        Capability::StorCli,
        Capability::PercCli,
        Capability::Sas2Ircu,
        Capability::Sas3Ircu,
        Capability::SsaCli,
        Capability::IpmiSel,
        Capability::IpmiDcmi,
        Capability::IpmiSensor,
        Capability::Redfish,
        Capability::SmartCtl,
        Capability::Dcgm,
    ];

    /// Stable string name, used in reports and on the CLI.
    pub fn name(&self) -> &'static str {
        match self {
            Capability::StorCli => "storcli",
            Capability::PercCli => "perccli",
            Capability::Sas2Ircu => "sas2ircu",
            Capability::Sas3Ircu => "sas3ircu",
            Capability::SsaCli => "ssacli",
            Capability::IpmiSel => "ipmi_sel",
            Capability::IpmiDcmi => "ipmi_dcmi",
            Capability::IpmiSensor => "ipmi_sensor",
            Capability::Redfish => "redfish",
            Capability::SmartCtl => "smartctl",
            Capability::Dcgm => "dcgm",
        }
    }

    /// Resource name of the third-party artifact backing this capability,
    /// or `None` for capabilities installed from OS packages or snaps.
    ///
    /// These binaries cannot be redistributed and must be supplied by the
    /// operator; the orchestrator gates the whole batch on their presence.
    pub fn tpr_resource(&self) -> Option<&'static str> {
        match self {
            Capability::StorCli => Some("storcli-deb"),
            Capability::PercCli => Some("perccli-deb"),
            Capability::Sas2Ircu => Some("sas2ircu-bin"),
            Capability::Sas3Ircu => Some("sas3ircu-bin"),
            _ => None,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Capability {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Capability::ALL
            .iter()
            .find(|c| c.name() == s)
            .copied()
            .ok_or_else(|| format!("unknown capability '{s}'"))
    }
}
