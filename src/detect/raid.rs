//! RAID and HBA controller detection.
//!
//! Two probe sources are unioned: the lshw storage tree and hwinfo storage
//! records. Within a `raid` node the controller's own identity wins over the
//! system vendor's default: a Broadcom MegaRAID card in a Dell chassis needs
//! storcli, not perccli.

use std::collections::{BTreeMap, BTreeSet};

use crate::capability::Capability;
use crate::error::Result;
use crate::inspect::{hwinfo, lshw, LshwNode};
use crate::pkg::Apt;
use crate::shell::CommandRunner;

const VENDOR_BROADCOM: &str = "Broadcom / LSI";
const VENDOR_DELL: &str = "Dell Inc.";
const VENDORS_HP: [&str; 2] = ["HP", "HPE"];

const SAS2_FAMILIES: [&str; 6] = [
    "SAS2004", "SAS2008", "SAS2108", "SAS2208", "SAS2304", "SAS2308",
];
const SAS3_FAMILIES: [&str; 2] = ["SAS3004", "SAS3008"];

const SMART_ARRAY_FAMILIES: [&str; 2] = [
    "Smart Array Gen8 Controllers",
    "Smart Array Gen9 Controllers",
];

/// Adaptec Smart Storage controllers hide from lshw behind the smartpqi
/// driver; hwinfo still names them. A record must carry every marker.
const HWINFO_SMART_STORAGE_MARKERS: [&str; 4] = [
    "Hardware Class: storage",
    "Vendor: pci 0x9005 \"Adaptec\"",
    "Device: pci 0x028f \"Smart Storage PQI 12G SAS/PCIe 3\"",
    "SubDevice: pci 0x1100 \"Smart Array P816i-a SR Gen10\"",
];

/// Detect RAID/HBA capabilities from both probe sources.
pub fn detect(runner: &dyn CommandRunner, apt: &Apt) -> Result<BTreeSet<Capability>> {
    let root = lshw::tree(runner)?;
    let storage = lshw::class(runner, "storage")?;
    let mut found = from_lshw(root.vendor.as_deref(), &storage);

    let blocks = hwinfo::probe(runner, apt, &["storage"])?;
    found.extend(from_hwinfo(&blocks));
    Ok(found)
}

/// Decide capabilities from lshw storage nodes plus the system vendor.
pub fn from_lshw(
    system_vendor: Option<&str>,
    storage: &[LshwNode],
) -> BTreeSet<Capability> {
    let mut found = BTreeSet::new();

    for node in storage {
        let product = node.product.as_deref().unwrap_or("");
        let vendor = node.vendor.as_deref().unwrap_or("");

        if node.id_class() == "sas" && vendor == VENDOR_BROADCOM {
            if SAS3_FAMILIES.iter().any(|family| product.contains(family)) {
                found.insert(Capability::Sas3Ircu);
            }
            if SAS2_FAMILIES.iter().any(|family| product.contains(family)) {
                found.insert(Capability::Sas2Ircu);
            }
        }

        if node.id_class() == "raid" {
            // The card's own identity decides before the chassis vendor's
            // default: MegaRAID hardware wants storcli wherever it sits.
            if vendor == VENDOR_BROADCOM && node.driver() == Some("megaraid_sas") {
                found.insert(Capability::StorCli);
            } else if system_vendor == Some(VENDOR_DELL) {
                found.insert(Capability::PercCli);
            } else if system_vendor.is_some_and(|sv| VENDORS_HP.contains(&sv))
                && SMART_ARRAY_FAMILIES
                    .iter()
                    .any(|family| product.contains(family))
            {
                found.insert(Capability::SsaCli);
            }
        }
    }
    found
}

/// Decide capabilities from hwinfo storage record blocks.
pub fn from_hwinfo(blocks: &BTreeMap<String, String>) -> BTreeSet<Capability> {
    let mut found = BTreeSet::new();
    for block in blocks.values() {
        if HWINFO_SMART_STORAGE_MARKERS
            .iter()
            .all(|marker| block.contains(marker))
        {
            found.insert(Capability::SsaCli);
        }
    }
    found
}
