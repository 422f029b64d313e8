//! Trusted version catalog and artifact checksum validation.
//!
//! Third-party RAID tool binaries are supplied by the operator rather than
//! fetched from an archive, so the only trust anchor is this compiled-in
//! table of known-good releases. A candidate artifact is accepted when its
//! SHA-256 digest matches *any* record applicable to the running platform;
//! the catalog is never consulted for "newest", only for membership.
//!
//! Each capability owns its own independent list; lists are never merged.

use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::warn;

use crate::capability::Capability;
use crate::error::Result;
use crate::platform::{Architecture, OsPlatform, UbuntuSeries};

/// Which Ubuntu series a record is trusted on.
#[derive(Debug, Clone, Copy)]
pub enum SeriesSupport {
    /// Trusted on every series.
    All,
    /// Trusted only on the listed series.
    Only(&'static [UbuntuSeries]),
}

/// One trusted release of a third-party tool.
#[derive(Debug, Clone, Copy)]
pub struct VersionRecord {
    pub version: &'static str,
    pub architectures: &'static [Architecture],
    pub series: SeriesSupport,
    /// Hex-encoded SHA-256 of the exact artifact content.
    pub sha256: &'static str,
    /// Vendor download page for this release.
    pub link: &'static str,
    pub description: &'static str,
}

impl VersionRecord {
    /// Whether this record applies to the given platform: architecture must
    /// match exactly, and the record must either cover all series or list
    /// the platform's series.
    pub fn matches(&self, platform: &OsPlatform) -> bool {
        if !self.architectures.contains(&platform.architecture) {
            return false;
        }
        match self.series {
            SeriesSupport::All => true,
            SeriesSupport::Only(series) => platform
                .series
                .is_some_and(|current| series.contains(&current)),
        }
    }
}

/// The per-capability catalog for a TPR-backed capability, `None` for
/// capabilities that carry no operator-supplied artifact.
pub fn catalog_for(capability: Capability) -> Option<&'static [VersionRecord]> {
    match capability {
        Capability::StorCli => Some(STORCLI_CATALOG),
        Capability::PercCli => Some(PERCCLI_CATALOG),
        Capability::Sas2Ircu => Some(SAS2IRCU_CATALOG),
        Capability::Sas3Ircu => Some(SAS3IRCU_CATALOG),
        _ => None,
    }
}

/// Validate an artifact against the platform-applicable records of a catalog.
///
/// Hashes the entire file content exactly once and accepts a match against
/// any applicable record. A mismatch is logged and reported as `Ok(false)`;
/// whether that is fatal is the caller's decision.
pub fn validate_checksum(
    catalog: &[VersionRecord],
    platform: &OsPlatform,
    path: &Path,
) -> Result<bool> {
    let trusted: Vec<&str> = catalog
        .iter()
        .filter(|record| record.matches(platform))
        .map(|record| record.sha256)
        .collect();

    let content = std::fs::read(path)?;
    let digest = hex::encode(Sha256::digest(&content));

    if trusted.iter().any(|sha| *sha == digest) {
        return Ok(true);
    }
    warn!(path = %path.display(), %digest, "checksum validation failed");
    Ok(false)
}

const X86_64: &[Architecture] = &[Architecture::X86_64];
const AARCH64: &[Architecture] = &[Architecture::Aarch64];

pub static STORCLI_CATALOG: &[VersionRecord] = &[
    VersionRecord {
        version: "007.2705.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "45ff0d3c7fc8b77f64de7de7b3698307971546a6be00982934a19ee44f5d91bb",
        link: "https://docs.broadcom.com/docs/1232743397",
        description: "MR 7.27",
    },
    VersionRecord {
        version: "007.2705.0000.0000",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "9c36caacb6b7f956a9f5bcdb3f37d24e4aa8263ce01243b251092a39e5e32e35",
        link: "https://docs.broadcom.com/docs/1232743397",
        description: "MR 7.27 arm64",
    },
    VersionRecord {
        version: "007.2612.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "5ab2c1b608934626817828ced85e4aeaee7dc97fbd6e3f4fed00b13a95a06e14",
        link: "https://docs.broadcom.com/docs/1232743291",
        description: "MR 7.26",
    },
    VersionRecord {
        version: "007.2612.0000.0000",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "d74b4598219fda94f6e045e6b5ea89757bda8d2ff82453afafcc1caad98195aa",
        link: "https://docs.broadcom.com/docs/1232743291",
        description: "MR 7.26 arm64",
    },
    VersionRecord {
        version: "007.2508.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "17c3f5292de6491f1388c9305ba65836730614b6defe17039b427fced2f75e0b",
        link: "https://docs.broadcom.com/docs/1232743203",
        description: "MR 7.25",
    },
    VersionRecord {
        version: "007.2508.0000.0000",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "69122ff45dbb3fa27acecc8da79d22053d35ee780fc43b07b7c6a2e1f70241db",
        link: "https://docs.broadcom.com/docs/1232743203",
        description: "MR 7.25 arm64",
    },
    VersionRecord {
        version: "007.2408.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "8ecf2d46e253e243c5d169adcd84f2701e52e3815913694f074e80af5a98cbab",
        link: "https://docs.broadcom.com/docs/1232743081",
        description: "MR 7.24",
    },
    VersionRecord {
        version: "007.2408.0000.0000",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "d278cd60d7775b877c0b4fc830a2b0659c016e0458130b3a9474903b6fead7cf",
        link: "https://docs.broadcom.com/docs/1232743081",
        description: "MR 7.24 arm64",
    },
    VersionRecord {
        version: "007.2310.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "94cbef2ec2ca58700a49e646a7bded3a49ddab4646a9d5d178bc4ccb2996cb73",
        link: "https://docs.broadcom.com/docs/Unified_storcli_all_os_7.2309.0000.0000.zip",
        description: "MR 7.23",
    },
    VersionRecord {
        version: "007.2310.0000.0000",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "7c97d55c29d127571e5c68f5b47834294286bcdc31b46b74b0fa4fd9a7acc8a8",
        link: "https://docs.broadcom.com/docs/Unified_storcli_all_os_7.2309.0000.0000.zip",
        description: "MR 7.23 arm64",
    },
];

pub static PERCCLI_CATALOG: &[VersionRecord] = &[
    VersionRecord {
        version: "007.2313.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::Only(&[UbuntuSeries::Jammy, UbuntuSeries::Focal]),
        sha256: "043f7d6235cf125072e95d748cb98f5db42965f218de30f6f72f5503a626e4e3",
        link: "https://www.dell.com/support/home/zh-tw/drivers/driversdetails?driverid=tdghn",
        description: "A14",
    },
    VersionRecord {
        version: "007.1623.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::Only(&[
            UbuntuSeries::Focal,
            UbuntuSeries::Bionic,
            UbuntuSeries::Xenial,
        ]),
        sha256: "e46d955241c932023caf63862cd9dacb2b723b7f944340efb0e5afb6a2681e9d",
        link: "https://www.dell.com/support/home/zh-tw/drivers/driversdetails?driverid=j91yg",
        description: "A11",
    },
    VersionRecord {
        version: "007.1420.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::Only(&[
            UbuntuSeries::Focal,
            UbuntuSeries::Bionic,
            UbuntuSeries::Xenial,
        ]),
        sha256: "8a405000ea592e1d2999313ade07609a7abcfa24d1b9b35bb242bb6aff75a6be",
        link: "https://www.dell.com/support/home/zh-tw/drivers/driversdetails?driverid=n65f1",
        description: "A10",
    },
    VersionRecord {
        version: "007.1327.0000.0000",
        architectures: X86_64,
        series: SeriesSupport::Only(&[
            UbuntuSeries::Focal,
            UbuntuSeries::Bionic,
            UbuntuSeries::Xenial,
        ]),
        sha256: "53c8ee43808779f8263c25b3cb975d816d207659684f3c7de1df4bbd2447ead4",
        link: "https://www.dell.com/support/home/zh-tw/drivers/driversdetails?driverid=d6ywp",
        description: "A09",
    },
];

pub static SAS2IRCU_CATALOG: &[VersionRecord] = &[
    VersionRecord {
        version: "20.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "37467826d0b22aad47287efe70bb34e47f475d70e9b1b64cbd63f57607701e73",
        link: "https://docs.broadcom.com/docs/12351735",
        description: "P20, linux_x86",
    },
    VersionRecord {
        version: "19.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "4baaec21865973c0a6da617e37850cc27512715e6ab22df18b1f67d068e5095c",
        link: "https://docs.broadcom.com/docs/12351734",
        description: "P19, linux_x86",
    },
    VersionRecord {
        version: "18.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "b6ed72275066e80ebe9813cd15f1d019eba9daddbd9dfd8ad426da78801f15d8",
        link: "https://docs.broadcom.com/docs/12351733",
        description: "P18, linux_x86",
    },
    VersionRecord {
        version: "17.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "07e9236b99bbe4a3ae6148f8668e1ce0331d83c2fcb0c4841d000454c6200c1f",
        link: "https://docs.broadcom.com/docs/12351732",
        description: "P17, linux_x86",
    },
    VersionRecord {
        version: "16.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "a8653117067847042bb83e7b51f02d8f2db94e91ce95842efea0dffcb655c966",
        link: "https://docs.broadcom.com/docs/12351731",
        description: "P16, linux_x86",
    },
];

pub static SAS3IRCU_CATALOG: &[VersionRecord] = &[
    VersionRecord {
        version: "17.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "7fa299a36254c582cf579d197463d6e59ffa9270b7241d98d0e477f05235be26",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P16.zip",
        description: "P16, linux_x86",
    },
    VersionRecord {
        version: "17.00.00.00",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "0e668f7066b74626671a2e8657ab40e29d7ebd1f4b96afe2e0c5f1732f4e4cec",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P16.zip",
        description: "P16, linux_arm",
    },
    VersionRecord {
        version: "16.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "f150eb37bb332668949a3eccf9636e0e03f874aecd17a39d586082c6be1386bd",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P15.zip",
        description: "P15, linux_x86",
    },
    VersionRecord {
        version: "16.00.00.00",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "654096f29d57cbab021800d1dc96ee0a8f82ee34dae3c60e940dd96fb6a623b5",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P15.zip",
        description: "P15, linux_arm",
    },
    VersionRecord {
        version: "15.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "5825b90964d1950551e5ed5100ddf1141360b0acf8dd3c6ddb4fe5874d6bbabb",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P14.zip",
        description: "P14, linux_x86",
    },
    VersionRecord {
        version: "15.00.00.00",
        architectures: AARCH64,
        series: SeriesSupport::All,
        sha256: "cbd8006de6ea7214e7b8c8a5d68c92e7b482ec404ba222c46fac1e988849502d",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P14.zip",
        description: "P14, linux_arm",
    },
    VersionRecord {
        version: "14.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "1ce45e57efa0a2d8c5c3d61a0950ab7e950a317aff3155fc1831099e19274c32",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P13.zip",
        description: "P13, linux_x86",
    },
    VersionRecord {
        version: "13.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "cb4010a3d2bc4f9b75859a0c599d889f9fb847e4dfc88abf74082a13b9490a59",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P12.zip",
        description: "P12, linux_x86",
    },
    VersionRecord {
        version: "12.00.00.00",
        architectures: X86_64,
        series: SeriesSupport::All,
        sha256: "458d51b030468901fc8a207088070e6ce82db34b181d9190c8f849605f1b9b6d",
        link: "https://docs.broadcom.com/docs/SAS3IRCU_P11.zip",
        description: "P11, linux_x86",
    },
];
