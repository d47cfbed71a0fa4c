//! System-wide information structures

use serde::Serialize;

use super::hardware::CpuInfo;

/// Complete summary gathered by cpustat, built once and then only borrowed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HardwareSummary {
    pub cpu: CpuInfo,
    #[serde(serialize_with = "super::rounded::two_places")]
    pub memory_gib: f64,
    pub distribution: DistributionInfo,
    #[serde(rename = "kernel")]
    pub kernel_release: String,
    pub os_version: String,
}

/// Distribution identity
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionInfo {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Human-friendly label such as "Debian GNU/Linux 12 (bookworm)"
    pub pretty: Option<String>,
}

impl DistributionInfo {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.version.is_none() && self.pretty.is_none()
    }
}

/// Kernel release and version strings as reported by uname(2)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelInfo {
    pub release: String,
    pub version: String,
}
