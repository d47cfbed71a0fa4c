//! Hardware-specific information structures

use serde::Serialize;

/// CPU identity, topology and clock
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CpuInfo {
    pub vendor: Option<String>,
    pub model: Option<String>,
    /// As reported, unit preserved (e.g. "512 KB")
    pub cache_size: Option<String>,
    pub logical_cores: usize,
    /// Distinct (package, core) pairs, always within 1..=logical_cores
    pub physical_cores: usize,
    #[serde(serialize_with = "super::rounded::one_place_opt")]
    pub frequency_mhz_cur: Option<f64>,
    #[serde(serialize_with = "super::rounded::one_place_opt")]
    pub frequency_mhz_max: Option<f64>,
    /// sysfs policy directory that supplied the clock, None on the cpuinfo fallback
    pub cpufreq_policy: Option<String>,
}

/// Output of the frequency resolver
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrequencyInfo {
    pub current_mhz: Option<f64>,
    pub max_mhz: Option<f64>,
    pub policy: Option<String>,
}
