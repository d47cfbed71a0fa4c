//! CPU clock from cpufreq sysfs, falling back to cpuinfo

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::data::FrequencyInfo;
use crate::utils::file::read_int;
use crate::utils::parsing::khz_to_mhz;

/// Pick the cpufreq policy directory: policy0 when present, else the lowest-numbered one
pub fn find_policy(cpu_dir: &Path) -> Option<PathBuf> {
    let cpufreq = cpu_dir.join("cpufreq");

    let policy0 = cpufreq.join("policy0");
    if policy0.is_dir() {
        return Some(policy0);
    }

    let entries = match fs::read_dir(&cpufreq) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %cpufreq.display(), error = %e, "no cpufreq directory");
            return None;
        }
    };

    entries
        .filter_map(|e| e.ok())
        .filter_map(|entry| {
            let name = entry.file_name();
            let id: u64 = name.to_str()?.strip_prefix("policy")?.parse().ok()?;
            entry.path().is_dir().then(|| (id, entry.path()))
        })
        .min_by_key(|(id, _)| *id)
        .map(|(_, path)| path)
}

/// Resolve current/max clock. Never fails: missing data is reported as None.
pub fn resolve_frequency(cpu_dir: &Path, cpuinfo_mhz: Option<f64>) -> FrequencyInfo {
    let mut frequency = FrequencyInfo::default();

    if let Some(policy) = find_policy(cpu_dir) {
        frequency.current_mhz = read_int::<u64, _>(policy.join("scaling_cur_freq")).map(khz_to_mhz);
        frequency.max_mhz = read_int::<u64, _>(policy.join("cpuinfo_max_freq")).map(khz_to_mhz);

        if frequency.current_mhz.is_some() || frequency.max_mhz.is_some() {
            frequency.policy = policy
                .file_name()
                .and_then(|name| name.to_str())
                .map(str::to_string);
        }
    }

    if frequency.current_mhz.is_none() {
        debug!(?cpuinfo_mhz, "current clock from cpuinfo");
        frequency.current_mhz = cpuinfo_mhz;
    }

    info!(
        policy = frequency.policy.as_deref().unwrap_or("none"),
        cur = ?frequency.current_mhz,
        max = ?frequency.max_mhz,
        "cpu frequency"
    );

    frequency
}
