//! /proc/cpuinfo parsing and core topology

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::config::Sources;
use crate::data::{CpuInfo, FrequencyInfo};
use crate::error::{CpustatError, Result};
use crate::utils::file::{read_int, read_source};
use crate::utils::parsing::split_colon;

/// (physical package id, core id). sysfs reports -1 for an unknown package.
pub type CorePair = (i64, i64);

/// Everything cpuinfo tells us, before frequency resolution
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CpuFacts {
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub cache_size: Option<String>,
    pub logical_cores: usize,
    pub physical_cores: usize,
    /// `cpu MHz` of the first processor block, the last-resort clock
    pub cpuinfo_mhz: Option<f64>,
}

impl CpuFacts {
    pub fn into_cpu_info(self, frequency: FrequencyInfo) -> CpuInfo {
        CpuInfo {
            vendor: self.vendor,
            model: self.model,
            cache_size: self.cache_size,
            logical_cores: self.logical_cores,
            physical_cores: self.physical_cores,
            frequency_mhz_cur: frequency.current_mhz,
            frequency_mhz_max: frequency.max_mhz,
            cpufreq_policy: frequency.policy,
        }
    }
}

/// Raw result of a single pass over cpuinfo text
#[derive(Debug, Default)]
pub struct Cpuinfo {
    pub vendor: Option<String>,
    pub model: Option<String>,
    pub cache_size: Option<String>,
    pub logical_cores: usize,
    pub core_pairs: HashSet<CorePair>,
    pub first_mhz: Option<f64>,
}

#[derive(Default)]
struct Block {
    processor: bool,
    physical_id: Option<i64>,
    core_id: Option<i64>,
    mhz: Option<f64>,
}

impl Cpuinfo {
    fn finish_block(&mut self, block: &mut Block) {
        let block = std::mem::take(block);
        if !block.processor {
            return;
        }

        self.logical_cores += 1;
        if self.logical_cores == 1 {
            self.first_mhz = block.mhz;
        }
        if let (Some(package), Some(core)) = (block.physical_id, block.core_id) {
            self.core_pairs.insert((package, core));
        }
    }
}

fn first_non_empty(slot: &mut Option<String>, value: &str) {
    if slot.is_none() && !value.is_empty() {
        *slot = Some(value.to_string());
    }
}

/// Parse the text of /proc/cpuinfo in one pass
pub fn parse_cpuinfo(text: &str) -> Cpuinfo {
    let mut info = Cpuinfo::default();
    let mut block = Block::default();

    for line in text.lines() {
        if line.trim().is_empty() {
            info.finish_block(&mut block);
            continue;
        }

        let Some((key, value)) = split_colon(line) else {
            continue;
        };

        match key {
            "processor" => {
                // a processor key without a blank separator still opens a new block
                if block.processor {
                    info.finish_block(&mut block);
                }
                block.processor = true;
            }
            "vendor_id" => first_non_empty(&mut info.vendor, value),
            "model name" => first_non_empty(&mut info.model, value),
            "cache size" => first_non_empty(&mut info.cache_size, value),
            "physical id" => block.physical_id = value.parse().ok(),
            "core id" => block.core_id = value.parse().ok(),
            "cpu MHz" => block.mhz = value.parse().ok(),
            _ => (),
        }
    }
    info.finish_block(&mut block);

    info
}

/// Distinct (physical_package_id, core_id) pairs from the per-CPU sysfs topology
pub fn sysfs_core_pairs(cpu_dir: &Path) -> HashSet<CorePair> {
    let mut pairs = HashSet::new();

    let entries = match fs::read_dir(cpu_dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!(path = %cpu_dir.display(), error = %e, "no sysfs cpu directory");
            return pairs;
        }
    };

    for entry in entries.filter_map(|e| e.ok()) {
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            continue;
        };
        let is_cpu = name
            .strip_prefix("cpu")
            .is_some_and(|id| !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()));
        if !is_cpu {
            continue;
        }

        let topology = entry.path().join("topology");
        let package = read_int::<i64, _>(topology.join("physical_package_id"));
        let core = read_int::<i64, _>(topology.join("core_id"));
        if let (Some(package), Some(core)) = (package, core) {
            pairs.insert((package, core));
        }
    }

    pairs
}

/// Physical core count: cpuinfo pairs, then sysfs pairs, then the thread count
pub fn count_physical_cores(info: &Cpuinfo, cpu_dir: &Path) -> usize {
    let distinct = if !info.core_pairs.is_empty() {
        info.core_pairs.len()
    } else {
        debug!("cpuinfo has no topology fields, trying sysfs");
        let pairs = sysfs_core_pairs(cpu_dir);
        if pairs.is_empty() {
            debug!("no sysfs topology either, assuming one thread per core");
            info.logical_cores
        } else {
            pairs.len()
        }
    };

    distinct.clamp(1, info.logical_cores.max(1))
}

/// Read and parse the mandatory cpuinfo source
pub fn collect_cpu_facts(sources: &Sources) -> Result<CpuFacts> {
    let path = sources.cpuinfo();
    let text = read_source(&path)?;
    let info = parse_cpuinfo(&text);

    if info.logical_cores == 0 {
        return Err(CpustatError::malformed(path, "no processor entries"));
    }

    let physical_cores = count_physical_cores(&info, &sources.cpu_dir());
    info!(
        logical = info.logical_cores,
        physical = physical_cores,
        "cpu topology"
    );

    Ok(CpuFacts {
        vendor: info.vendor,
        model: info.model,
        cache_size: info.cache_size,
        logical_cores: info.logical_cores,
        physical_cores,
        cpuinfo_mhz: info.first_mhz,
    })
}
