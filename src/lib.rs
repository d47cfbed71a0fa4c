//! cpustat library
//!
//! Reads /proc/cpuinfo, /proc/meminfo, cpufreq sysfs nodes and os-release,
//! and summarizes them as text, a one-line digest, or JSON.

pub mod collectors;
pub mod config;
pub mod data;
pub mod display;
pub mod error;
pub mod logging;
pub mod utils;

pub use config::Sources;
pub use data::{CpuInfo, DistributionInfo, HardwareSummary};
pub use display::OutputMode;
pub use error::{CpustatError, Result};

use collectors::system::{read_kernel_info, DistributionResolver};

/// Collect the whole summary. Only cpuinfo, meminfo and uname can fail the run.
pub fn collect_summary(sources: &Sources) -> Result<HardwareSummary> {
    let cpu = collectors::cpu::collect_cpu_facts(sources)?;
    let memory_gib = collectors::memory::collect_memory_gib(sources)?;
    let kernel = read_kernel_info()?;

    let frequency = collectors::frequency::resolve_frequency(&sources.cpu_dir(), cpu.cpuinfo_mhz);
    let distribution = DistributionResolver::from_sources(sources).resolve();

    Ok(HardwareSummary {
        cpu: cpu.into_cpu_info(frequency),
        memory_gib,
        distribution,
        kernel_release: kernel.release,
        os_version: kernel.version,
    })
}
