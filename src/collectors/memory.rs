//! /proc/meminfo parsing

use crate::config::Sources;
use crate::error::{CpustatError, Result};
use crate::utils::file::read_source;
use crate::utils::parsing::kib_to_gib;
use std::path::Path;

/// Extract `MemTotal` in kibibytes from meminfo text
pub fn parse_mem_total_kib(text: &str, path: &Path) -> Result<u64> {
    let line = text
        .lines()
        .find(|line| line.starts_with("MemTotal:"))
        .ok_or_else(|| CpustatError::malformed(path, "no MemTotal line"))?;

    // Format: "MemTotal:       16384000 kB"
    let value = line
        .split_ascii_whitespace()
        .nth(1)
        .ok_or_else(|| CpustatError::malformed(path, "MemTotal has no value"))?;

    value
        .parse()
        .map_err(|_| CpustatError::malformed(path, format!("MemTotal is not a number: {value}")))
}

/// Total memory in GiB, full precision
pub fn collect_memory_gib(sources: &Sources) -> Result<f64> {
    let path = sources.meminfo();
    let text = read_source(&path)?;
    let kib = parse_mem_total_kib(&text, &path)?;
    tracing::info!(kib, "memory total");
    Ok(kib_to_gib(kib))
}
