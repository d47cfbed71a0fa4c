//! Rendering a summary as text, a one-line digest, or JSON

use std::fmt::Write;

use crate::data::{or_unknown, HardwareSummary};
use crate::error::Result;
use crate::utils::parsing::{pad_to_width, truncate_to_width};

/// Selected output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    #[default]
    Text,
    Short,
    Json,
}

pub fn render(summary: &HardwareSummary, mode: OutputMode, model_width: usize) -> Result<String> {
    Ok(match mode {
        OutputMode::Text => render_text(summary),
        OutputMode::Short => render_short(summary, model_width),
        OutputMode::Json => render_json(summary)?,
    })
}

fn mhz_or_unknown(value: Option<f64>) -> String {
    value.map_or_else(|| "Unknown".to_string(), |v| format!("{v:.1}"))
}

/// One labelled line per field
pub fn render_text(summary: &HardwareSummary) -> String {
    let cpu = &summary.cpu;
    let mut out = String::new();

    // writing into a String cannot fail
    let _ = writeln!(out, "Distribution: {}", or_unknown(summary.distribution.pretty.as_deref()));
    let _ = writeln!(out, "Kernel: {}", summary.kernel_release);
    let _ = writeln!(out, "OS Version: {}", summary.os_version);
    let _ = writeln!(out, "CPU Vendor: {}", or_unknown(cpu.vendor.as_deref()));
    let _ = writeln!(out, "CPU Model: {}", or_unknown(cpu.model.as_deref()));
    let _ = writeln!(out, "Logical Cores (threads): {}", cpu.logical_cores);
    let _ = writeln!(out, "Physical Cores: {}", cpu.physical_cores);
    let _ = writeln!(out, "Cache Size: {}", or_unknown(cpu.cache_size.as_deref()));
    let _ = writeln!(
        out,
        "CPU Frequency Current (MHz): {}",
        mhz_or_unknown(cpu.frequency_mhz_cur)
    );
    let _ = writeln!(
        out,
        "CPU Frequency Max (MHz): {}",
        mhz_or_unknown(cpu.frequency_mhz_max)
    );
    if let Some(policy) = &cpu.cpufreq_policy {
        let _ = writeln!(out, "CPUFreq Policy: {policy}");
    }
    let _ = writeln!(out, "Total Memory (GiB): {:.2}", summary.memory_gib);

    out
}

fn short_frequency(cur: Option<f64>, max: Option<f64>) -> String {
    match (cur, max) {
        (Some(cur), Some(max)) => format!("{cur:.0}/{max:.0}MHz"),
        (Some(cur), None) => format!("{cur:.0}MHz"),
        (None, Some(max)) => format!("max{max:.0}MHz"),
        (None, None) => "n/a".to_string(),
    }
}

/// Single monitoring line with fixed columns
pub fn render_short(summary: &HardwareSummary, model_width: usize) -> String {
    let cpu = &summary.cpu;
    let model = cpu.model.as_deref().unwrap_or("Unknown CPU");
    let model = pad_to_width(&truncate_to_width(model, model_width), model_width + 1);
    let memory = format!("{:.1}GiB", summary.memory_gib);

    format!(
        "{} | CPU:{} {}t/{}c | RAM:{:<8} | {}\n",
        or_unknown(summary.distribution.pretty.as_deref()),
        model,
        cpu.logical_cores,
        cpu.physical_cores,
        memory,
        short_frequency(cpu.frequency_mhz_cur, cpu.frequency_mhz_max),
    )
}

/// Pretty JSON with keys sorted at every level
pub fn render_json(summary: &HardwareSummary) -> Result<String> {
    // serde_json's Map is a BTreeMap, so going through Value sorts the keys
    let value = serde_json::to_value(summary)?;
    let mut out = serde_json::to_string_pretty(&value)?;
    out.push('\n');
    Ok(out)
}
