//! String parsing utilities

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

const KIB_PER_GIB: f64 = 1_048_576.0; // 1024^2

/// Split a `key<tab>: value` line on its first colon, both sides trimmed
pub fn split_colon(line: &str) -> Option<(&str, &str)> {
    let (key, value) = line.split_once(':')?;
    Some((key.trim(), value.trim()))
}

/// Split an os-release `KEY=VALUE` line, stripping one layer of quotes from the value
pub fn split_assignment(line: &str) -> Option<(&str, &str)> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }

    let (key, value) = line.split_once('=')?;
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .or_else(|| value.strip_prefix('\'').and_then(|v| v.strip_suffix('\'')))
        .unwrap_or(value);

    Some((key.trim(), value))
}

/// Convert kibibytes to gibibytes at full precision
pub fn kib_to_gib(kib: u64) -> f64 {
    kib as f64 / KIB_PER_GIB
}

/// Convert a sysfs kHz reading to MHz
pub fn khz_to_mhz(khz: u64) -> f64 {
    khz as f64 / 1000.0
}

/// Round half away from zero to `decimals` places
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// Cut `text` so it spans at most `max_width` terminal columns, marking the cut with `…`
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if UnicodeWidthStr::width(text) <= max_width {
        return text.to_string();
    }

    let budget = max_width.saturating_sub(1);
    let mut out = String::with_capacity(text.len());
    let mut used = 0;

    for c in text.chars() {
        let w = UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }

    out.push('…');
    out
}

/// Left-align `text` in a column of `width` terminal columns
pub fn pad_to_width(text: &str, width: usize) -> String {
    let used = UnicodeWidthStr::width(text);
    format!("{}{}", text, " ".repeat(width.saturating_sub(used)))
}
