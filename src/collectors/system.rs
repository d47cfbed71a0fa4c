//! Distribution and kernel identity

use std::ffi::CStr;
use std::io;
use std::path::PathBuf;

use tracing::{debug, info};

use crate::config::Sources;
use crate::data::{DistributionInfo, KernelInfo};
use crate::error::{CpustatError, Result};
use crate::utils::command::{command_exists, run_command};
use crate::utils::file::read_optional;
use crate::utils::parsing::split_assignment;

/// A way of asking the system which distribution it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistributionSource {
    /// The `lsb_release` facility, if installed
    LsbRelease,
    /// An os-release(5) file
    OsRelease(PathBuf),
}

impl DistributionSource {
    fn lookup(&self) -> Option<DistributionInfo> {
        let found = match self {
            DistributionSource::LsbRelease => query_lsb_release(),
            DistributionSource::OsRelease(path) => {
                read_optional(path).map(|text| parse_os_release(&text))
            }
        };
        found.filter(|info| !info.is_empty())
    }
}

/// Tries each source in order; the first that answers wins
#[derive(Debug, Clone)]
pub struct DistributionResolver {
    strategies: Vec<DistributionSource>,
}

impl DistributionResolver {
    pub fn new(strategies: Vec<DistributionSource>) -> Self {
        Self { strategies }
    }

    pub fn from_sources(sources: &Sources) -> Self {
        let mut strategies = Vec::with_capacity(2);
        if sources.lsb_release {
            strategies.push(DistributionSource::LsbRelease);
        }
        strategies.push(DistributionSource::OsRelease(sources.os_release.clone()));
        Self::new(strategies)
    }

    /// Never fails: with no answering source every field stays None
    pub fn resolve(&self) -> DistributionInfo {
        for strategy in &self.strategies {
            if let Some(found) = strategy.lookup() {
                info!(source = ?strategy, "distribution identified");
                return found;
            }
            debug!(source = ?strategy, "distribution source gave no answer");
        }
        DistributionInfo::default()
    }
}

fn non_empty(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty() && value != "n/a").then(|| value.to_string())
}

/// "NAME VERSION" from whichever halves are known
fn compose_pretty(info: &DistributionInfo) -> Option<String> {
    let parts: Vec<&str> = [info.name.as_deref(), info.version.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    (!parts.is_empty()).then(|| parts.join(" "))
}

/// Parse os-release `KEY=VALUE` text
pub fn parse_os_release(text: &str) -> DistributionInfo {
    let mut info = DistributionInfo::default();

    for line in text.lines() {
        let Some((key, value)) = split_assignment(line) else {
            continue;
        };
        match key {
            "NAME" => info.name = non_empty(value),
            "VERSION_ID" => info.version = non_empty(value),
            "PRETTY_NAME" => info.pretty = non_empty(value),
            _ => (),
        }
    }

    if info.pretty.is_none() {
        info.pretty = compose_pretty(&info);
    }
    info
}

fn query_lsb_release() -> Option<DistributionInfo> {
    if !command_exists("lsb_release") {
        debug!("lsb_release not installed");
        return None;
    }

    let ask = |flag: &str| {
        run_command("lsb_release", &["-s", flag])
            .and_then(|out| non_empty(out.trim_matches('"')))
    };

    let mut info = DistributionInfo {
        name: ask("-i"),
        version: ask("-r"),
        pretty: ask("-d"),
    };
    if info.pretty.is_none() {
        info.pretty = compose_pretty(&info);
    }
    Some(info)
}

/// Kernel release and version via uname(2)
pub fn read_kernel_info() -> Result<KernelInfo> {
    // SAFETY: utsname is plain old data and uname fills it with nul-terminated fields
    let uts = unsafe {
        let mut uts: libc::utsname = std::mem::zeroed();
        if libc::uname(&mut uts) != 0 {
            return Err(CpustatError::Kernel(io::Error::last_os_error()));
        }
        uts
    };

    Ok(KernelInfo {
        release: uts_field(&uts.release),
        version: uts_field(&uts.version),
    })
}

fn uts_field(field: &[libc::c_char]) -> String {
    // SAFETY: the kernel terminates every utsname field, and zeroed() covers the rest
    unsafe { CStr::from_ptr(field.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}
