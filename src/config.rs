use serde::Deserialize;
use std::{
    env, fs,
    path::{Path, PathBuf},
};
use dirs::config_dir;

use crate::error::{CpustatError, Result};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "CPUSTAT_CONFIG";

#[derive(Deserialize, Debug, Default, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub sources: SourcesConfig,
    pub display: DisplayConfig,
    pub log: LogConfig,
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SourcesConfig {
    pub proc_root: String,
    pub sys_root: String,
    pub os_release: String,
    pub lsb_release: bool,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            proc_root: "/proc".to_string(),
            sys_root: "/sys".to_string(),
            os_release: "/etc/os-release".to_string(),
            lsb_release: true,
        }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct DisplayConfig {
    /// Column budget for the CPU model in the short format
    pub model_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { model_width: 29 }
    }
}

#[derive(Deserialize, Debug, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct LogConfig {
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Where every input lives. Passed explicitly to the collectors.
#[derive(Debug, Clone, PartialEq)]
pub struct Sources {
    pub proc_root: PathBuf,
    pub sys_root: PathBuf,
    pub os_release: PathBuf,
    pub lsb_release: bool,
}

impl Default for Sources {
    fn default() -> Self {
        SourcesConfig::default().resolve()
    }
}

impl Sources {
    /// A fake filesystem under `root` (proc/, sys/, etc/os-release), with lsb_release off
    pub fn rooted(root: &Path) -> Self {
        Self {
            proc_root: root.join("proc"),
            sys_root: root.join("sys"),
            os_release: root.join("etc/os-release"),
            lsb_release: false,
        }
    }

    pub fn cpuinfo(&self) -> PathBuf {
        self.proc_root.join("cpuinfo")
    }

    pub fn meminfo(&self) -> PathBuf {
        self.proc_root.join("meminfo")
    }

    /// /sys/devices/system/cpu, home of per-CPU topology and cpufreq policies
    pub fn cpu_dir(&self) -> PathBuf {
        self.sys_root.join("devices/system/cpu")
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

impl SourcesConfig {
    pub fn resolve(&self) -> Sources {
        Sources {
            proc_root: expand(&self.proc_root),
            sys_root: expand(&self.sys_root),
            os_release: expand(&self.os_release),
            lsb_release: self.lsb_release,
        }
    }
}

/// $CPUSTAT_CONFIG, else ~/.config/cpustat/config.toml
pub fn config_path() -> Option<PathBuf> {
    match env::var_os(CONFIG_ENV) {
        Some(path) if !path.is_empty() => Some(expand(&path.to_string_lossy())),
        _ => config_dir().map(|p| p.join("cpustat/config.toml")),
    }
}

/// Parse config text; `path` is only used in error messages
pub fn parse_config(text: &str, path: &Path) -> Result<Config> {
    toml::de::from_str(text).map_err(|e| CpustatError::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Load the config file. A missing file means defaults.
pub fn load_config() -> Result<Config> {
    let Some(path) = config_path() else {
        return Ok(Config::default());
    };
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }

    let text = fs::read_to_string(path).map_err(|e| CpustatError::Config {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })?;
    parse_config(&text, path)
}
