use std::env;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;
use tempfile::TempDir;

const CPUINFO: &str = "\
processor\t: 0
vendor_id\t: AuthenticAMD
model name\t: AMD EPYC 7763 64-Core Processor
cpu MHz\t\t: 2445.406
cache size\t: 512 KB
physical id\t: 0
core id\t\t: 0

processor\t: 1
vendor_id\t: AuthenticAMD
model name\t: AMD EPYC 7763 64-Core Processor
cpu MHz\t\t: 2445.406
cache size\t: 512 KB
physical id\t: 0
core id\t\t: 0

processor\t: 2
vendor_id\t: AuthenticAMD
model name\t: AMD EPYC 7763 64-Core Processor
cpu MHz\t\t: 2445.406
cache size\t: 512 KB
physical id\t: 0
core id\t\t: 1

processor\t: 3
vendor_id\t: AuthenticAMD
model name\t: AMD EPYC 7763 64-Core Processor
cpu MHz\t\t: 2445.406
cache size\t: 512 KB
physical id\t: 0
core id\t\t: 1

";

const MEMINFO: &str = "MemTotal:       31808000 kB\nMemFree:         8000000 kB\n";

const ROCKY_OS_RELEASE: &str =
    "NAME=\"Rocky Linux\"\nVERSION_ID=\"10.0\"\nPRETTY_NAME=\"Rocky Linux 10.0 (Red Quartz)\"\n";

/// A fake root with proc/ and a config pointing everything at it
struct Fixture {
    dir: TempDir,
    bin: Option<PathBuf>,
}

impl Fixture {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("proc")).unwrap();
        fs::create_dir_all(root.join("sys/devices/system/cpu")).unwrap();
        fs::create_dir_all(root.join("etc")).unwrap();
        fs::write(root.join("proc/cpuinfo"), CPUINFO).unwrap();
        fs::write(root.join("proc/meminfo"), MEMINFO).unwrap();

        let config = format!(
            "[sources]\nproc_root = \"{root}/proc\"\nsys_root = \"{root}/sys\"\n\
             os_release = \"{root}/etc/os-release\"\nlsb_release = false\n",
            root = root.display()
        );
        fs::write(root.join("config.toml"), config).unwrap();

        Self { dir, bin: None }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn with_os_release(self, text: &str) -> Self {
        fs::write(self.root().join("etc/os-release"), text).unwrap();
        self
    }

    fn with_policy(self, cur_khz: &str, max_khz: &str) -> Self {
        let policy = self.root().join("sys/devices/system/cpu/cpufreq/policy0");
        fs::create_dir_all(&policy).unwrap();
        fs::write(policy.join("scaling_cur_freq"), cur_khz).unwrap();
        fs::write(policy.join("cpuinfo_max_freq"), max_khz).unwrap();
        self
    }

    /// Install a fake `lsb_release` ahead of the real one and turn the strategy on
    fn with_lsb_release(mut self, script: &str) -> Self {
        let bin = self.root().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let program = bin.join("lsb_release");
        fs::write(&program, format!("#!/bin/sh\n{script}")).unwrap();
        fs::set_permissions(&program, fs::Permissions::from_mode(0o755)).unwrap();

        let config = self.root().join("config.toml");
        let text = fs::read_to_string(&config).unwrap();
        fs::write(&config, text.replace("lsb_release = false", "lsb_release = true")).unwrap();

        self.bin = Some(bin);
        self
    }

    fn run(&self, args: &[&str]) -> Output {
        let mut command = Command::new(env!("CARGO_BIN_EXE_cpustat"));
        command
            .args(args)
            .env("CPUSTAT_CONFIG", self.root().join("config.toml"))
            .env_remove("RUST_LOG");
        if let Some(bin) = &self.bin {
            let path = env::var("PATH").unwrap_or_default();
            command.env("PATH", format!("{}:{path}", bin.display()));
        }
        command.output().unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn text_report() {
    let fixture = Fixture::new()
        .with_os_release(ROCKY_OS_RELEASE)
        .with_policy("2400000\n", "3500000\n");
    let output = fixture.run(&[]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert!(text.contains("Distribution: Rocky Linux 10.0 (Red Quartz)\n"));
    assert!(text.contains("CPU Vendor: AuthenticAMD\n"));
    assert!(text.contains("Logical Cores (threads): 4\n"));
    assert!(text.contains("Physical Cores: 2\n"));
    assert!(text.contains("Cache Size: 512 KB\n"));
    assert!(text.contains("CPU Frequency Current (MHz): 2400.0\n"));
    assert!(text.contains("CPU Frequency Max (MHz): 3500.0\n"));
    assert!(text.contains("CPUFreq Policy: policy0\n"));
    assert!(text.contains("Total Memory (GiB): 30.33\n"));
    assert!(stderr(&output).is_empty());
}

#[test]
fn json_report_round_trips() {
    let fixture = Fixture::new().with_policy("2400000\n", "3500000\n");
    let output = fixture.run(&["--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();

    let cpu = &value["cpu"];
    assert_eq!(cpu["vendor"], "AuthenticAMD");
    assert_eq!(cpu["model"], "AMD EPYC 7763 64-Core Processor");
    assert_eq!(cpu["logical_cores"].as_u64(), Some(4));
    assert_eq!(cpu["physical_cores"].as_u64(), Some(2));
    assert_eq!(cpu["frequency_mhz_cur"].as_f64(), Some(2400.0));
    assert_eq!(cpu["frequency_mhz_max"].as_f64(), Some(3500.0));
    assert_eq!(cpu["cpufreq_policy"], "policy0");
    assert_eq!(value["memory_gib"].as_f64(), Some(30.33));
    assert!(value["kernel"].is_string());
    assert!(value["os_version"].is_string());
}

#[test]
fn missing_optional_sources_still_succeed() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--json"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let value: Value = serde_json::from_str(&stdout(&output)).unwrap();

    assert!(value["distribution"]["name"].is_null());
    assert!(value["distribution"]["version"].is_null());
    assert!(value["distribution"]["pretty"].is_null());
    assert!(value["cpu"]["frequency_mhz_max"].is_null());
    assert!(value["cpu"]["cpufreq_policy"].is_null());
    assert_eq!(value["cpu"]["frequency_mhz_cur"].as_f64(), Some(2445.4));
}

fn distribution(output: &Output) -> Value {
    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(output));
    let value: Value = serde_json::from_str(&stdout(output)).unwrap();
    value["distribution"].clone()
}

#[test]
fn lsb_release_answers_before_os_release() {
    let fixture = Fixture::new()
        .with_os_release(ROCKY_OS_RELEASE)
        .with_lsb_release(
            "case \"$2\" in\n\
             -i) echo Ubuntu ;;\n\
             -r) echo 24.04 ;;\n\
             -d) echo '\"Ubuntu 24.04.1 LTS\"' ;;\n\
             esac\n",
        );
    let distribution = distribution(&fixture.run(&["--json"]));

    assert_eq!(distribution["name"], "Ubuntu");
    assert_eq!(distribution["version"], "24.04");
    assert_eq!(distribution["pretty"], "Ubuntu 24.04.1 LTS");
}

#[test]
fn lsb_release_without_description_composes_pretty() {
    let fixture = Fixture::new().with_lsb_release(
        "case \"$2\" in\n\
         -i) echo Debian ;;\n\
         -r) echo 12 ;;\n\
         -d) echo n/a ;;\n\
         esac\n",
    );
    let distribution = distribution(&fixture.run(&["--json"]));

    assert_eq!(distribution["name"], "Debian");
    assert_eq!(distribution["version"], "12");
    assert_eq!(distribution["pretty"], "Debian 12");
}

#[test]
fn lsb_release_unknown_answers_fall_through_to_os_release() {
    let fixture = Fixture::new()
        .with_os_release(ROCKY_OS_RELEASE)
        .with_lsb_release("echo n/a\n");
    let distribution = distribution(&fixture.run(&["--json"]));

    assert_eq!(distribution["name"], "Rocky Linux");
    assert_eq!(distribution["version"], "10.0");
    assert_eq!(distribution["pretty"], "Rocky Linux 10.0 (Red Quartz)");
}

#[test]
fn short_report_is_one_line() {
    let fixture = Fixture::new().with_os_release("PRETTY_NAME=\"Debian GNU/Linux 12 (bookworm)\"\n");
    let output = fixture.run(&["--short"]);

    assert_eq!(output.status.code(), Some(0), "stderr: {}", stderr(&output));
    let text = stdout(&output);
    assert_eq!(text.lines().count(), 1);
    assert!(text.starts_with("Debian GNU/Linux 12 (bookworm) | CPU:AMD EPYC 7763 64-Core Proces… "));
    assert!(text.contains(" 4t/2c | RAM:30.3GiB  | 2445MHz"));
}

#[test]
fn conflicting_flags_are_a_usage_error() {
    let fixture = Fixture::new();
    let output = fixture.run(&["--json", "--short"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("--short"));
}

#[test]
fn unknown_flag_is_a_usage_error() {
    let output = Fixture::new().run(&["--watch"]);
    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("Usage"));
}

#[test]
fn help_exits_zero() {
    let output = Fixture::new().run(&["--help"]);
    assert_eq!(output.status.code(), Some(0));
    let text = stdout(&output);
    assert!(text.contains("--json"));
    assert!(text.contains("--short"));
}

#[test]
fn missing_cpuinfo_is_fatal() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.root().join("proc/cpuinfo")).unwrap();
    let output = fixture.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("cpuinfo"));
}

#[test]
fn missing_meminfo_is_fatal() {
    let fixture = Fixture::new();
    fs::remove_file(fixture.root().join("proc/meminfo")).unwrap();
    let output = fixture.run(&["--json"]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("meminfo"));
}

#[test]
fn malformed_meminfo_is_fatal() {
    let fixture = Fixture::new();
    fs::write(fixture.root().join("proc/meminfo"), "MemFree: 10 kB\n").unwrap();
    let output = fixture.run(&[]);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("MemTotal"));
}

#[test]
fn broken_config_has_its_own_exit_code() {
    let fixture = Fixture::new();
    fs::write(fixture.root().join("config.toml"), "[sources\n").unwrap();
    let output = fixture.run(&[]);

    assert_eq!(output.status.code(), Some(3));
    assert!(stderr(&output).contains("config error"));
}
