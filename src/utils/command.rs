//! Command execution utilities

use std::process::Command;
use tracing::debug;

/// Execute a command and return trimmed stdout, None if it cannot run or fails
pub fn run_command(program: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(e) => {
            debug!(program, error = %e, "command could not be spawned");
            return None;
        }
    };

    if output.status.success() {
        Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
    } else {
        debug!(
            program,
            code = ?output.status.code(),
            "command exited unsuccessfully"
        );
        None
    }
}

/// Check if a command exists in PATH
pub fn command_exists(program: &str) -> bool {
    use std::env;

    if let Ok(path) = env::var("PATH") {
        for dir in path.split(':') {
            let full_path = std::path::Path::new(dir).join(program);
            if full_path.is_file() {
                return true;
            }
        }
    }
    false
}
