use std::io::{ErrorKind, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing::debug;

use cpustat::config::{load_config, Config};
use cpustat::display::{render, OutputMode};
use cpustat::{collect_summary, CpustatError};

const EXIT_SOURCE: u8 = 1;
const EXIT_USAGE: u8 = 2;
const EXIT_CONFIG: u8 = 3;
const EXIT_OUTPUT: u8 = 4;

/// Fast Linux system hardware parser
#[derive(Parser, Debug)]
#[command(
    name = "cpustat",
    disable_version_flag = true,
    after_help = "Examples:\n  cpustat               # Full output\n  cpustat --short       # Monitoring one-liner\n  cpustat --json        # Structured JSON"
)]
struct Cli {
    /// Emit structured JSON to stdout
    #[arg(long, conflicts_with = "short")]
    json: bool,

    /// Emit a compact one-line summary to stdout
    #[arg(long)]
    short: bool,
}

impl Cli {
    fn mode(&self) -> OutputMode {
        match (self.json, self.short) {
            (true, _) => OutputMode::Json,
            (_, true) => OutputMode::Short,
            _ => OutputMode::Text,
        }
    }
}

fn run(mode: OutputMode, config: &Config) -> Result<String, CpustatError> {
    let sources = config.sources.resolve();
    debug!(?sources, ?mode, "collecting");
    let summary = collect_summary(&sources)?;
    render(&summary, mode, config.display.model_width)
}

fn exit_code_for(error: &CpustatError) -> u8 {
    match error {
        CpustatError::SourceUnavailable { .. }
        | CpustatError::Malformed { .. }
        | CpustatError::Kernel(_) => EXIT_SOURCE,
        CpustatError::Config { .. } => EXIT_CONFIG,
        CpustatError::Render(_) => EXIT_OUTPUT,
    }
}

fn write_stdout(output: &str) -> ExitCode {
    let mut stdout = std::io::stdout().lock();
    match stdout.write_all(output.as_bytes()).and_then(|_| stdout.flush()) {
        Ok(()) => ExitCode::SUCCESS,
        // reader went away, e.g. `cpustat | head -1`
        Err(e) if e.kind() == ErrorKind::BrokenPipe => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("cpustat: cannot write output: {e}");
            ExitCode::from(EXIT_OUTPUT)
        }
    }
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help lands here too and goes to stdout
            let code = if e.use_stderr() { EXIT_USAGE } else { 0 };
            let _ = e.print();
            return ExitCode::from(code);
        }
    };

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("cpustat: {e}");
            return ExitCode::from(EXIT_CONFIG);
        }
    };
    cpustat::logging::init_logging(&config.log);

    match run(cli.mode(), &config) {
        Ok(output) => write_stdout(&output),
        Err(e) => {
            debug!(error = ?e, "run failed");
            eprintln!("cpustat: {e}");
            ExitCode::from(exit_code_for(&e))
        }
    }
}
