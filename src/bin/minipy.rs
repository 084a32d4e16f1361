//! Binary entry point for the minipy CLI.
//!
//! ## Usage
//!
//! ```bash
//! # Minimize a tree dump (writes app.min.py)
//! minipy app.json
//!
//! # Every *.json under a directory, plain text only
//! minipy --no-compress dumps/
//!
//! # Back to readable text (writes app.max.py)
//! minipy --unparse app.min.py
//! ```

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};

use minipy::cli::{run, RunOptions};
use minipy::error::{MinipyError, OutputErrorCode};
use minipy::Config;

// ============================================================================
// CLI Structure
// ============================================================================

/// Shrink Python syntax trees to the shortest equivalent source.
#[derive(Parser, Debug)]
#[command(name = "minipy", version, about = "Shortest equivalent Python source")]
struct Cli {
    #[command(flatten)]
    global: GlobalArgs,

    /// Tree dumps (*.json) or directories; with --unparse, minimized files.
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Output paths, one per input file.
    #[arg(long, num_args = 1..)]
    out: Vec<PathBuf>,

    /// Never emit a compressed stub.
    #[arg(long, conflicts_with = "force_compress")]
    no_compress: bool,

    /// Always emit a compressed stub.
    #[arg(long)]
    force_compress: bool,

    /// Restore minimized files instead of minimizing trees.
    #[arg(long)]
    unparse: bool,

    /// Write `<stem>.py` without the .min/.max suffix.
    #[arg(long)]
    no_suffix: bool,
}

/// Global arguments.
#[derive(Parser, Debug)]
struct GlobalArgs {
    /// Configuration file (default: minipy.toml in the current directory).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level for tracing output.
    #[arg(long, global = true, value_enum, default_value = "warn")]
    log_level: LogLevel,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,
}

/// Log level for tracing output.
#[derive(Clone, Copy, Debug, ValueEnum)]
enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn to_tracing_level(self) -> tracing::Level {
        match self {
            LogLevel::Trace => tracing::Level::TRACE,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Error => tracing::Level::ERROR,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.global.log_level, cli.global.log_json);

    match execute(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {}", err);
            ExitCode::from(OutputErrorCode::from(&err).code())
        }
    }
}

/// Initialize tracing subscriber.
fn init_tracing(level: LogLevel, json: bool) {
    use tracing_subscriber::fmt::format::FmtSpan;
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.to_tracing_level().to_string()));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_writer(io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Merge flags into the configuration and run.
fn execute(cli: Cli) -> Result<(), MinipyError> {
    let cwd = std::env::current_dir().map_err(|e| MinipyError::io(".", e))?;
    let mut config = Config::discover(cli.global.config.as_deref(), &cwd)?;
    if cli.no_compress {
        config.minipy.compress = false;
    }
    if cli.force_compress {
        config.minipy.compress = true;
        config.minipy.force_compress = true;
    }

    let options = RunOptions {
        inputs: cli.inputs,
        outputs: cli.out,
        unparse: cli.unparse,
        no_suffix: cli.no_suffix,
        config,
    };
    run(&options, &mut io::stdout().lock())?;
    Ok(())
}
