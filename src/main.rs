#![forbid(unsafe_code)]

//! `acp-courier` — delegate one task to an ACP agent subprocess.
//!
//! Thin CLI glue around [`acp_courier::acp::execute`]: parses arguments,
//! bootstraps logging, runs one conversation, and writes the accumulated
//! agent output to a file. Exit codes: 0 success, 2 timeout, 3 protocol
//! family (launch/transport/protocol), 4 everything else.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use acp_courier::acp;
use acp_courier::{ClientConfig, ClientError, Result};

#[derive(Debug, Copy, Clone, Eq, PartialEq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "acp-courier", about = "ACP subagent task runner", version, long_about = None)]
struct Cli {
    /// Working directory the agent session operates in.
    cwd: PathBuf,

    /// Task description sent as the session prompt.
    task: String,

    /// File the accumulated agent output is written to.
    #[arg(short, long)]
    output: PathBuf,

    /// Overall execution timeout in seconds.
    #[arg(short, long, default_value_t = 1800)]
    timeout: u64,

    /// Echo every protocol frame to the diagnostic stream.
    #[arg(short, long)]
    verbose: bool,

    /// Optional TOML config overriding the agent command and time budgets.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log output format (text or json).
    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

fn main() -> ExitCode {
    let args = Cli::parse();

    if let Err(err) = init_tracing(args.log_format, args.verbose) {
        eprintln!("failed to initialise logging: {err}");
        return ExitCode::from(4);
    }

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            error!(%err, "failed to build tokio runtime");
            return ExitCode::from(4);
        }
    };

    match runtime.block_on(run(args)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(%err, "subagent task failed");
            exit_code_for(&err)
        }
    }
}

async fn run(args: Cli) -> Result<()> {
    let config = match &args.config {
        Some(path) => ClientConfig::load_from_path(path)?,
        None => ClientConfig::default(),
    };

    let cwd = args
        .cwd
        .canonicalize()
        .map_err(|err| ClientError::Config(format!("invalid working directory: {err}")))?;

    let result =
        acp::execute(&config, &cwd, &args.task, Duration::from_secs(args.timeout)).await?;

    std::fs::write(&args.output, &result.text)
        .map_err(|err| ClientError::Io(format!("failed to write output file: {err}")))?;

    info!(
        responses = result.response_count,
        output_file = %args.output.display(),
        "subagent task completed"
    );
    println!(
        "subagent task completed ({} responses)",
        result.response_count
    );

    Ok(())
}

/// Map the error taxonomy onto the process exit codes callers script against.
fn exit_code_for(err: &ClientError) -> ExitCode {
    match err {
        ClientError::Timeout(_) => ExitCode::from(2),
        ClientError::Launch(_) | ClientError::Transport(_) | ClientError::Protocol(_) => {
            ExitCode::from(3)
        }
        ClientError::Config(_) | ClientError::Io(_) => ExitCode::from(4),
    }
}

fn init_tracing(log_format: LogFormat, verbose: bool) -> Result<()> {
    // stdout carries the completion note; diagnostics go to stderr, and
    // --verbose raises this crate's frame echo to debug.
    let default_filter = if verbose {
        "acp_courier=debug,info"
    } else {
        "info"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let subscriber = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    match log_format {
        LogFormat::Text => subscriber
            .try_init()
            .map_err(|err| ClientError::Config(format!("failed to init tracing: {err}")))?,
        LogFormat::Json => subscriber
            .json()
            .try_init()
            .map_err(|err| ClientError::Config(format!("failed to init tracing: {err}")))?,
    }

    Ok(())
}
