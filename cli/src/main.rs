// src/main.rs

//! `callpy`: call a Python function with integer arguments and print the
//! integer it returns.
//!
//! ```text
//! $ callpy multiply multiply 3 2
//! Result of call: 6
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use py11::{import, print_last_error, Runtime, RuntimeConfig};

#[derive(Parser, Debug)]
#[command(name = "callpy", version, about = "Call a Python function with integer arguments")]
struct Cli {
    /// Runtime options as JSON
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Module to import (searched in the current directory first)
    module: String,

    /// Function within the module
    function: String,

    /// Integer arguments
    #[arg(allow_negative_numbers = true)]
    args: Vec<i64>,
}

fn main() -> ExitCode {
    // Initialize tracing if PY11_LOG is set
    if let Ok(filter) = EnvFilter::try_from_env("PY11_LOG") {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_writer(std::io::stderr)
            .init();
        tracing::debug!("tracing initialized");
    }

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match RuntimeConfig::from_json_file(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("callpy: {err}");
                return ExitCode::FAILURE;
            }
        },
        None => RuntimeConfig::named("callpy"),
    };
    config.argv = std::iter::once(cli.module.clone())
        .chain(cli.args.iter().map(i64::to_string))
        .collect();

    let runtime = match Runtime::with_config(&config) {
        Ok(runtime) => runtime,
        Err(err) => {
            eprintln!("callpy: {err}");
            return ExitCode::FAILURE;
        }
    };

    let status = match call(&cli) {
        Ok(result) => {
            println!("Result of call: {result}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("callpy: {err}");
            if let Err(report) = print_last_error(true) {
                tracing::warn!(%report, "could not print the Python traceback");
            }
            ExitCode::FAILURE
        }
    };

    if let Err(err) = runtime.shutdown() {
        eprintln!("callpy: {err}");
        return ExitCode::FAILURE;
    }
    status
}

/// Import, look up, call. Every handle is dropped before returning.
fn call(cli: &Cli) -> py11::Result<i64> {
    let module = import(&cli.module)?;
    let function = module.attr(&cli.function)?;
    if !function.is_callable() {
        return Err(py11::Error::type_error("not callable").with_detail(cli.function.clone()));
    }
    tracing::debug!(module = %cli.module, function = %cli.function, argc = cli.args.len(), "calling");
    function.call_with(cli.args.iter().copied())?.as_long()
}
