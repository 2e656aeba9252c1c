//! Linea JSON-lines driver
//!
//! Reads one request per line on stdin and writes one response per line on
//! stdout. Logs go to stderr.
//!
//! Methods:
//! - call: invoke a registry function (`function`, `args`, optional `dimension`)
//! - help: documentation for one function, or the full index
//! - list_functions: function summaries, optionally filtered by `category`
//! - ping: liveness check

mod config;
mod protocol;

use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;
use crate::config::Settings;
use crate::protocol::Driver;

const VERSION: &str = env!("CARGO_PKG_VERSION");

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> ExitCode {
    init_logging();

    let settings = match Settings::from_env() {
        Ok(s) => s,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    info!(
        version = VERSION,
        dimension = %settings.dimension,
        precision = settings.precision,
        "linea driver started"
    );

    let driver = Driver::new(linea_matrix::standard_registry(), settings);
    let stdin = io::stdin();
    let mut reader = io::BufReader::new(stdin.lock());

    loop {
        let mut line = String::new();
        match reader.read_line(&mut line) {
            Ok(0) => {
                info!("end of input");
                break;
            }
            Ok(_) => {
                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                debug!(bytes = line.len(), "received");

                let Some(response) = driver.handle_line(line) else {
                    continue;
                };

                let mut stdout = io::stdout().lock();
                if let Err(e) = writeln!(stdout, "{}", response).and_then(|_| stdout.flush()) {
                    error!(error = %e, "failed to write response");
                    return ExitCode::FAILURE;
                }
            }
            Err(e) => {
                error!(error = %e, "failed to read input");
                return ExitCode::FAILURE;
            }
        }
    }

    ExitCode::SUCCESS
}
