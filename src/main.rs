use std::io;
use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    // stdout carries the protocol, so diagnostics go to stderr
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    match chess_core::uci::run_uci_loop() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("uci loop failed: {err}");
            ExitCode::FAILURE
        }
    }
}
