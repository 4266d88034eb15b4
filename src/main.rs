use std::process::ExitCode;

use juno_addrgen::cli;
use juno_addrgen::config::{Config, DEFAULT_LOG_FILTER};
use juno_addrgen::BatchOptions;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("config error: {:#}", e);
            return ExitCode::from(cli::EXIT_USAGE);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_new(&config.log_filter)
                .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let options = BatchOptions::with_parallelism(config.parallelism());

    tracing::debug!(parallelism = options.parallelism, "juno-addrgen starting");

    let code = cli::run(
        std::env::args_os(),
        &options,
        &mut std::io::stdout(),
        &mut std::io::stderr(),
    );
    ExitCode::from(code)
}
