// src/main.rs
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use app_env::{config, report};

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let env_config = match config::init() {
        Ok(env_config) => env_config,
        Err(e) => {
            eprintln!("Error reading config file! {}", e);
            return ExitCode::FAILURE;
        }
    };

    let stdout = std::io::stdout();
    if let Err(e) = report::write_report(&mut stdout.lock(), &env_config) {
        tracing::error!("Failed to write config report: {}", e);
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}
