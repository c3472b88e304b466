//! Process entry: resolve the configuration, run the gate, and exit with the
//! status mapped from the run's conclusion.

use std::process::ExitCode;

use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use workflow_gate::{config::Config, pipeline};

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!("invalid configuration: {err:#}");
            return ExitCode::FAILURE;
        }
    };

    let client = reqwest::Client::new();
    match pipeline::run(&client, &config).await {
        Ok(conclusion) => {
            info!("workflow {} concluded with {conclusion}", config.workflow);
            ExitCode::from(pipeline::exit_status(&conclusion))
        }
        Err(err) => {
            error!("{err}");
            ExitCode::FAILURE
        }
    }
}
