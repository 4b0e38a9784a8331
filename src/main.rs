use std::{process::ExitCode, sync::Arc};

use kinesis_smoke::{Emulator, SmokeConfig, SmokeTest};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = SmokeConfig::from_env();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Smoke test failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(config: SmokeConfig) -> kinesis_smoke::Result<()> {
    let emulator = Emulator::from_config(&config.emulator).await?;
    let client = Arc::new(emulator.connect().await?);
    let report = SmokeTest::new(client, config).run().await?;
    info!(
        "Stream {} active after {} poll(s); {} messages round-tripped",
        report.stream_name,
        report.activation_polls,
        report.received.len()
    );
    Ok(())
}
