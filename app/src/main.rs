use anyhow::Context;
use tracing::info;

mod command;
mod console;
mod logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = citi_infra::load_config().context("invalid configuration")?;

    // Initialize logger
    logging::init(&config.logging)?;

    info!(
        environment = %config.environment,
        code_length = config.verification.code_length,
        "Starting CiTiApp registration console"
    );

    let services = citi_infra::initialize(&config);
    console::run(&config, services).await
}
