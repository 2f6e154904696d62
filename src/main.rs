use anyhow::Context;
use shack_o_target::{api, config, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logging();
    tracing::info!("Starting shack-o-target...");

    let config = config::load_config().context("failed to load configuration")?;
    api::server::start_server(config).await
}
