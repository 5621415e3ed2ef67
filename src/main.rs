use clap::Parser;

use carelink_risk::config::ServiceConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::parse();
    carelink_risk::init_tracing();
    carelink_risk::run(config).await?;
    Ok(())
}
