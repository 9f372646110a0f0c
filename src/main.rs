use predixa::config::ServiceConfig;
use predixa::{logging, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::init();

    info!("Predixa API starting...");

    let config = ServiceConfig::from_env();
    info!(
        "Configuration loaded: model {}, database {}",
        config.model_path.display(),
        config.database.url
    );

    server::serve(config).await?;
    Ok(())
}
