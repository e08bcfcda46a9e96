use bon_aippetit::{serve, ServerConfig, StartupError};
use log::{error, info};

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run().await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    info!("Loading configuration...");
    let config = ServerConfig::load()?;
    config.validate()?;

    serve(&config).await
}
