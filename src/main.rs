// src/main.rs
use load_planner::config::AppConfig;
use load_planner::{api, logging};
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    let env_result = dotenvy::dotenv();
    logging::init();

    if let Err(err) = env_result {
        if !matches!(err, dotenvy::Error::Io(ref io_err) if io_err.kind() == std::io::ErrorKind::NotFound)
        {
            warn!(error = %err, "Could not load .env");
        }
    }

    let app_config = AppConfig::from_env();
    info!("Load planning service starting");
    api::start_api_server(app_config.api, app_config.optimizer).await;
}
