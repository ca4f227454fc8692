use std::sync::Arc;

use gitterlogin::config::load_config;
use gitterlogin::startup;
use gitterlogin::utils::logger::init_logging;
use tracing::error;

#[tokio::main]
async fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config.logging);

    if let Err(e) = startup::run(Arc::new(config)).await {
        error!("Server error: {}", e);
        std::process::exit(1);
    }
}
