use answer_gateway::{Gateway, GatewayConfig};

#[tokio::main]
async fn main() {
    // Initialize environment variables and logging
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            log::error!("Invalid configuration: {:#}", e);
            std::process::exit(1);
        }
    };

    let gateway = match Gateway::from_config(config) {
        Ok(gateway) => gateway,
        Err(e) => {
            log::error!("Failed to initialize answer service: {:#}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = gateway.serve().await {
        log::error!("Gateway stopped: {:#}", e);
        std::process::exit(1);
    }
}
