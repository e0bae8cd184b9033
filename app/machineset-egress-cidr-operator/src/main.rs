use std::process::exit;

use config::OperatorConfig;
use controller::main_controller;
use kube::Client;
use log::{error, info};

mod config;
mod controller;
mod helpers;

#[tokio::main]
async fn main() {
    configure_logger();

    info!("Starting up...");

    let config = get_config();
    let client = create_client().await;

    tokio::select! {
        _ = main_controller(client, config) => info!("All watchers have exited!"),
        _ = tokio::signal::ctrl_c() => info!("Exiting..."),
    }
}

async fn create_client() -> Client {
    match Client::try_default().await {
        Ok(client) => client,
        Err(error) => {
            error!("Couldn't create client! {error:?}");
            exit(6)
        }
    }
}

fn get_config() -> OperatorConfig {
    match OperatorConfig::from_env() {
        Ok(config) => config,
        Err(error) => {
            error!("Couldn't load configuration! {error}");
            exit(7)
        }
    }
}

fn configure_logger() {
    env_logger::builder()
        .default_format()
        .format_module_path(false)
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init()
}
