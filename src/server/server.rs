mod error;
mod routes;
mod server_config;

use std::{path::PathBuf, sync::Arc};

use anyhow::{self, Context};
use clap::Parser;

use teller::{Bank, backend::JsonStore};
use server_config::AppConfig;

const SERVER_CONFIG: &str = "resources/server.toml";

#[derive(Parser, Debug)]
#[clap(version, about)]
struct Cli {
    /// Path to the server configuration file
    #[clap(short, long, value_parser, default_value = SERVER_CONFIG)]
    config: PathBuf
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Cli::parse();

    let config = AppConfig::read(&args.config)?;
    let bank = Arc::new(Bank::start(JsonStore::new(&config.storage.path)));

    let listener = tokio::net::TcpListener::bind(config.server.bind).await
        .with_context(|| format!("failed to bind {}", config.server.bind))?;
    log::info!("serving accounts from {} on {}", config.storage.path.display(), config.server.bind);

    axum::serve(listener, routes::router(bank)).await
        .with_context(|| "server stopped unexpectedly")?;
    return Ok(());
}
