//! Server entry point.

use std::net::TcpListener;

use tracing::info;

use inventory_chat::chat::ChatService;
use inventory_chat::cli::Cli;
use inventory_chat::config::{Config, ConnectionConfig};
use inventory_chat::error::{AppError, Result};
use inventory_chat::{db, llm, logging, startup};

#[actix_web::main]
async fn main() {
    dotenvy::dotenv().ok();
    logging::init();

    if let Err(e) = run().await {
        tracing::error!("{}: {}", e.category(), e.message());
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let cli = Cli::parse_args();

    // Configuration precedence: CLI arguments, then config file, then
    // environment variables.
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(url) = &cli.database_url {
        let mut database = ConnectionConfig::from_connection_string(url)?;
        database.apply_env_defaults();
        config.database = database;
    }
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }
    config.validate()?;

    info!("Database: {}", config.database.display_string());
    let database = db::connect(&config.database).await?;
    database.ping().await?;
    info!("Database connection verified");

    let llm_client = llm::create_client(&config.llm)?;
    info!(
        provider = %config.llm.provider,
        model = %config.llm.model,
        "LLM client ready"
    );

    let service = ChatService::new(
        llm_client,
        database,
        config.llm.provider.clone(),
        config.llm.model.clone(),
    );

    let address = config.server.address();
    let listener = TcpListener::bind(&address)
        .map_err(|e| AppError::internal(format!("Failed to bind {address}: {e}")))?;
    info!("Starting server at {}", address);

    startup::run(listener, service)
        .map_err(|e| AppError::internal(format!("Failed to start server: {e}")))?
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))
}
