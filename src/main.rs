// src/main.rs

use std::sync::Arc;

use clap::Parser;
use sqlx::sqlite::SqlitePoolOptions;
use tracing::{Level, info, warn};
use tracing_subscriber::FmtSubscriber;

use teller::catalog::CatalogStore;
use teller::config::CONFIG;
use teller::dialogue::Orchestrator;
use teller::nlu::{ChatCompletionsClient, LlmNlu};
use teller::products::ProductStore;
use teller::server::{self, AppState};

#[derive(Parser, Debug)]
#[command(name = "teller", about = "Guided financial product advisor service")]
struct Cli {
    /// Bind host (overrides TELLER_HOST)
    #[arg(long)]
    host: Option<String>,

    /// Bind port (overrides TELLER_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Sqlite database URL (overrides TELLER_DATABASE_URL)
    #[arg(long)]
    database_url: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = CONFIG
        .logging
        .level
        .parse::<Level>()
        .unwrap_or(Level::INFO);
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let database_url = cli
        .database_url
        .clone()
        .unwrap_or_else(|| CONFIG.database.url.clone());

    info!("Starting teller advisor");
    info!("Database: {}", database_url);
    info!("NLU model: {}", CONFIG.nlu.model);

    let pool = SqlitePoolOptions::new()
        .max_connections(CONFIG.database.max_connections)
        .connect(&database_url)
        .await?;

    let products = ProductStore::new(pool.clone());
    products.init_schema().await?;

    let catalog = CatalogStore::new(pool.clone());
    catalog.init_schema().await?;
    catalog.ensure_seeds().await?;

    if !CONFIG.nlu.is_configured() {
        warn!("TELLER_NLU_API_KEY is empty; chat turns will fail until it is set");
    }
    let nlu = Arc::new(LlmNlu::new(ChatCompletionsClient::new(&CONFIG.nlu)));

    let orchestrator = Arc::new(Orchestrator::new(
        products.clone(),
        catalog,
        nlu,
        CONFIG.advisor.scoring,
        CONFIG.advisor.ask,
        CONFIG.advisor.pool,
    ));

    let state = AppState::new(orchestrator, products);

    let host = cli.host.clone().unwrap_or_else(|| CONFIG.server.host.clone());
    let port = cli.port.unwrap_or(CONFIG.server.port);
    let bind_address = format!("{}:{}", host, port);

    server::run(&bind_address, state).await
}
