use clap::Parser;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use shareit::config::{get_config, CliArgs};
use shareit::{create_app, db, run_migrations};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from a .env file when present
    dotenv::dotenv().ok();

    let args = CliArgs::parse();

    // Initialize logging, defaulting to debug output in debug mode
    let default_filter = if args.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    let config = get_config(&args);

    // Initialize the database pool and bring the schema up to date
    let pool = Arc::new(db::init_pool(&config.database_url));
    {
        let mut conn = pool.get()?;
        run_migrations(&mut conn);
    }

    let app = create_app(pool);

    info!("Listening on {}", config.bind_address);
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
