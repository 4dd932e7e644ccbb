//! HTTP server command for the cafe API
//!
//! Opens (or creates) the SQLite database, migrates it and serves all routes.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use cafe_server::db::{create_pool_with_options, migrations, DEFAULT_MAX_CONNECTIONS};
use cafe_server::http::{run_server, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to
    #[arg(long, short = 'b', env = "CAFE_BIND", default_value = "127.0.0.1:5000")]
    pub bind: SocketAddr,

    /// SQLite database URL (file is created if missing)
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite:cafes.db")]
    pub database_url: String,

    /// Maximum pooled database connections
    #[arg(long, default_value_t = DEFAULT_MAX_CONNECTIONS)]
    pub max_connections: u32,

    /// Per-request timeout in seconds
    #[arg(long, default_value_t = 30)]
    pub timeout: u64,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    tracing::info!("Starting cafe server on {}", args.bind);

    let pool = create_pool_with_options(&args.database_url, args.max_connections)
        .await
        .with_context(|| format!("Failed to open database {}", args.database_url))?;

    migrations::run(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(database = %args.database_url, "Database ready");

    let config = ServerConfig {
        bind_addr: args.bind,
        cors_permissive: args.cors_permissive,
        request_timeout: Duration::from_secs(args.timeout),
    };

    // Run server (blocks until shutdown)
    run_server(pool.clone(), config)
        .await
        .context("Server error")?;

    pool.close().await;
    Ok(())
}
