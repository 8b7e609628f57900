//! beastduel server binary.
//!
//! Binds the duel arena on `host:port` and serves clients over plain TCP.
use bd_arena::TimerConfig;
use bd_catalog::HttpCatalog;
use bd_server::Server;
use clap::Parser;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "beastduel-server", about = "Creature-battle arena server")]
struct Args {
    /// Host to listen on
    #[arg(long, default_value = bd_core::DEFAULT_HOST)]
    host: String,
    /// Port to listen on
    #[arg(long, default_value_t = bd_core::DEFAULT_PORT)]
    port: u16,
    /// Base URL of the creature catalog API
    #[arg(long, default_value = bd_core::CATALOG_BASE_URL)]
    catalog: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    bd_core::log();
    let args = Args::parse();
    tokio::spawn(async {
        let _ = tokio::signal::ctrl_c().await;
        log::warn!("interrupt received, shutting down");
        std::process::exit(0);
    });
    let catalog = Arc::new(HttpCatalog::new(&args.catalog));
    Server::new(catalog, TimerConfig::default())
        .run(&args.host, args.port)
        .await
}
