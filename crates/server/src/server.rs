use crate::Lobby;
use crate::session;
use bd_arena::TimerConfig;
use bd_catalog::Catalog;
use std::sync::Arc;
use tokio::net::TcpListener;

/// The TCP front door: binds, accepts, and spawns one session per socket.
pub struct Server {
    lobby: Arc<Lobby>,
}

impl Server {
    pub fn new(catalog: Arc<dyn Catalog>, timers: TimerConfig) -> Self {
        Self {
            lobby: Lobby::new(catalog, timers),
        }
    }

    pub async fn run(&self, host: &str, port: u16) -> anyhow::Result<()> {
        let listener = TcpListener::bind((host, port)).await?;
        self.serve(listener).await
    }

    /// Accept loop over an already-bound listener. Split out so tests can
    /// bind an ephemeral port themselves.
    pub async fn serve(&self, listener: TcpListener) -> anyhow::Result<()> {
        log::info!("[server] listening on {}", listener.local_addr()?);
        loop {
            match listener.accept().await {
                Ok((socket, addr)) => {
                    log::debug!("[server] accepted {}", addr);
                    tokio::spawn(session::run(socket, self.lobby.clone()));
                }
                Err(e) => log::warn!("[server] accept failed: {}", e),
            }
        }
    }
}
