use crate::setup;
use bd_arena::ACTION_BUFFER;
use bd_arena::Duel;
use bd_arena::Outbound;
use bd_arena::ServerMessage;
use bd_arena::SessionControl;
use bd_arena::Side;
use bd_arena::SideHandle;
use bd_arena::TimerConfig;
use bd_catalog::Catalog;
use bd_core::ID;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::sync::RwLock;
use tokio::sync::mpsc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::oneshot;

/// Registry entry for one connected participant.
///
/// Clones share the underlying channels; the liveness flag is written by the
/// session's own tasks and by force-closes, never by readers of the registry.
#[derive(Clone, Debug)]
pub struct SessionHandle {
    pub username: String,
    pub outbox: UnboundedSender<Outbound>,
    pub control: UnboundedSender<SessionControl>,
    pub connected: Arc<AtomicBool>,
}

impl SessionHandle {
    /// Sends one message, tolerating a session that is already gone.
    pub fn send(&self, message: ServerMessage) {
        let _ = self.outbox.send(Outbound::Message(message));
    }
    /// Asks the writer task to shut the socket down.
    pub fn close(&self) {
        let _ = self.outbox.send(Outbound::Close);
        self.connected.store(false, Ordering::SeqCst);
    }
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
    fn side_handle(&self) -> SideHandle {
        SideHandle {
            username: self.username.clone(),
            outbox: self.outbox.clone(),
            connected: self.connected.clone(),
        }
    }
}

#[derive(Default)]
struct Registry {
    sessions: HashMap<String, SessionHandle>,
    duels: HashMap<String, ID<Duel>>,
}

/// Process-wide lobby state: named sessions and active duels.
///
/// One reader-writer lock guards both maps, held across every check-and-
/// mutate span so concurrent matchmake calls cannot double-book a player.
/// Created once at server startup and threaded through request handlers.
pub struct Lobby {
    timers: TimerConfig,
    catalog: Arc<dyn Catalog>,
    inner: RwLock<Registry>,
}

impl Lobby {
    pub fn new(catalog: Arc<dyn Catalog>, timers: TimerConfig) -> Arc<Self> {
        Arc::new(Self {
            timers,
            catalog,
            inner: RwLock::new(Registry::default()),
        })
    }

    pub fn timers(&self) -> TimerConfig {
        self.timers
    }

    /// Installs a session under its display name. A live prior session under
    /// the same name is force-closed first and the newcomer is told it
    /// reconnected.
    pub async fn register(&self, handle: SessionHandle) {
        let prior = self
            .inner
            .write()
            .await
            .sessions
            .insert(handle.username.clone(), handle.clone());
        match prior {
            Some(old) if !old.outbox.same_channel(&handle.outbox) => {
                log::info!("[lobby] {} re-registered, closing prior session", handle.username);
                old.close();
                handle.send(ServerMessage::reconnect(&handle.username));
            }
            _ => {
                log::info!("[lobby] {} registered", handle.username);
                handle.send(ServerMessage::registration(&handle.username));
            }
        }
    }

    /// Names of every session with a live connection.
    pub async fn players(&self) -> Vec<String> {
        self.inner
            .read()
            .await
            .sessions
            .values()
            .filter(|s| s.is_connected())
            .map(|s| s.username.clone())
            .collect()
    }

    pub async fn in_duel(&self, username: &str) -> bool {
        self.inner.read().await.duels.contains_key(username)
    }

    /// Removes the session entry, but only if it still belongs to this
    /// handle; a replacement session under the same name stays.
    pub async fn disconnect(&self, handle: &SessionHandle) {
        let mut registry = self.inner.write().await;
        if let Some(current) = registry.sessions.get(&handle.username) {
            if current.outbox.same_channel(&handle.outbox) {
                registry.sessions.remove(&handle.username);
                log::info!("[lobby] {} disconnected", handle.username);
            }
        }
    }

    /// Pairs the caller with a named opponent and launches the duel.
    ///
    /// All checks and both duel-map inserts happen under one write-lock span;
    /// rejections reply `match_error` and leave no state behind.
    pub async fn matchmake(self: &Arc<Self>, caller: &SessionHandle, username: &str, opponent: &str) {
        let paired = {
            let mut registry = self.inner.write().await;
            match Self::pairing(&registry, username, opponent) {
                Err(error) => Err(error),
                Ok((a, b)) => {
                    let id = ID::default();
                    registry.duels.insert(username.to_string(), id);
                    registry.duels.insert(opponent.to_string(), id);
                    Ok((a, b))
                }
            }
        };
        match paired {
            Err(error) => {
                log::info!("[lobby] matchmake {} vs {}: {}", username, opponent, error);
                caller.send(ServerMessage::match_error(error));
            }
            Ok((a, b)) => {
                log::info!("[lobby] match made: {} vs {}", a.username, b.username);
                a.send(ServerMessage::match_start(&b.username));
                b.send(ServerMessage::match_start(&a.username));
                let lobby = self.clone();
                tokio::spawn(async move { lobby.launch(a, b).await });
            }
        }
    }

    fn pairing(
        registry: &Registry,
        username: &str,
        opponent: &str,
    ) -> Result<(SessionHandle, SessionHandle), String> {
        if username == opponent {
            return Err("Cannot match with yourself".to_string());
        }
        let caller = registry
            .sessions
            .get(username)
            .cloned()
            .ok_or_else(|| "You are not registered".to_string())?;
        let other = registry
            .sessions
            .get(opponent)
            .cloned()
            .ok_or_else(|| "Opponent not found".to_string())?;
        if registry.duels.contains_key(username) {
            return Err("You are already in a battle".to_string());
        }
        if registry.duels.contains_key(opponent) {
            return Err("Opponent is already in a battle".to_string());
        }
        if !other.is_connected() {
            return Err("Opponent is not connected".to_string());
        }
        Ok((caller, other))
    }

    /// Builds both squads, flips both readers into duel routing, and runs
    /// the coordinator. Cleanup runs on every exit path via the done signal.
    async fn launch(self: Arc<Self>, a: SessionHandle, b: SessionHandle) {
        let squads = setup::build_squads(self.catalog.as_ref()).await;
        let (squad_a, squad_b) = match squads {
            Ok(squads) => squads,
            Err(e) => {
                log::warn!("[lobby] setup failed for {} vs {}: {}", a.username, b.username, e);
                a.send(ServerMessage::match_error("Failed to assemble squads"));
                b.send(ServerMessage::match_error("Failed to assemble squads"));
                return self.clear_duel(&a, &b).await;
            }
        };
        a.send(setup::game_start(&squad_a, &squad_b));
        b.send(setup::game_start(&squad_b, &squad_a));
        let (actions_a, duel_a) = mpsc::channel(ACTION_BUFFER);
        let (actions_b, duel_b) = mpsc::channel(ACTION_BUFFER);
        let _ = a.control.send(SessionControl::DuelStarted(actions_a));
        let _ = b.control.send(SessionControl::DuelStarted(actions_b));
        let duel = Duel::new(
            [
                Side::new(a.side_handle(), duel_a, squad_a),
                Side::new(b.side_handle(), duel_b, squad_b),
            ],
            self.timers,
        );
        let (done_tx, done_rx) = oneshot::channel();
        tokio::spawn(duel.run(done_tx));
        let _ = done_rx.await;
        self.clear_duel(&a, &b).await;
    }

    /// Deletes both duel entries and returns both readers to lobby routing.
    async fn clear_duel(&self, a: &SessionHandle, b: &SessionHandle) {
        {
            let mut registry = self.inner.write().await;
            registry.duels.remove(&a.username);
            registry.duels.remove(&b.username);
        }
        let _ = a.control.send(SessionControl::DuelEnded);
        let _ = b.control.send(SessionControl::DuelEnded);
        log::info!("[lobby] duel {} vs {} cleaned up", a.username, b.username);
    }
}
