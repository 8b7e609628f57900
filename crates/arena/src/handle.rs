use super::ServerMessage;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::UnboundedSender;

/// Depth of the bounded per-duel action channel. A well-behaved client has at
/// most one frame in flight per turn.
pub const ACTION_BUFFER: usize = 8;

/// Frames handed to a session's writer task.
#[derive(Clone, Debug)]
pub enum Outbound {
    /// Serialize and send a lobby-framed message.
    Message(ServerMessage),
    /// Shut the socket down and end the writer task.
    Close,
}

/// Routing-mode signals sent to a session's reader task.
///
/// The reader owns its mode: it parses lobby JSON until a duel starts, then
/// forwards raw action frames into the supplied channel until the duel ends.
/// The action channel is re-created for every duel.
#[derive(Clone, Debug)]
pub enum SessionControl {
    DuelStarted(Sender<String>),
    DuelEnded,
}

/// One side of a duel as the coordinator holds it: the write path to the
/// participant and the shared connection-liveness flag. The action receiver
/// travels separately because the coordinator consumes it mutably.
#[derive(Clone, Debug)]
pub struct SideHandle {
    pub username: String,
    pub outbox: UnboundedSender<Outbound>,
    pub connected: Arc<AtomicBool>,
}

impl SideHandle {
    /// Sends one message, tolerating a concurrently-closed session.
    pub fn send(&self, message: ServerMessage) {
        if self.outbox.send(Outbound::Message(message)).is_err() {
            log::debug!("[duel] send to {} dropped: session gone", self.username);
        }
    }
    /// Asks the writer task to close the socket.
    pub fn close(&self) {
        let _ = self.outbox.send(Outbound::Close);
        self.connected.store(false, Ordering::SeqCst);
    }
    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}
