//! Per-connection session tasks.
//!
//! Each accepted socket splits into a reader task and a writer task. The
//! reader owns the routing mode: lobby JSON frames until a duel starts, raw
//! newline-framed action frames while one runs. The writer owns the write
//! half and applies the write deadline to every outbound frame.
use crate::Lobby;
use crate::SessionHandle;
use bd_arena::ClientMessage;
use bd_arena::Outbound;
use bd_arena::ServerMessage;
use bd_arena::SessionControl;
use bytes::Buf;
use bytes::BytesMut;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::Ordering;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio::net::tcp::OwnedReadHalf;
use tokio::net::tcp::OwnedWriteHalf;
use tokio::sync::mpsc;
use tokio::sync::mpsc::Sender;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::timeout;

/// Reader routing mode, transitioned by coordinator-sent control events.
enum Mode {
    Lobby,
    Duel(Sender<String>),
}

/// Runs one connection to completion.
pub async fn run(socket: TcpStream, lobby: Arc<Lobby>) {
    let peer = socket
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    log::debug!("[session {}] connected", peer);
    let (read, write) = socket.into_split();
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let (ctl_tx, ctl_rx) = mpsc::unbounded_channel();
    let connected = Arc::new(AtomicBool::new(true));
    tokio::spawn(write_loop(write, out_rx, lobby.timers().write, connected.clone()));
    read_loop(read, lobby, out_tx, ctl_tx, ctl_rx, connected, peer).await;
}

async fn read_loop(
    mut read: OwnedReadHalf,
    lobby: Arc<Lobby>,
    out_tx: UnboundedSender<Outbound>,
    ctl_tx: UnboundedSender<SessionControl>,
    mut ctl_rx: UnboundedReceiver<SessionControl>,
    connected: Arc<AtomicBool>,
    peer: String,
) {
    let mut buffer = BytesMut::with_capacity(4096);
    let mut mode = Mode::Lobby;
    let mut registered: Option<SessionHandle> = None;
    loop {
        tokio::select! {
            biased;
            control = ctl_rx.recv() => match control {
                Some(SessionControl::DuelStarted(actions)) => {
                    log::debug!("[session {}] entering duel routing", peer);
                    mode = Mode::Duel(actions);
                }
                Some(SessionControl::DuelEnded) => {
                    log::debug!("[session {}] back to lobby routing", peer);
                    mode = Mode::Lobby;
                }
                None => break,
            },
            count = read.read_buf(&mut buffer) => match count {
                Ok(0) => {
                    log::debug!("[session {}] peer closed", peer);
                    break;
                }
                Ok(_) => match &mode {
                    Mode::Lobby => {
                        for message in drain_lobby(&mut buffer) {
                            dispatch(&lobby, &out_tx, &ctl_tx, &connected, &mut registered, message)
                                .await;
                        }
                    }
                    Mode::Duel(actions) => {
                        for line in drain_lines(&mut buffer) {
                            if actions.send(line).await.is_err() {
                                log::debug!("[session {}] duel gone, frame dropped", peer);
                            }
                        }
                    }
                },
                Err(e) => {
                    log::warn!("[session {}] read failed: {}", peer, e);
                    break;
                }
            },
        }
    }
    connected.store(false, Ordering::SeqCst);
    let _ = out_tx.send(Outbound::Close);
    if let Some(handle) = registered {
        lobby.disconnect(&handle).await;
    }
    log::debug!("[session {}] reader done", peer);
}

async fn dispatch(
    lobby: &Arc<Lobby>,
    out_tx: &UnboundedSender<Outbound>,
    ctl_tx: &UnboundedSender<SessionControl>,
    connected: &Arc<AtomicBool>,
    registered: &mut Option<SessionHandle>,
    message: ClientMessage,
) {
    match message {
        ClientMessage::Register { username } => {
            if username.is_empty() {
                log::debug!("[session] register with empty username ignored");
                return;
            }
            let handle = SessionHandle {
                username,
                outbox: out_tx.clone(),
                control: ctl_tx.clone(),
                connected: connected.clone(),
            };
            lobby.register(handle.clone()).await;
            *registered = Some(handle);
        }
        ClientMessage::GetPlayers { .. } => {
            let players = lobby.players().await;
            let _ = out_tx.send(Outbound::Message(ServerMessage::player_list(players)));
        }
        ClientMessage::Matchmake { username, opponent } => {
            let caller = registered.clone().unwrap_or_else(|| SessionHandle {
                username: username.clone(),
                outbox: out_tx.clone(),
                control: ctl_tx.clone(),
                connected: connected.clone(),
            });
            lobby.matchmake(&caller, &username, &opponent).await;
        }
    }
}

async fn write_loop(
    mut write: OwnedWriteHalf,
    mut outbox: UnboundedReceiver<Outbound>,
    deadline: Duration,
    connected: Arc<AtomicBool>,
) {
    while let Some(frame) = outbox.recv().await {
        match frame {
            Outbound::Message(message) => {
                let payload = message.to_json();
                match timeout(deadline, write.write_all(payload.as_bytes())).await {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => {
                        log::warn!("[session] write failed: {}", e);
                        break;
                    }
                    Err(_) => {
                        log::warn!("[session] write deadline exceeded");
                        break;
                    }
                }
            }
            Outbound::Close => break,
        }
    }
    connected.store(false, Ordering::SeqCst);
    let _ = write.shutdown().await;
}

/// Pulls every complete lobby JSON object out of the buffer.
///
/// Objects are written back-to-back with no delimiter, so a streaming
/// deserializer recovers the boundaries. A malformed prefix drops the
/// buffered bytes and keeps the connection; a truncated tail waits for the
/// next read.
pub fn drain_lobby(buffer: &mut BytesMut) -> Vec<ClientMessage> {
    let mut out = Vec::new();
    let mut consumed = 0;
    loop {
        let slice = &buffer[consumed..];
        if slice.iter().all(|b| b.is_ascii_whitespace()) {
            consumed += slice.len();
            break;
        }
        let mut stream = serde_json::Deserializer::from_slice(slice).into_iter::<ClientMessage>();
        match stream.next() {
            Some(Ok(message)) => {
                consumed += stream.byte_offset();
                out.push(message);
            }
            Some(Err(e)) if e.is_eof() => break,
            Some(Err(e)) => {
                log::warn!("[session] dropping malformed lobby frame: {}", e);
                consumed = buffer.len();
                break;
            }
            None => break,
        }
    }
    buffer.advance(consumed);
    out
}

/// Pulls every complete newline-terminated action frame out of the buffer.
pub fn drain_lines(buffer: &mut BytesMut) -> Vec<String> {
    let mut out = Vec::new();
    while let Some(position) = buffer.iter().position(|&b| b == b'\n') {
        let line = buffer.split_to(position + 1);
        let line = String::from_utf8_lossy(&line);
        let line = line.trim();
        if !line.is_empty() {
            out.push(line.to_string());
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn buf(s: &str) -> BytesMut {
        BytesMut::from(s.as_bytes())
    }

    #[test]
    fn two_objects_in_one_read() {
        let mut buffer = buf(
            r#"{"type":"register","message":{"username":"alice"}}{"type":"get_players","message":{"username":"alice"}}"#,
        );
        let messages = drain_lobby(&mut buffer);
        assert_eq!(messages.len(), 2);
        assert!(matches!(messages[0], ClientMessage::Register { .. }));
        assert!(matches!(messages[1], ClientMessage::GetPlayers { .. }));
        assert!(buffer.is_empty());
    }

    #[test]
    fn an_object_split_across_reads() {
        let whole = r#"{"type":"register","message":{"username":"alice"}}"#;
        let (head, tail) = whole.split_at(20);
        let mut buffer = buf(head);
        assert!(drain_lobby(&mut buffer).is_empty());
        buffer.extend_from_slice(tail.as_bytes());
        let messages = drain_lobby(&mut buffer);
        assert_eq!(messages.len(), 1);
        assert!(buffer.is_empty());
    }

    #[test]
    fn garbage_is_dropped_without_messages() {
        let mut buffer = buf("this is not json at all");
        assert!(drain_lobby(&mut buffer).is_empty());
        assert!(buffer.is_empty());
    }

    #[test]
    fn action_lines_split_on_newlines() {
        let mut buffer = buf("GAME_ACTION_MARKER|move|1|0\nSWITCH_ACTION_MARKER|2\nGAME_ACT");
        let lines = drain_lines(&mut buffer);
        assert_eq!(
            lines,
            vec!["GAME_ACTION_MARKER|move|1|0", "SWITCH_ACTION_MARKER|2"]
        );
        // partial frame stays buffered
        assert_eq!(&buffer[..], b"GAME_ACT");
    }
}
