//! Socket-level scenarios against a live server on an ephemeral port.
use bd_arena::ClientMessage;
use bd_arena::ServerMessage;
use bd_arena::TimerConfig;
use bd_catalog::fixtures::FixtureCatalog;
use bd_server::Server;
use bytes::Buf;
use bytes::BytesMut;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tokio::net::TcpStream;
use tokio::time::timeout;

struct TestClient {
    socket: TcpStream,
    buffer: BytesMut,
}

impl TestClient {
    async fn connect(addr: SocketAddr) -> Self {
        Self {
            socket: TcpStream::connect(addr).await.unwrap(),
            buffer: BytesMut::new(),
        }
    }

    async fn send(&mut self, message: &ClientMessage) {
        let payload = serde_json::to_string(message).unwrap();
        self.socket.write_all(payload.as_bytes()).await.unwrap();
    }

    async fn send_frame(&mut self, frame: &str) {
        let line = format!("{}\n", frame);
        self.socket.write_all(line.as_bytes()).await.unwrap();
    }

    async fn recv(&mut self) -> ServerMessage {
        loop {
            let decoded = {
                let mut stream =
                    serde_json::Deserializer::from_slice(&self.buffer).into_iter::<ServerMessage>();
                match stream.next() {
                    Some(Ok(message)) => Some((message, stream.byte_offset())),
                    _ => None,
                }
            };
            if let Some((message, offset)) = decoded {
                self.buffer.advance(offset);
                return message;
            }
            let count = timeout(Duration::from_secs(5), self.socket.read_buf(&mut self.buffer))
                .await
                .expect("timed out waiting for a server message")
                .unwrap();
            assert!(count > 0, "server closed while waiting for a message");
        }
    }

    async fn register(addr: SocketAddr, username: &str) -> Self {
        let mut client = Self::connect(addr).await;
        client
            .send(&ClientMessage::Register {
                username: username.to_string(),
            })
            .await;
        match client.recv().await {
            ServerMessage::Registration { .. } | ServerMessage::Reconnect { .. } => client,
            other => panic!("expected registration, got {:?}", other),
        }
    }
}

async fn start() -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let server = Server::new(Arc::new(FixtureCatalog::standard()), TimerConfig::default());
    tokio::spawn(async move {
        let _ = server.serve(listener).await;
    });
    addr
}

#[tokio::test]
async fn registration_and_player_list() {
    let addr = start().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let _bob = TestClient::register(addr, "bob").await;
    alice
        .send(&ClientMessage::GetPlayers {
            username: "alice".to_string(),
        })
        .await;
    match alice.recv().await {
        ServerMessage::PlayerList { mut players } => {
            players.sort();
            assert_eq!(players, vec!["alice", "bob"]);
        }
        other => panic!("expected player_list, got {:?}", other),
    }
}

#[tokio::test]
async fn self_match_is_rejected_on_the_wire() {
    let addr = start().await;
    let mut alice = TestClient::register(addr, "alice").await;
    alice
        .send(&ClientMessage::Matchmake {
            username: "alice".to_string(),
            opponent: "alice".to_string(),
        })
        .await;
    match alice.recv().await {
        ServerMessage::MatchError { error } => assert_eq!(error, "Cannot match with yourself"),
        other => panic!("expected match_error, got {:?}", other),
    }
}

#[tokio::test]
async fn a_full_duel_turn_then_a_disconnect() {
    let addr = start().await;
    let mut alice = TestClient::register(addr, "alice").await;
    let mut bob = TestClient::register(addr, "bob").await;
    alice
        .send(&ClientMessage::Matchmake {
            username: "alice".to_string(),
            opponent: "bob".to_string(),
        })
        .await;
    match alice.recv().await {
        ServerMessage::MatchStart { opponent } => assert_eq!(opponent, "bob"),
        other => panic!("expected match_start, got {:?}", other),
    }
    match bob.recv().await {
        ServerMessage::MatchStart { opponent } => assert_eq!(opponent, "alice"),
        other => panic!("expected match_start, got {:?}", other),
    }
    for client in [&mut alice, &mut bob] {
        match client.recv().await {
            ServerMessage::GameStart {
                your_squad,
                opponent_squad,
                your_moves,
                ..
            } => {
                assert_eq!(your_squad.len(), 6);
                assert_eq!(opponent_squad.len(), 6);
                assert!(!your_moves.is_empty());
            }
            other => panic!("expected game_start, got {:?}", other),
        }
        match client.recv().await {
            ServerMessage::TurnRequest {
                turn, force_switch, ..
            } => {
                assert_eq!(turn, 1);
                assert!(!force_switch);
            }
            other => panic!("expected turn_request, got {:?}", other),
        }
    }
    alice.send_frame("GAME_ACTION_MARKER|move|1|0").await;
    bob.send_frame("GAME_ACTION_MARKER|move|1|0").await;
    for client in [&mut alice, &mut bob] {
        match client.recv().await {
            ServerMessage::TurnResult {
                description,
                your_squad_state,
                ..
            } => {
                assert!(!description.is_empty());
                assert_eq!(your_squad_state.len(), 6);
            }
            other => panic!("expected turn_result, got {:?}", other),
        }
    }
    // bob walks away mid-duel; alice has already answered turn two
    for client in [&mut alice, &mut bob] {
        match client.recv().await {
            ServerMessage::TurnRequest { turn, .. } => assert_eq!(turn, 2),
            other => panic!("expected turn_request, got {:?}", other),
        }
    }
    alice.send_frame("GAME_ACTION_MARKER|move|1|0").await;
    drop(bob);
    match alice.recv().await {
        ServerMessage::OpponentDisconnected { opponent, .. } => assert_eq!(opponent, "bob"),
        other => panic!("expected opponent_disconnected, got {:?}", other),
    }
}
