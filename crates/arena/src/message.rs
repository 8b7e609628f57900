use super::MovePp;
use super::SlotState;
use bd_core::TurnNumber;
use serde::Deserialize;
use serde::Serialize;

/// End-of-duel result from one side's perspective.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Win,
    Lose,
    Draw,
}

impl Outcome {
    /// The same result seen from the other side.
    pub fn flipped(self) -> Self {
        match self {
            Self::Win => Self::Lose,
            Self::Lose => Self::Win,
            Self::Draw => Self::Draw,
        }
    }
    /// Closing line sent along with `game_end`.
    pub fn farewell(self) -> &'static str {
        match self {
            Self::Win => "You won the battle!",
            Self::Lose => "You lost the battle!",
            Self::Draw => "The battle ended in a draw!",
        }
    }
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Win => write!(f, "win"),
            Self::Lose => write!(f, "lose"),
            Self::Draw => write!(f, "draw"),
        }
    }
}

/// Messages sent from server to client as lobby-framed JSON.
///
/// Adjacent tagging produces the wire shape `{"type": ..., "message": {...}}`
/// that clients frame on. Every duel-scoped message carries enough state for
/// a client to re-render without history.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Registration accepted under the supplied name.
    Registration { username: String, status: String },
    /// Registration replaced a live session holding the same name.
    Reconnect { username: String, status: String },
    /// Names of every participant with a live connection.
    PlayerList { players: Vec<String> },
    /// A duel was arranged; squads are being assembled.
    MatchStart { opponent: String },
    /// Both squads are ready and turn one is about to start.
    GameStart {
        your_squad: Vec<String>,
        opponent_squad: Vec<String>,
        your_pokemon: String,
        opponent_pokemon: String,
        your_moves: Vec<String>,
    },
    /// Choose an action for this turn.
    TurnRequest {
        turn: TurnNumber,
        available_moves_info: Vec<MovePp>,
        force_switch: bool,
    },
    /// A substitution is required before combat can continue.
    SwitchRequest { reason: String },
    /// Everything that happened this turn plus both squads' states.
    TurnResult {
        description: Vec<String>,
        your_squad_state: Vec<SlotState>,
        opponent_squad_state: Vec<SlotState>,
        your_active_index: usize,
        opponent_active_index: usize,
    },
    /// The other side went silent or dropped; the duel is over.
    OpponentDisconnected {
        opponent: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
    /// Final outcome of the duel.
    GameEnd {
        result: Outcome,
        opponent: String,
        message: String,
    },
    /// Matchmaking rejection; lobby state is unchanged.
    MatchError { error: String },
}

impl ServerMessage {
    pub fn registration(username: &str) -> Self {
        Self::Registration {
            username: username.to_string(),
            status: "registered".to_string(),
        }
    }
    pub fn reconnect(username: &str) -> Self {
        Self::Reconnect {
            username: username.to_string(),
            status: "reconnected, previous session closed".to_string(),
        }
    }
    pub fn player_list(players: Vec<String>) -> Self {
        Self::PlayerList { players }
    }
    pub fn match_start(opponent: &str) -> Self {
        Self::MatchStart {
            opponent: opponent.to_string(),
        }
    }
    pub fn switch_request(reason: String) -> Self {
        Self::SwitchRequest { reason }
    }
    pub fn opponent_disconnected(opponent: &str, reason: Option<String>) -> Self {
        Self::OpponentDisconnected {
            opponent: opponent.to_string(),
            reason,
        }
    }
    pub fn game_end(result: Outcome, opponent: &str) -> Self {
        Self::GameEnd {
            result,
            opponent: opponent.to_string(),
            message: result.farewell().to_string(),
        }
    }
    pub fn match_error(error: impl Into<String>) -> Self {
        Self::MatchError {
            error: error.into(),
        }
    }
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).expect("serialize server message")
    }
}

/// Messages clients send in lobby mode.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum ClientMessage {
    Register { username: String },
    GetPlayers { username: String },
    Matchmake { username: String, opponent: String },
}
