use super::ProtocolError;

/// Leading marker of a regular in-duel action frame.
pub const GAME_ACTION_MARKER: &str = "GAME_ACTION_MARKER";
/// Leading marker of a forced-switch reply frame.
pub const SWITCH_ACTION_MARKER: &str = "SWITCH_ACTION_MARKER";

/// One in-duel action frame, client to server only.
///
/// Wire forms, one newline-terminated frame per write:
///
/// ```text
/// GAME_ACTION_MARKER|move|<1..4>|0
/// GAME_ACTION_MARKER|switch|0|<0..5>
/// SWITCH_ACTION_MARKER|<0..5>
/// ```
///
/// Index ranges are enforced at validation, not parse time: a parseable frame
/// with a bad index forfeits the turn rather than the connection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionFrame {
    /// Use the active battler's move in 1-based menu slot `slot`.
    Move { slot: usize },
    /// Substitute the battler in 0-based squad slot `target`.
    Switch { target: usize },
    /// Reply to a forced-switch prompt with 0-based squad slot `target`.
    Forced { target: usize },
}

impl TryFrom<&str> for ActionFrame {
    type Error = ProtocolError;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        let bad = || ProtocolError::InvalidAction(s.to_string());
        let parts: Vec<&str> = s.trim().split('|').collect();
        match parts.as_slice() {
            [SWITCH_ACTION_MARKER, target] => {
                let target = target.parse().map_err(|_| bad())?;
                Ok(Self::Forced { target })
            }
            [GAME_ACTION_MARKER, kind, slot, target] => {
                let slot = slot.parse().map_err(|_| bad())?;
                let target = target.parse().map_err(|_| bad())?;
                match *kind {
                    "move" => Ok(Self::Move { slot }),
                    "switch" => Ok(Self::Switch { target }),
                    _ => Err(bad()),
                }
            }
            _ => Err(bad()),
        }
    }
}

impl std::fmt::Display for ActionFrame {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::Move { slot } => write!(f, "{}|move|{}|0", GAME_ACTION_MARKER, slot),
            Self::Switch { target } => write!(f, "{}|switch|0|{}", GAME_ACTION_MARKER, target),
            Self::Forced { target } => write!(f, "{}|{}", SWITCH_ACTION_MARKER, target),
        }
    }
}
