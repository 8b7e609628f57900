use super::ActionFrame;
use bd_engine::Squad;
use bd_engine::SwitchError;

/// Errors that can occur during protocol operations.
#[derive(Debug, Clone)]
pub enum ProtocolError {
    InvalidAction(String),
    IllegalAction(String),
}

impl std::fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidAction(s) => write!(f, "invalid action: {}", s),
            Self::IllegalAction(s) => write!(f, "illegal action: {}", s),
        }
    }
}

impl std::error::Error for ProtocolError {}

impl PartialEq for ProtocolError {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

/// A validated action, ready for the resolver.
#[derive(Clone, Debug, PartialEq)]
pub enum TurnChoice {
    /// Use the active battler's move at this 0-based moveset index.
    Move(usize),
    /// Substitute to this 0-based squad slot before combat.
    Switch(usize),
    /// The action was invalid; combat for the side is forfeit this turn and
    /// the event line explains why.
    Forfeit(String),
}

/// Validates client actions against the acting side's squad.
/// Centralizes the rules between wire frames and the coordinator.
pub struct Protocol;

impl Protocol {
    /// Checks one side's action for the current turn.
    ///
    /// A forced side may only switch; anything else forfeits. Bad indices
    /// and illegal switch targets forfeit with an explanatory event rather
    /// than ending the duel.
    pub fn validate(
        frame: &ActionFrame,
        squad: &Squad,
        force_switch: bool,
        username: &str,
    ) -> TurnChoice {
        match frame {
            ActionFrame::Move { .. } if force_switch => {
                TurnChoice::Forfeit(format!("{} must send out a new battler!", username))
            }
            ActionFrame::Move { slot } => {
                let menu = squad.active().moves().len();
                match (1..=menu).contains(slot) {
                    true => TurnChoice::Move(slot - 1),
                    false => {
                        TurnChoice::Forfeit(format!("{} chose an invalid move!", username))
                    }
                }
            }
            ActionFrame::Switch { target } | ActionFrame::Forced { target } => {
                match Self::switchable(squad, *target) {
                    Ok(()) => TurnChoice::Switch(*target),
                    Err(e) => {
                        TurnChoice::Forfeit(format!("{} tried to switch but {}!", username, e))
                    }
                }
            }
        }
    }

    /// Dry-run of [`Squad::switch_to`]'s checks, without mutating.
    fn switchable(squad: &Squad, target: usize) -> Result<(), SwitchError> {
        match squad.battler(target) {
            None => Err(SwitchError::OutOfRange),
            Some(b) if b.fainted() => Err(SwitchError::Fainted),
            _ if target == squad.active_index() => Err(SwitchError::AlreadyActive),
            _ => Ok(()),
        }
    }
}
