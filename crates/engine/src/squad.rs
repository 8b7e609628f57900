use super::Battler;

/// Why a substitution was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwitchError {
    OutOfRange,
    Fainted,
    AlreadyActive,
}

impl std::fmt::Display for SwitchError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::OutOfRange => write!(f, "no such squad slot"),
            Self::Fainted => write!(f, "that battler has fainted"),
            Self::AlreadyActive => write!(f, "that battler is already out"),
        }
    }
}

impl std::error::Error for SwitchError {}

/// An ordered squad of six battlers with exactly one active at a time.
#[derive(Debug, Clone)]
pub struct Squad {
    battlers: Vec<Battler>,
    active: usize,
}

impl Squad {
    /// Builds a squad with slot 0 active.
    pub fn new(battlers: Vec<Battler>) -> Self {
        debug_assert_eq!(battlers.len(), bd_core::SQUAD_SIZE);
        Self {
            battlers,
            active: 0,
        }
    }

    pub fn battlers(&self) -> &[Battler] {
        &self.battlers
    }
    pub fn battler(&self, index: usize) -> Option<&Battler> {
        self.battlers.get(index)
    }
    pub fn battler_mut(&mut self, index: usize) -> Option<&mut Battler> {
        self.battlers.get_mut(index)
    }
    pub fn active_index(&self) -> usize {
        self.active
    }
    pub fn active(&self) -> &Battler {
        &self.battlers[self.active]
    }
    pub fn active_mut(&mut self) -> &mut Battler {
        &mut self.battlers[self.active]
    }
    /// Display names in slot order.
    pub fn names(&self) -> Vec<String> {
        self.battlers.iter().map(|b| b.name().to_string()).collect()
    }

    /// True when the squad has no battler left standing; the duel is over.
    pub fn all_fainted(&self) -> bool {
        self.battlers.iter().all(Battler::fainted)
    }

    /// True when some non-active battler could still be sent out.
    pub fn has_switch_target(&self) -> bool {
        self.battlers
            .iter()
            .enumerate()
            .any(|(i, b)| i != self.active && !b.fainted())
    }

    /// Substitutes the active battler. The outgoing battler loses its
    /// volatile flags; the incoming one must be alive and benched.
    pub fn switch_to(&mut self, index: usize) -> Result<(), SwitchError> {
        match self.battlers.get(index) {
            None => return Err(SwitchError::OutOfRange),
            Some(b) if b.fainted() => return Err(SwitchError::Fainted),
            _ if index == self.active => return Err(SwitchError::AlreadyActive),
            _ => {}
        }
        self.active_mut().clear_volatiles();
        self.active = index;
        Ok(())
    }
}
