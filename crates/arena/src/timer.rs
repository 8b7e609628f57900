use bd_core::TURN_TIMEOUT;
use bd_core::WRITE_TIMEOUT;
use std::time::Duration;

/// Configuration for duel deadlines.
///
/// The action deadline is measured at the coordinator per collected action,
/// not per socket read; the write deadline applies to every outbound frame.
/// Tests shrink both to keep timeout paths fast.
#[derive(Debug, Clone, Copy)]
pub struct TimerConfig {
    pub action: Duration,
    pub write: Duration,
}

impl Default for TimerConfig {
    fn default() -> Self {
        Self {
            action: TURN_TIMEOUT,
            write: WRITE_TIMEOUT,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_deadlines() {
        let config = TimerConfig::default();
        assert_eq!(config.action, Duration::from_secs(65));
        assert_eq!(config.write, Duration::from_secs(10));
    }
}
