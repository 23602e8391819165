//! Per-session tap counters.

use std::fmt;

use tagpass_ingress::Decision;

/// Running counts for one reader session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    pub cards_processed: u64,
    pub granted: u64,
    pub denied: u64,
    pub errors: u64,
}

impl SessionStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a tap that reached a decision.
    pub fn record_decision(&mut self, decision: &Decision) {
        self.cards_processed += 1;
        if decision.is_granted() {
            self.granted += 1;
        } else {
            self.denied += 1;
        }
    }

    /// Count a tap that failed before or after the engine.
    pub fn record_error(&mut self) {
        self.cards_processed += 1;
        self.errors += 1;
    }
}

impl fmt::Display for SessionStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} cards processed ({} granted, {} denied, {} errors)",
            self.cards_processed, self.granted, self.denied, self.errors
        )
    }
}
