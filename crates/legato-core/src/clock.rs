//! Time source seam

use std::time::{SystemTime, UNIX_EPOCH};

use crate::Timestamp;

/// Supplies the current time in unix seconds
pub trait Clock: Send + Sync {
    fn now(&self) -> Timestamp;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs() as Timestamp
    }
}

/// A clock stuck at one instant
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        assert_eq!(FixedClock(1_714_483_013).now(), 1_714_483_013);
    }

    #[test]
    fn test_system_clock_is_past_2024() {
        assert!(SystemClock.now() > 1_704_067_200);
    }
}
