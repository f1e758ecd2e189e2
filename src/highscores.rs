//! Session score tracking
//!
//! Kept in memory only; nothing survives a page reload.

/// Best and most recent scores for this page session
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionScores {
    pub best: u64,
    pub last: Option<u64>,
    /// Finished runs
    pub runs: u32,
}

impl SessionScores {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a finished run; returns true on a new session best
    pub fn record(&mut self, score: u64) -> bool {
        self.runs += 1;
        self.last = Some(score);
        if score > self.best {
            self.best = score;
            log::info!("New session best: {}", score);
            return true;
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_tracks_best() {
        let mut scores = SessionScores::new();
        assert!(scores.record(40));
        assert!(!scores.record(12));
        assert!(scores.record(41));
        assert_eq!(scores.best, 41);
        assert_eq!(scores.last, Some(41));
        assert_eq!(scores.runs, 3);
    }

    #[test]
    fn test_zero_is_not_a_best() {
        let mut scores = SessionScores::new();
        assert!(!scores.record(0));
        assert_eq!(scores.runs, 1);
    }
}
