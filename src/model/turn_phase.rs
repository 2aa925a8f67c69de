use serde::{Deserialize, Serialize};

use super::RecordResult;

/// Where the current game is in its tap cycle, or how it ended.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TurnPhase {
    /// No game has been dealt yet. The board is empty and nothing responds.
    #[default]
    Idle,
    /// No card is face up and unmatched.
    AwaitingFirst,
    /// One card is face up and waiting for its partner.
    AwaitingSecond { pending: usize },
    /// Two mismatched cards are face up until the deferred hide fires. Input is locked.
    Resolving { first: usize, second: usize },
    Won { finish_tenths: u32 },
    Lost,
}

impl TurnPhase {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TurnPhase::Won { .. } | TurnPhase::Lost)
    }

    /// `Idle` reports `InProgress`: nothing has been won or lost yet.
    pub fn outcome(&self) -> GameOutcome {
        match *self {
            TurnPhase::Won { finish_tenths } => GameOutcome::Won {
                finish_seconds: f64::from(finish_tenths) / 10.0,
            },
            TurnPhase::Lost => GameOutcome::Lost,
            _ => GameOutcome::InProgress,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GameOutcome {
    InProgress,
    Won { finish_seconds: f64 },
    Lost,
}

impl GameOutcome {
    /// Title and body of the end-of-game notice; `None` while the game is running.
    pub fn summary(&self, record: Option<RecordResult>) -> Option<(&'static str, String)> {
        match *self {
            GameOutcome::InProgress => None,
            GameOutcome::Lost => Some(("Time's up", "You ran out of time.".to_string())),
            GameOutcome::Won { finish_seconds } => match record {
                Some(RecordResult { updated: true, .. }) => Some((
                    "New record",
                    format!("New best time: {:.1}s", finish_seconds),
                )),
                _ => Some(("Completed", format!("Time: {:.1}s", finish_seconds))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome() {
        assert_eq!(TurnPhase::AwaitingFirst.outcome(), GameOutcome::InProgress);
        assert_eq!(
            TurnPhase::Resolving { first: 0, second: 1 }.outcome(),
            GameOutcome::InProgress
        );
        assert_eq!(
            TurnPhase::Won { finish_tenths: 452 }.outcome(),
            GameOutcome::Won {
                finish_seconds: 45.2
            }
        );
        assert_eq!(TurnPhase::Lost.outcome(), GameOutcome::Lost);
        assert!(TurnPhase::Lost.is_terminal());
        assert!(!TurnPhase::AwaitingSecond { pending: 3 }.is_terminal());
        assert_eq!(TurnPhase::default(), TurnPhase::Idle);
        assert!(!TurnPhase::Idle.is_terminal());
    }

    #[test]
    fn test_summary() {
        let won = GameOutcome::Won {
            finish_seconds: 32.5,
        };
        let record = RecordResult {
            updated: true,
            new_best: 32.5,
        };
        assert_eq!(
            won.summary(Some(record)),
            Some(("New record", "New best time: 32.5s".to_string()))
        );
        let not_a_record = RecordResult {
            updated: false,
            new_best: 20.0,
        };
        assert_eq!(
            won.summary(Some(not_a_record)),
            Some(("Completed", "Time: 32.5s".to_string()))
        );
        assert_eq!(GameOutcome::Lost.summary(None).unwrap().0, "Time's up");
        assert_eq!(GameOutcome::InProgress.summary(None), None);
    }
}
