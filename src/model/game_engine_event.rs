use uuid::Uuid;

use super::{CardView, GameOutcome, TimerState};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordResult {
    pub updated: bool,
    pub new_best: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GameEngineEvent {
    GameStarted {
        playthrough_id: Uuid,
        slot_count: usize,
    },
    BoardUpdated(Vec<CardView>),
    TimerUpdated(TimerState),
    GameOver {
        outcome: GameOutcome,
        /// Present only for wins.
        record: Option<RecordResult>,
    },
    BestTimeChanged {
        best_seconds: Option<f64>,
        new_record: bool,
    },
}
