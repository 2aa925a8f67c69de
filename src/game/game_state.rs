use log::trace;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{Card, CardView, GameOutcome, TimerState, TurnPhase};

/// Everything that describes one game in progress.
///
/// Transitions never mutate in place: each `apply_*` returns the next state together
/// with the [`Effect`] the engine has to act on (schedule a hide, stop the clock, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameState {
    pub playthrough_id: Uuid,
    pub cards: Vec<Card>,
    pub pair_count: usize,
    pub match_count: usize,
    pub phase: TurnPhase,
    pub timer: TimerState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Effect {
    /// Input arrived in a state where it means nothing. The state is unchanged.
    Ignored,
    Revealed { index: usize },
    Matched { first: usize, second: usize },
    /// Both cards stay face up until the deferred hide is applied.
    Mismatched { first: usize, second: usize },
    MismatchHidden { first: usize, second: usize },
    Ticked,
    Won { finish_seconds: f64 },
    /// `abandoned` lists cards that were face up and unmatched when time ran out;
    /// they have been turned face down.
    Lost { abandoned: [Option<usize>; 2] },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub state: GameState,
    pub effect: Effect,
}

impl Transition {
    fn ignored(state: &GameState) -> Self {
        Self {
            state: state.clone(),
            effect: Effect::Ignored,
        }
    }
}

impl GameState {
    pub fn new(deck: Vec<String>, time_limit_tenths: u32) -> Self {
        let pair_count = deck.len() / 2;
        Self {
            playthrough_id: Uuid::new_v4(),
            cards: deck.into_iter().map(Card::new).collect(),
            pair_count,
            match_count: 0,
            phase: TurnPhase::AwaitingFirst,
            timer: TimerState::started(time_limit_tenths),
        }
    }

    /// Placeholder before the first deal: no cards, clock stopped at the full limit.
    pub fn idle(time_limit_tenths: u32) -> Self {
        Self {
            playthrough_id: Uuid::nil(),
            cards: Vec::new(),
            pair_count: 0,
            match_count: 0,
            phase: TurnPhase::Idle,
            timer: TimerState::started(time_limit_tenths).stopped(),
        }
    }

    pub fn outcome(&self) -> GameOutcome {
        self.phase.outcome()
    }

    pub fn is_terminal(&self) -> bool {
        self.phase.is_terminal()
    }

    pub fn card_views(&self) -> Vec<CardView> {
        self.cards.iter().map(Card::view).collect()
    }

    pub fn apply_tap(&self, index: usize) -> Transition {
        let Some(card) = self.cards.get(index) else {
            trace!(target: "game_state", "Tap on {} is off the board", index);
            return Transition::ignored(self);
        };
        if card.is_matched() || card.is_revealed() {
            return Transition::ignored(self);
        }

        match self.phase {
            TurnPhase::AwaitingFirst => {
                let mut state = self.clone();
                state.cards[index].reveal();
                state.phase = TurnPhase::AwaitingSecond { pending: index };
                Transition {
                    state,
                    effect: Effect::Revealed { index },
                }
            }
            // the face-up check above already rules out pending == index
            TurnPhase::AwaitingSecond { pending } if pending != index => {
                self.resolve_pair(pending, index)
            }
            _ => Transition::ignored(self),
        }
    }

    fn resolve_pair(&self, first: usize, second: usize) -> Transition {
        let mut state = self.clone();
        state.cards[second].reveal();

        if state.cards[first].symbol != state.cards[second].symbol {
            state.phase = TurnPhase::Resolving { first, second };
            return Transition {
                state,
                effect: Effect::Mismatched { first, second },
            };
        }

        state.cards[first].mark_matched();
        state.cards[second].mark_matched();
        state.match_count += 1;

        if state.match_count == state.pair_count {
            let finish_tenths = state.timer.elapsed_tenths;
            state.timer = state.timer.stopped();
            state.phase = TurnPhase::Won { finish_tenths };
            let finish_seconds = state.timer.elapsed_seconds();
            return Transition {
                state,
                effect: Effect::Won { finish_seconds },
            };
        }

        state.phase = TurnPhase::AwaitingFirst;
        Transition {
            state,
            effect: Effect::Matched { first, second },
        }
    }

    /// Applies the deferred hide scheduled by a mismatch. Only meaningful while resolving.
    pub fn apply_hide(&self) -> Transition {
        let TurnPhase::Resolving { first, second } = self.phase else {
            return Transition::ignored(self);
        };
        let mut state = self.clone();
        state.cards[first].hide();
        state.cards[second].hide();
        state.phase = TurnPhase::AwaitingFirst;
        Transition {
            state,
            effect: Effect::MismatchHidden { first, second },
        }
    }

    pub fn apply_tick(&self) -> Transition {
        if self.is_terminal() || !self.timer.running {
            return Transition::ignored(self);
        }

        let mut state = self.clone();
        state.timer = state.timer.ticked();
        if !state.timer.is_expired() {
            return Transition {
                state,
                effect: Effect::Ticked,
            };
        }

        // Time is up whatever the sub-state: any face-up unmatched card goes back down.
        let abandoned = match state.phase {
            TurnPhase::AwaitingSecond { pending } => [Some(pending), None],
            TurnPhase::Resolving { first, second } => [Some(first), Some(second)],
            _ => [None, None],
        };
        for index in abandoned.iter().flatten() {
            state.cards[*index].hide();
        }
        state.timer = state.timer.stopped();
        state.phase = TurnPhase::Lost;
        Transition {
            state,
            effect: Effect::Lost { abandoned },
        }
    }
}
