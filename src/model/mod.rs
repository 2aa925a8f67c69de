mod animal_pools;
mod card;
mod game_engine_command;
mod game_engine_event;
mod timer_state;
mod turn_phase;

pub use animal_pools::{animal_pools, SymbolPool, ANIMAL_POOLS};
pub use card::{Card, CardFace, CardView, CARD_BACK};
pub use game_engine_command::GameEngineCommand;
pub use game_engine_event::{GameEngineEvent, RecordResult};
pub use timer_state::{tenths_from_duration, TimerState};
pub use turn_phase::{GameOutcome, TurnPhase};
