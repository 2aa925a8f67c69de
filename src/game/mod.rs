pub mod best_time;
pub mod deck_builder;
pub mod error;
pub mod game_engine;
pub mod game_state;
pub mod scheduler;
pub mod settings;

pub use best_time::{BestTimeRecorder, BestTimeStore, JsonFileStore, MemoryStore, BEST_TIME_KEY};
pub use deck_builder::{build_deck, DeckBuilder};
pub use error::{ConfigurationError, StoreError};
pub use game_engine::GameEngine;
pub use game_state::{Effect, GameState, Transition};
pub use scheduler::{ManualScheduler, Scheduler, TaskHandle};
pub use settings::Settings;
