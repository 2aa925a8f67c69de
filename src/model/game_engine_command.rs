use uuid::Uuid;

/// Input to the game engine, from the presentation layer or from scheduled tasks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEngineCommand {
    /// Start button and "Play Again" both deal a fresh game.
    NewGame,
    CardTapped(usize),
    Tick,
    /// Fired by the deferred task scheduled after a mismatch.
    HideMismatch(Uuid),
}
