use thiserror::Error;

/// Board or symbol-pool setup that can never produce a playable game.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("board has {0} slots; cards come in pairs so the slot count must be even")]
    OddSlotCount(usize),

    #[error("board has no card slots")]
    EmptyBoard,

    #[error("no symbol pools configured")]
    NoPools,

    #[error("symbol pool {pool} has {size} symbols but {pair_count} pairs are needed")]
    PoolTooSmall {
        pool: usize,
        size: usize,
        pair_count: usize,
    },

    #[error("symbol pool {pool} lists {symbol:?} more than once")]
    DuplicateSymbol { pool: usize, symbol: String },
}

/// Failure reading or writing persisted preferences. Never fatal to play.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("preferences I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("preferences are not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("preferences store is unavailable")]
    Unavailable,
}
