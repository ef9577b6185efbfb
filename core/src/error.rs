use thiserror::Error;

use crate::Gold;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum StorageError {
    #[error("Could not encode profile")]
    Encode,
    #[error("Stored profile is malformed")]
    Decode,
    #[error("Storage backend is unavailable")]
    Unavailable,
}

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid cell index")]
    InvalidCell,
    #[error("Too many mines")]
    TooManyMines,
    #[error("Not enough gold, costs {cost} but balance is {balance}")]
    LowBalance { cost: Gold, balance: Gold },
    #[error("Upgrade already owned")]
    AlreadyOwned,
    #[error("No upgrade with that cost")]
    UnknownUpgrade,
    #[error("Storage failure: {0}")]
    Storage(#[from] StorageError),
}

pub type Result<T> = core::result::Result<T, GameError>;
