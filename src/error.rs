use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid game configuration")]
    InvalidConfiguration,
    #[error("Insufficient balance for this bet")]
    InsufficientBalance,
    #[error("Cell reference out of range")]
    InvalidCellReference,
    #[error("Cannot cash out, no treasures found yet")]
    NothingToCashOut,
    #[error("No active session")]
    SessionNotActive,
    #[error("A session is still in progress")]
    SessionActive,
}

pub type Result<T> = core::result::Result<T, GameError>;
