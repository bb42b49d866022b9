use crate::core::ports::RepositoryError;
use crate::core::time_card::errors::TimeCardError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApplicationError {
    #[error(transparent)]
    Repository(#[from] RepositoryError),

    #[error("domain rejected: {0}")]
    Domain(#[from] TimeCardError),

    #[error("already clocked in")]
    AlreadyClockedIn,

    #[error("not clocked in")]
    NotClockedIn,
}
