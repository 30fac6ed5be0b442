use thiserror::Error;

use super::events::DispatchError;
use crate::shared::DomainError;

/// Error returned by application services
#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    /// The state change committed but publishing its event failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

pub type AppResult<T> = Result<T, AppError>;
