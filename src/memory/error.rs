use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Verse not found: {0}")]
    VerseNotFound(Uuid),

    #[error("Invalid mastery level: {0}")]
    InvalidMasteryLevel(u8),

    #[error("No practice session in progress")]
    NoActiveSession,

    #[error("A practice session is already in progress")]
    SessionAlreadyActive,
}

pub type Result<T> = std::result::Result<T, MemoryError>;

/// Extension for callers that want the silent no-op behavior on unknown ids
pub trait IgnoreMissing<T> {
    /// Turn `VerseNotFound` into `Ok(None)`, passing every other outcome through
    fn ignore_missing(self) -> Result<Option<T>>;
}

impl<T> IgnoreMissing<T> for Result<T> {
    fn ignore_missing(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(MemoryError::VerseNotFound(id)) => {
                log::debug!("Ignoring operation on unknown verse {}", id);
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}
