use crate::error::ErrorKind;
use crate::notes::{guard::NoteAction, models::NoteId};

/// Service-level errors for notes
#[derive(Debug, thiserror::Error)]
pub enum NoteError {
    #[error("Note not found with id: {0}")]
    NotFound(NoteId),

    /// The note exists but belongs to someone else
    #[error("You don't have permission to {action} this note")]
    Forbidden { action: NoteAction },

    #[error("Store error: {0}")]
    Store(String),
}

impl NoteError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            NoteError::NotFound(_) => ErrorKind::NotFound,
            NoteError::Forbidden { .. } => ErrorKind::Forbidden,
            NoteError::Store(_) => ErrorKind::Internal,
        }
    }
}

impl From<sqlx::Error> for NoteError {
    fn from(err: sqlx::Error) -> Self {
        NoteError::Store(err.to_string())
    }
}
