// Resource ownership guard

use std::fmt;

use tracing::warn;

use crate::auth::UserId;
use crate::notes::{error::NoteError, models::Note, models::NoteId};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Allow,
    Deny,
}

/// Operation being authorized, used in the Forbidden message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    View,
    Update,
    Delete,
}

impl fmt::Display for NoteAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verb = match self {
            NoteAction::View => "view",
            NoteAction::Update => "update",
            NoteAction::Delete => "delete",
        };
        f.write_str(verb)
    }
}

/// Pure ownership comparison
pub fn authorize(principal: UserId, owner: UserId) -> Access {
    if principal == owner {
        Access::Allow
    } else {
        Access::Deny
    }
}

/// Two-stage check: a missing note is NotFound before ownership is
/// considered; an existing note owned by someone else is Forbidden.
pub fn ensure_owner(
    note: Option<Note>,
    note_id: NoteId,
    principal: UserId,
    action: NoteAction,
) -> Result<Note, NoteError> {
    let note = note.ok_or(NoteError::NotFound(note_id))?;

    match authorize(principal, note.owner_id) {
        Access::Allow => Ok(note),
        Access::Deny => {
            warn!(
                "Ownership check failed: user_id={} tried to {} note_id={}",
                principal, action, note_id
            );
            Err(NoteError::Forbidden { action })
        }
    }
}
