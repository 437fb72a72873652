use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::auth::UserId;
use crate::notes::{
    error::NoteError,
    guard::{ensure_owner, NoteAction},
    models::{Note, NoteId, NoteRequest},
    repository::NoteRepository,
};

/// Service for note business logic
///
/// Every operation on an existing note loads it first and runs it through
/// the ownership guard, so a missing note is reported before a foreign one.
#[derive(Clone)]
pub struct NoteService {
    notes: Arc<dyn NoteRepository>,
}

impl NoteService {
    pub fn new(notes: Arc<dyn NoteRepository>) -> Self {
        Self { notes }
    }

    /// Create a note owned by `owner_id`
    pub async fn create(&self, owner_id: UserId, request: NoteRequest) -> Result<Note, NoteError> {
        let note = self
            .notes
            .save(Note {
                id: NoteId::new(),
                owner_id,
                title: request.title,
                description: request.description,
                created_at: Utc::now(),
            })
            .await?;

        info!("Note created: note_id={} owner_id={}", note.id, owner_id);
        Ok(note)
    }

    pub async fn get(&self, principal: UserId, id: NoteId) -> Result<Note, NoteError> {
        let note = self.notes.find_by_id(id).await?;
        ensure_owner(note, id, principal, NoteAction::View)
    }

    /// Replace title and description. Owner and creation time are kept.
    pub async fn update(
        &self,
        principal: UserId,
        id: NoteId,
        request: NoteRequest,
    ) -> Result<Note, NoteError> {
        let existing = self.notes.find_by_id(id).await?;
        let mut note = ensure_owner(existing, id, principal, NoteAction::Update)?;

        note.title = request.title;
        note.description = request.description;
        let note = self.notes.save(note).await?;

        info!("Note updated: note_id={}", id);
        Ok(note)
    }

    pub async fn delete(&self, principal: UserId, id: NoteId) -> Result<(), NoteError> {
        let existing = self.notes.find_by_id(id).await?;
        ensure_owner(existing, id, principal, NoteAction::Delete)?;

        // A concurrent delete by the owner may already have removed it
        if !self.notes.delete_by_id(id).await? {
            return Err(NoteError::NotFound(id));
        }

        info!("Note deleted: note_id={}", id);
        Ok(())
    }

    pub async fn list_for_owner(&self, owner_id: UserId) -> Result<Vec<Note>, NoteError> {
        self.notes.find_all_by_owner(owner_id).await
    }
}
