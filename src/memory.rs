//! In-memory stores
//!
//! DashMap-backed implementations of the repository traits. Used when no
//! database is configured and throughout the test suite. Every operation is a
//! single map call, so the atomicity the traits promise holds per shard lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::{mapref::entry::Entry, DashMap};

use crate::auth::{
    AuthError, RefreshTokenRecord, RefreshTokenRepository, User, UserId, UserRepository,
};
use crate::notes::{Note, NoteError, NoteId, NoteRepository};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: DashMap<UserId, User>,
    by_email: DashMap<String, UserId>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, email: &str, password_hash: &str) -> Result<User, AuthError> {
        // Holding the email entry makes the uniqueness check and the insert one step
        match self.by_email.entry(email.to_string()) {
            Entry::Occupied(_) => Err(AuthError::EmailAlreadyExists),
            Entry::Vacant(slot) => {
                let user = User {
                    id: UserId::new(),
                    email: email.to_string(),
                    password_hash: password_hash.to_string(),
                    created_at: Utc::now(),
                };
                self.users.insert(user.id, user.clone());
                slot.insert(user.id);
                Ok(user)
            }
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .by_email
            .get(email)
            .and_then(|id| self.users.get(id.value()).map(|u| u.value().clone())))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.get(&id).map(|u| u.value().clone()))
    }
}

#[derive(Default)]
pub struct InMemoryRefreshTokenRepository {
    records: DashMap<(UserId, String), RefreshTokenRecord>,
}

impl InMemoryRefreshTokenRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records held, expired or not
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl RefreshTokenRepository for InMemoryRefreshTokenRepository {
    async fn store(
        &self,
        user_id: UserId,
        token_hash: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        let record = RefreshTokenRecord {
            user_id,
            token_hash: token_hash.to_string(),
            expires_at,
            created_at: Utc::now(),
        };
        self.records.insert((user_id, token_hash.to_string()), record);
        Ok(())
    }

    async fn find_active(
        &self,
        user_id: UserId,
        token_hash: &str,
    ) -> Result<Option<RefreshTokenRecord>, AuthError> {
        let now = Utc::now();
        Ok(self
            .records
            .get(&(user_id, token_hash.to_string()))
            .map(|r| r.value().clone())
            .filter(|r| !r.is_expired_at(now)))
    }

    async fn consume(&self, user_id: UserId, token_hash: &str) -> Result<bool, AuthError> {
        let now = Utc::now();
        let removed = self
            .records
            .remove_if(&(user_id, token_hash.to_string()), |_, r| !r.is_expired_at(now));
        Ok(removed.is_some())
    }

    async fn delete_expired(&self) -> Result<u64, AuthError> {
        let now = Utc::now();
        let mut removed = 0u64;
        self.records.retain(|_, r| {
            let keep = !r.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        Ok(removed)
    }
}

#[derive(Default)]
pub struct InMemoryNoteRepository {
    notes: DashMap<NoteId, Note>,
}

impl InMemoryNoteRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NoteRepository for InMemoryNoteRepository {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteError> {
        Ok(self.notes.get(&id).map(|n| n.value().clone()))
    }

    async fn save(&self, note: Note) -> Result<Note, NoteError> {
        self.notes.insert(note.id, note.clone());
        Ok(note)
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<bool, NoteError> {
        Ok(self.notes.remove(&id).is_some())
    }

    async fn find_all_by_owner(&self, owner_id: UserId) -> Result<Vec<Note>, NoteError> {
        let mut notes: Vec<Note> = self
            .notes
            .iter()
            .filter(|n| n.owner_id == owner_id)
            .map(|n| n.value().clone())
            .collect();
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(notes)
    }
}
