use async_trait::async_trait;
use sqlx::PgPool;

use crate::auth::UserId;
use crate::notes::{
    error::NoteError,
    models::{Note, NoteId},
};

/// Persists notes
#[async_trait]
pub trait NoteRepository: Send + Sync {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteError>;

    /// Insert the note, or replace the stored one with the same id
    async fn save(&self, note: Note) -> Result<Note, NoteError>;

    /// Returns false when no note had this id
    async fn delete_by_id(&self, id: NoteId) -> Result<bool, NoteError>;

    /// All notes of one owner, newest first
    async fn find_all_by_owner(&self, owner_id: UserId) -> Result<Vec<Note>, NoteError>;
}

/// Postgres-backed note repository
#[derive(Clone)]
pub struct PgNoteRepository {
    pool: PgPool,
}

impl PgNoteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteRepository for PgNoteRepository {
    async fn find_by_id(&self, id: NoteId) -> Result<Option<Note>, NoteError> {
        let note = sqlx::query_as::<_, Note>(
            "SELECT id, owner_id, title, description, created_at FROM notes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(note)
    }

    async fn save(&self, note: Note) -> Result<Note, NoteError> {
        let saved = sqlx::query_as::<_, Note>(
            r#"
            INSERT INTO notes (id, owner_id, title, description, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (id) DO UPDATE
            SET title = EXCLUDED.title,
                description = EXCLUDED.description
            RETURNING id, owner_id, title, description, created_at
            "#,
        )
        .bind(note.id)
        .bind(note.owner_id)
        .bind(&note.title)
        .bind(&note.description)
        .bind(note.created_at)
        .fetch_one(&self.pool)
        .await?;

        Ok(saved)
    }

    async fn delete_by_id(&self, id: NoteId) -> Result<bool, NoteError> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn find_all_by_owner(&self, owner_id: UserId) -> Result<Vec<Note>, NoteError> {
        let notes = sqlx::query_as::<_, Note>(
            r#"
            SELECT id, owner_id, title, description, created_at
            FROM notes
            WHERE owner_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(notes)
    }
}
