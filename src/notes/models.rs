use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::auth::UserId;

/// Opaque note identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(transparent)]
#[sqlx(transparent)]
pub struct NoteId(Uuid);

impl NoteId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoteId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NoteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for NoteId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Domain model representing a note in the database
#[derive(Debug, Clone, FromRow)]
pub struct Note {
    pub id: NoteId,
    pub owner_id: UserId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Request DTO for creating or replacing a note
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct NoteRequest {
    #[validate(
        length(min = 1, max = 200, message = "Title must be between 1 and 200 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub title: String,
    #[validate(
        length(min = 1, max = 5000, message = "Description must be between 1 and 5000 characters"),
        custom = "crate::validation::validate_not_blank"
    )]
    pub description: String,
}

/// Response DTO for API responses
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct NoteResponse {
    #[schema(value_type = String, format = Uuid)]
    pub id: NoteId,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

impl From<Note> for NoteResponse {
    fn from(note: Note) -> Self {
        Self {
            id: note.id,
            title: note.title,
            description: note.description,
            created_at: note.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_note_request_length_limits() {
        let empty_title = NoteRequest {
            title: String::new(),
            description: "body".to_string(),
        };
        assert!(empty_title.validate().is_err());

        let long_description = NoteRequest {
            title: "title".to_string(),
            description: "x".repeat(5001),
        };
        assert!(long_description.validate().is_err());

        let at_limits = NoteRequest {
            title: "t".repeat(200),
            description: "d".repeat(5000),
        };
        assert!(at_limits.validate().is_ok());
    }

    #[test]
    fn test_note_request_rejects_whitespace_only_fields() {
        let blank_title = NoteRequest {
            title: "   ".to_string(),
            description: "body".to_string(),
        };
        let errors = blank_title.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("title"));

        let blank_description = NoteRequest {
            title: "title".to_string(),
            description: "\n\t ".to_string(),
        };
        let errors = blank_description.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("description"));
    }

    #[test]
    fn test_response_hides_owner() {
        let note = Note {
            id: NoteId::new(),
            owner_id: UserId::new(),
            title: "title".to_string(),
            description: "body".to_string(),
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(NoteResponse::from(note)).unwrap();
        assert!(json.get("owner_id").is_none());
        assert_eq!(json["title"], "title");
    }
}
