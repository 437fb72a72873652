// Notes module
// Per-user notes guarded by ownership checks

pub mod error;
pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod service;

pub use error::NoteError;
pub use guard::{authorize, ensure_owner, Access, NoteAction};
pub use handlers::*;
pub use models::{Note, NoteId, NoteRequest, NoteResponse};
pub use repository::{NoteRepository, PgNoteRepository};
pub use service::NoteService;
