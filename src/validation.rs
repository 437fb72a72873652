// Validation utilities module
// Custom rules used by request DTOs alongside the built-in validator checks

use std::borrow::Cow;

use validator::ValidationError;

/// Rejects values that are empty or contain only whitespace
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut error = ValidationError::new("blank");
        error.message = Some(Cow::Borrowed("Must not be blank"));
        Err(error)
    } else {
        Ok(())
    }
}
