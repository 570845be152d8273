//! Common validation utilities.

use validator::ValidationError;

/// Validates that a todo title contains at least one non-whitespace character.
pub fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        let mut err = ValidationError::new("title_required");
        err.message = Some("Title is required".into());
        return Err(err);
    }
    Ok(())
}
