//! Field validators shared by the draft and request types.

use validator::{ValidationError, ValidationErrors};

use crate::error::CoreError;

/// Rejects empty and whitespace-only strings. Used with the `validator`
/// derive, which skips `None` for optional fields.
pub fn non_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("non_blank"));
    }
    Ok(())
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        let mut parts: Vec<String> = Vec::new();
        for (field, field_errors) in errors.field_errors() {
            let detail = field_errors
                .first()
                .and_then(|e| e.message.as_ref())
                .map(|m| m.to_string())
                .unwrap_or_else(|| "is invalid".to_string());
            parts.push(format!("{field} {detail}"));
        }
        CoreError::Validation(parts.join(", "))
    }
}
