use super::ValidationError;

/// Full names are trimmed before the length check.
pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        return Err(ValidationError::NameEmpty);
    }

    if trimmed.chars().count() > 100 {
        return Err(ValidationError::NameTooLong);
    }

    Ok(())
}
