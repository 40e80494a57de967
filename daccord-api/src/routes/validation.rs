/// Custom field checks shared by request bodies
///
/// Used through `#[validate(custom(function = "..."))]`; the attribute's
/// `message` is what the client sees.

use validator::ValidationError;

/// Letters, digits and underscores, 3 to 20 characters
pub fn valid_username(username: &str) -> Result<(), ValidationError> {
    let len_ok = (3..=20).contains(&username.chars().count());
    let chars_ok = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_');

    if len_ok && chars_ok {
        Ok(())
    } else {
        Err(ValidationError::new("username"))
    }
}

/// Rejects empty and whitespace-only strings
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(ValidationError::new("required"))
    } else {
        Ok(())
    }
}
