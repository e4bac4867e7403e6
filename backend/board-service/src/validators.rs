use crate::error::{AppError, Result};

/// Input validation for sign-up.
///
/// The checks run in a fixed order and the first failure wins; each failure
/// maps to HTTP 412 with its own message. The duplicate-nickname check needs
/// the database and lives in the user service, sequenced after these.
pub fn validate_registration(
    nickname: &str,
    password: &str,
    confirm_password: &str,
) -> Result<()> {
    if nickname.chars().count() < 3 {
        return Err(AppError::Validation(
            "Nickname must be at least 3 characters.".to_string(),
        ));
    }

    if password.chars().count() < 4 {
        return Err(AppError::Validation(
            "Password must be at least 4 characters.".to_string(),
        ));
    }

    if password.contains(nickname) {
        return Err(AppError::Validation(
            "Password must not contain the nickname.".to_string(),
        ));
    }

    if password != confirm_password {
        return Err(AppError::Validation(
            "Password and password confirmation do not match.".to_string(),
        ));
    }

    Ok(())
}
