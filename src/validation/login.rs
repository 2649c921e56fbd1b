use crate::core::error::LoginError;

/// Length of a staff ID
pub const ID_LENGTH: usize = 3;

/// Filter raw ID input the way the login form does while typing
///
/// Drops every non-digit and keeps at most the first three digits.
pub fn normalize_id_input(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_digit())
        .take(ID_LENGTH)
        .collect()
}

/// Validate a submitted staff ID
///
/// Surrounding whitespace is ignored; what remains must be exactly three
/// ASCII digits.
pub fn validate_id(id: &str) -> Result<&str, LoginError> {
    let id = id.trim();

    if id.len() != ID_LENGTH || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LoginError::InvalidIdFormat);
    }

    Ok(id)
}
