//! Field checks shared by several services.

use alumni_core::error::AppError;

/// Widest phone number the `phone` columns hold.
pub const MAX_PHONE_LEN: usize = 20;

/// Widest username and role name the schema holds.
pub const MAX_NAME_LEN: usize = 50;

/// Phone numbers are ten to twenty digits and nothing else.
pub fn validate_phone(phone: &str) -> Result<(), AppError> {
    if phone.len() < 10 || !phone.chars().all(|c| c.is_ascii_digit()) {
        return Err(AppError::validation("Phone must be at least 10 digits"));
    }
    if phone.len() > MAX_PHONE_LEN {
        return Err(AppError::validation(format!(
            "Phone must be at most {MAX_PHONE_LEN} digits"
        )));
    }
    Ok(())
}

/// A single `@` with a non-empty local part and a dotted domain.
pub fn validate_email(email: &str) -> Result<(), AppError> {
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };
    if !valid {
        return Err(AppError::validation("Valid email is required"));
    }
    Ok(())
}

/// Usernames are three to fifty characters after trimming.
pub fn validate_username(username: &str) -> Result<(), AppError> {
    let len = username.trim().chars().count();
    if len < 3 {
        return Err(AppError::validation(
            "Username must be at least 3 characters",
        ));
    }
    if len > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Username must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

pub fn validate_role_name(name: &str) -> Result<(), AppError> {
    require_non_blank(name, "Role name")?;
    if name.trim().chars().count() > MAX_NAME_LEN {
        return Err(AppError::validation(format!(
            "Role name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(())
}

/// Reject empty or whitespace-only values.
pub fn require_non_blank(value: &str, field: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::validation(format!("{field} is required")));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phone() {
        assert!(validate_phone("5551234567").is_ok());
        assert!(validate_phone("555123456").is_err());
        assert!(validate_phone("555-123-4567").is_err());
        assert!(validate_phone(&"9".repeat(20)).is_ok());
        assert!(validate_phone(&"9".repeat(21)).is_err());
    }

    #[test]
    fn test_email() {
        assert!(validate_email("alice@x.com").is_ok());
        assert!(validate_email("alice@x").is_err());
        assert!(validate_email("@x.com").is_err());
        assert!(validate_email("a@b@x.com").is_err());
        assert!(validate_email("alice.x.com").is_err());
    }

    #[test]
    fn test_username() {
        assert!(validate_username("bob").is_ok());
        assert!(validate_username(" ab ").is_err());
        assert!(validate_username(&"u".repeat(50)).is_ok());
        assert!(validate_username(&"u".repeat(51)).is_err());
    }

    #[test]
    fn test_role_name() {
        assert!(validate_role_name("mentor").is_ok());
        assert!(validate_role_name("  ").is_err());
        assert!(validate_role_name(&"r".repeat(50)).is_ok());
        assert!(validate_role_name(&"r".repeat(51)).is_err());
    }
}
