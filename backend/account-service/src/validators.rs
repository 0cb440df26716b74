use once_cell::sync::Lazy;
use regex::Regex;

/// Input validation utilities for the account service

// Compiled once at first use; the pattern is hardcoded and always valid.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

/// Minimum password length, enforced uniformly at registration, change, and reset.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Validate email format (RFC 5322 simplified)
pub fn validate_email(email: &str) -> bool {
    !email.is_empty() && email.len() <= 254 && EMAIL_REGEX.is_match(email)
}

pub fn validate_password_length(password: &str) -> bool {
    password.len() >= MIN_PASSWORD_LEN
}

/// Unwrap a required request field, treating an absent or empty value the
/// same way. The message is reported verbatim to the client.
pub fn require_field<'a>(value: Option<&'a str>, message: &str) -> crate::error::ApiResult<&'a str> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(crate::error::ApiError::Validation(message.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        assert!(validate_email("user@example.com"));
        assert!(validate_email("alice@example.com"));
        assert!(validate_email("test.user+tag@sub.example.co.uk"));
    }

    #[test]
    fn test_invalid_email() {
        assert!(!validate_email(""));
        assert!(!validate_email("invalid"));
        assert!(!validate_email("@example.com"));
        assert!(!validate_email("user@"));
        assert!(!validate_email("user@example"));
        assert!(!validate_email("user name@example.com"));
    }

    #[test]
    fn test_email_length_bound() {
        let local = "a".repeat(250);
        assert!(!validate_email(&format!("{}@example.com", local)));
    }

    #[test]
    fn test_password_length() {
        assert!(validate_password_length("secret1"));
        assert!(validate_password_length("123456"));
        assert!(!validate_password_length("12345"));
        assert!(!validate_password_length(""));
    }

    #[test]
    fn test_require_field() {
        assert_eq!(require_field(Some("alice"), "missing").unwrap(), "alice");

        let err = require_field(None, "Please enter your first name").unwrap_err();
        assert!(err.to_string().contains("first name"));

        let err = require_field(Some(""), "Please enter your first name").unwrap_err();
        assert!(err.to_string().contains("first name"));
    }
}
