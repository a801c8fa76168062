//! Input validation for API requests.
//!
//! Field checks return `Result<(), String>` so handlers can surface the
//! message as a 400.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Regex for validating email addresses (pragmatic, not RFC-complete)
    static ref EMAIL_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$"
    ).unwrap();

    /// Regex for validating phone numbers (digits with optional separators)
    static ref PHONE_REGEX: Regex = Regex::new(
        r"^\+?[0-9(][0-9 ().-]{5,19}$"
    ).unwrap();
}

/// Validate that a required text field is present
pub fn validate_required(value: &str, field: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} is required", field));
    }
    Ok(())
}

/// Validate an email address
pub fn validate_email(email: &str) -> Result<(), String> {
    validate_required(email, "Email")?;

    if email.len() > 254 {
        return Err("Email is too long".to_string());
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err("Invalid email address".to_string());
    }

    Ok(())
}

/// Validate a phone number
pub fn validate_phone(phone: &str) -> Result<(), String> {
    validate_required(phone, "Phone")?;

    if !PHONE_REGEX.is_match(phone) {
        return Err("Invalid phone number".to_string());
    }

    Ok(())
}

/// Validate a password
pub fn validate_password(password: &str) -> Result<(), String> {
    if password.len() < 6 {
        return Err("Password must be at least 6 characters".to_string());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_required() {
        assert!(validate_required("Bread", "Title").is_ok());
        assert!(validate_required("", "Title").is_err());
        assert!(validate_required("   ", "Title").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ama@example.com").is_ok());
        assert!(validate_email("a.b+tag@sub.example.org").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("not-an-email").is_err());
        assert!(validate_email("missing@tld").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("0241234567").is_ok());
        assert!(validate_phone("+233 24 123 4567").is_ok());
        assert!(validate_phone("(555) 010-0100").is_ok());
        assert!(validate_phone("").is_err());
        assert!(validate_phone("abc").is_err());
    }

    #[test]
    fn test_validate_password() {
        assert!(validate_password("hunter22").is_ok());
        assert!(validate_password("short").is_err());
    }
}
