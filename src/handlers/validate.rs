//! Hand-rolled input validators. Malformed shapes are rejected here before
//! any handler reaches the services.

use std::collections::HashMap;

use crate::error::ApiError;

pub const MIN_PASSWORD_LENGTH: usize = 5;

/// Basic email format check
pub fn email(value: &str) -> Result<(), String> {
    if value.is_empty() {
        return Err("Email cannot be empty".to_string());
    }

    let parts: Vec<&str> = value.split('@').collect();
    if parts.len() != 2 || parts[0].is_empty() || parts[1].is_empty() || !parts[1].contains('.') {
        return Err("Invalid email format".to_string());
    }

    Ok(())
}

/// Accepts common phone shapes: optional +CC prefix, digits with
/// space/dot/dash/parenthesis separators, 10-12 digits total.
pub fn phone(value: &str) -> Result<(), String> {
    let invalid = || "Phone must be a valid phone number".to_string();

    if !value
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '.' | '-' | '(' | ')' | '+'))
    {
        return Err(invalid());
    }
    if value.chars().filter(|c| *c == '+').count() > 1 || value.contains('+') && !value.starts_with('+') {
        return Err(invalid());
    }

    let digits = value.chars().filter(char::is_ascii_digit).count();
    if !(10..=12).contains(&digits) {
        return Err(invalid());
    }

    Ok(())
}

pub fn password(value: &str) -> Result<(), String> {
    if value.len() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

pub fn non_empty(value: &str, label: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        return Err(format!("{} cannot be empty", label));
    }
    Ok(())
}

/// Collect per-field failures into a single 400 ValidationError.
pub fn collect(checks: Vec<(&str, Result<(), String>)>) -> Result<(), ApiError> {
    let field_errors: HashMap<String, String> = checks
        .into_iter()
        .filter_map(|(field, result)| result.err().map(|msg| (field.to_string(), msg)))
        .collect();

    if field_errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::validation_error("Invalid request", Some(field_errors)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_email() {
        assert!(email("damola@example.com").is_ok());
    }

    #[test]
    fn rejects_malformed_emails() {
        assert!(email("").is_err());
        assert!(email("no-at-sign.com").is_err());
        assert!(email("@example.com").is_err());
        assert!(email("user@nodot").is_err());
    }

    #[test]
    fn accepts_common_phone_shapes() {
        assert!(phone("(816) 363 5839").is_ok());
        assert!(phone("816-363-5839").is_ok());
        assert!(phone("+1 816.363.5839").is_ok());
    }

    #[test]
    fn rejects_bad_phones() {
        assert!(phone("12345").is_err());
        assert!(phone("call-me-maybe").is_err());
        assert!(phone("81+6 363 5839").is_err());
    }

    #[test]
    fn enforces_password_min_length() {
        assert!(password("abcd").is_err());
        assert!(password("abcde").is_ok());
    }

    #[test]
    fn collect_builds_field_error_map() {
        let err = collect(vec![
            ("email", email("bad")),
            ("password", password("ok-password")),
            ("name", non_empty(" ", "Name")),
        ])
        .unwrap_err();

        assert_eq!(err.status_code(), 400);
        let body = err.to_json();
        assert!(body["field_errors"].get("email").is_some());
        assert!(body["field_errors"].get("name").is_some());
        assert!(body["field_errors"].get("password").is_none());
    }
}
