//! Input checks applied before any service touches storage.

use domains::{DomainError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MIN_PASSWORD_CHARS: usize = 6;
const MAX_EMAIL_LEN: usize = 254;

// Hardcoded pattern; a failure here is a source bug, not a runtime condition.
static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("hardcoded email regex is invalid - fix source code")
});

pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(DomainError::validation("Name is required"));
    }
    Ok(())
}

/// Simplified RFC 5322 shape check.
pub fn validate_email(email: &str) -> Result<()> {
    let email = email.trim();
    if email.is_empty() || email.len() > MAX_EMAIL_LEN || !EMAIL_REGEX.is_match(email) {
        return Err(DomainError::validation("Please include a valid email"));
    }
    Ok(())
}

pub fn validate_password(password: &str) -> Result<()> {
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(DomainError::validation(format!(
            "Please enter a password with {MIN_PASSWORD_CHARS} or more characters"
        )));
    }
    Ok(())
}

pub fn validate_post_text(text: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(DomainError::validation("Text is required"));
    }
    Ok(())
}

/// Emails are compared case-insensitively and without surrounding whitespace.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
