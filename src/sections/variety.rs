//! Character variety sections - uppercase, lowercase and digit presence.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;
use crate::policy::PolicyViolation;

fn require(
    password: &SecretString,
    pred: fn(char) -> bool,
    violation: PolicyViolation,
) -> SectionResult {
    if password.expose_secret().chars().any(pred) {
        Ok(())
    } else {
        Err(violation)
    }
}

/// Checks for at least one uppercase letter.
pub fn uppercase_section(password: &SecretString) -> SectionResult {
    require(password, char::is_uppercase, PolicyViolation::MissingUppercase)
}

/// Checks for at least one lowercase letter.
pub fn lowercase_section(password: &SecretString) -> SectionResult {
    require(password, char::is_lowercase, PolicyViolation::MissingLowercase)
}

/// Checks for at least one digit, in any script.
pub fn digit_section(password: &SecretString) -> SectionResult {
    require(password, char::is_numeric, PolicyViolation::MissingDigit)
}
