//! Special character section.

use secrecy::{ExposeSecret, SecretString};
use super::SectionResult;
use crate::policy::{PolicyViolation, SPECIAL_CHARACTERS};

/// Checks for at least one character from the fixed special set `!@#$%^&*`.
///
/// Other punctuation does not count.
pub fn special_character_section(password: &SecretString) -> SectionResult {
    if password
        .expose_secret()
        .chars()
        .any(|c| SPECIAL_CHARACTERS.contains(c))
    {
        return Ok(());
    }
    Err(PolicyViolation::MissingSpecial)
}
