//! Password policy validator - main verification logic.

use secrecy::SecretString;
use thiserror::Error;

use crate::sections::{
    digit_section, length_section, lowercase_section, special_character_section,
    uppercase_section, SectionResult,
};

/// Minimum number of characters a password must have.
pub const MIN_LENGTH: usize = 8;

/// Characters accepted by the special character rule.
pub const SPECIAL_CHARACTERS: &str = "!@#$%^&*";

/// A policy rule the password does not meet.
///
/// Variants are listed in evaluation order.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyViolation {
    #[error("Password must be at least 8 characters.")]
    TooShort,
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
    #[error("Password must contain at least one digit.")]
    MissingDigit,
    #[error("Password must contain at least one special character (!, @, #, $, %, ^, &, *).")]
    MissingSpecial,
}

/// Outcome of [`verify_password`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyEvaluation {
    /// First rule that failed, `None` if the password is accepted.
    pub violation: Option<PolicyViolation>,
}

impl PolicyEvaluation {
    pub fn is_valid(&self) -> bool {
        self.violation.is_none()
    }

    /// Human-readable reason for the failure, empty when valid.
    pub fn reason(&self) -> String {
        self.violation.map(|v| v.to_string()).unwrap_or_default()
    }
}

/// Verifies a password against the registration policy.
///
/// Rules run in a fixed order and the first failing one is reported:
/// length, uppercase, lowercase, digit, special character.
/// Any input, including the empty string, is classified.
pub fn verify_password(password: &SecretString) -> PolicyEvaluation {
    let sections: [fn(&SecretString) -> SectionResult; 5] = [
        length_section,
        uppercase_section,
        lowercase_section,
        digit_section,
        special_character_section,
    ];

    for section_fn in sections {
        if let Err(violation) = section_fn(password) {
            #[cfg(feature = "tracing")]
            tracing::debug!("Password rejected by policy: {:?}", violation);
            return PolicyEvaluation {
                violation: Some(violation),
            };
        }
    }

    PolicyEvaluation { violation: None }
}
