//! Password policy sections
//!
//! Each section checks a single rule of the registration policy.

mod length;
mod special;
mod variety;

pub use length::length_section;
pub use special::special_character_section;
pub use variety::{digit_section, lowercase_section, uppercase_section};

use crate::policy::PolicyViolation;

/// Result type for section functions.
/// - `Ok(())` - Section passed
/// - `Err(violation)` - Rule not met
pub type SectionResult = Result<(), PolicyViolation>;
