//! Registration form controller
//!
//! Holds the form state a UI binds to and runs the submit, generate and
//! visibility-toggle actions. Rendering is left to the caller.

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::generator::{generate_password, GenerateError};
use crate::hasher::hash_password;
use crate::policy::{verify_password, PolicyViolation};
use crate::store::{CredentialStore, StoreError};

/// Delay between a successful registration and the form closing.
pub const CLOSE_DELAY: Duration = Duration::from_secs(5);

pub const DUPLICATE_MESSAGE: &str = "This password is already registered.";
pub const SUCCESS_MESSAGE: &str = "Password registered successfully.";

/// How the password field is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
    #[default]
    Masked,
    Revealed,
}

/// Severity of a feedback message, mapped by the UI to a colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackKind {
    /// Policy failure
    Error,
    /// Duplicate password
    Warning,
    Success,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

/// Result of a form submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitOutcome {
    Rejected(PolicyViolation),
    Duplicate,
    Registered,
}

impl SubmitOutcome {
    pub fn feedback(&self) -> Feedback {
        match self {
            SubmitOutcome::Rejected(violation) => Feedback {
                kind: FeedbackKind::Error,
                message: violation.to_string(),
            },
            SubmitOutcome::Duplicate => Feedback {
                kind: FeedbackKind::Warning,
                message: DUPLICATE_MESSAGE.to_string(),
            },
            SubmitOutcome::Registered => Feedback {
                kind: FeedbackKind::Success,
                message: SUCCESS_MESSAGE.to_string(),
            },
        }
    }

    /// Whether the form should close after [`CLOSE_DELAY`].
    pub fn closes_form(&self) -> bool {
        matches!(self, SubmitOutcome::Registered)
    }
}

pub struct RegistrationForm<S: CredentialStore> {
    store: S,
    username: String,
    password: SecretString,
    visibility: Visibility,
}

impl<S: CredentialStore> RegistrationForm<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            username: String::new(),
            password: SecretString::new(String::new().into()),
            visibility: Visibility::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn set_username(&mut self, username: impl Into<String>) {
        self.username = username.into();
    }

    pub fn password(&self) -> &SecretString {
        &self.password
    }

    pub fn set_password(&mut self, password: SecretString) {
        self.password = password;
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// Validates, hashes and stores the current password.
    ///
    /// Policy and duplicate failures are outcomes; only store I/O fails.
    pub fn submit(&self) -> Result<SubmitOutcome, StoreError> {
        let evaluation = verify_password(&self.password);
        if let Some(violation) = evaluation.violation {
            return Ok(SubmitOutcome::Rejected(violation));
        }

        let hash = hash_password(&self.password);
        if self.store.append_if_absent(&self.username, &hash)? {
            Ok(SubmitOutcome::Registered)
        } else {
            Ok(SubmitOutcome::Duplicate)
        }
    }

    /// Replaces the password field with a freshly generated password.
    pub fn generate(&mut self) -> Result<&SecretString, GenerateError> {
        #[cfg(feature = "async")]
        let password = generate_password(&self.store, None)?;

        #[cfg(not(feature = "async"))]
        let password = generate_password(&self.store)?;

        self.password = password;
        Ok(&self.password)
    }

    pub fn toggle_visibility(&mut self) -> Visibility {
        self.visibility = match self.visibility {
            Visibility::Masked => Visibility::Revealed,
            Visibility::Revealed => Visibility::Masked,
        };
        self.visibility
    }

    /// Password field contents as they should be drawn.
    pub fn displayed_password(&self) -> String {
        let pwd = self.password.expose_secret();
        match self.visibility {
            Visibility::Masked => "*".repeat(pwd.chars().count()),
            Visibility::Revealed => pwd.to_string(),
        }
    }

    /// Text for the show/hide button.
    pub fn toggle_label(&self) -> &'static str {
        match self.visibility {
            Visibility::Masked => "Show password",
            Visibility::Revealed => "Hide password",
        }
    }
}
