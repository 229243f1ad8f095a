//! Password registration library
//!
//! This library validates passwords against a fixed policy, stores their
//! SHA-256 digests in a JSON file while rejecting reused passwords, and
//! generates random passwords that satisfy the policy.
//!
//! # Features
//!
//! - `async` (default): Enables cancellable generation and channel delivery
//! - `tracing`: Enables logging via tracing crate
//!
//! # Environment Variables
//!
//! - `PWD_STORE_PATH`: Custom path to the credential store
//!   (default: `./passwords.json`)
//!
//! # Example
//!
//! ```rust,no_run
//! use pwd_registry::{
//!     hash_password, verify_password, CredentialStore, JsonFileStore,
//! };
//! use secrecy::SecretString;
//!
//! let store = JsonFileStore::from_env();
//! let password = SecretString::new("MyP@ssw0rd!".to_string().into());
//!
//! let evaluation = verify_password(&password);
//! if !evaluation.is_valid() {
//!     println!("{}", evaluation.reason());
//! } else if store.append_if_absent("alice", &hash_password(&password))? {
//!     println!("registered");
//! } else {
//!     println!("already registered");
//! }
//! # Ok::<(), pwd_registry::StoreError>(())
//! ```

// Internal modules
mod form;
mod generator;
mod hasher;
mod policy;
mod sections;
mod store;

// Public API
pub use form::{
    Feedback, FeedbackKind, RegistrationForm, SubmitOutcome, Visibility, CLOSE_DELAY,
    DUPLICATE_MESSAGE, SUCCESS_MESSAGE,
};
pub use generator::{generate_password, GenerateError, GENERATED_LENGTH, GENERATOR_ALPHABET};
pub use hasher::hash_password;
pub use policy::{
    verify_password, PolicyEvaluation, PolicyViolation, MIN_LENGTH, SPECIAL_CHARACTERS,
};
pub use store::{
    get_store_path, CredentialRecord, CredentialStore, JsonFileStore, MemoryStore, StoreError,
    DEFAULT_STORE_PATH,
};

#[cfg(feature = "async")]
pub use generator::generate_password_tx;
