//! Random password generator.

use rand::Rng;
use rand::rngs::OsRng;
use secrecy::SecretString;
use thiserror::Error;

#[cfg(feature = "async")]
use std::sync::Arc;

#[cfg(feature = "async")]
use tokio::sync::mpsc;

#[cfg(feature = "async")]
use tokio_util::sync::CancellationToken;

use crate::hasher::hash_password;
use crate::policy::verify_password;
use crate::store::{CredentialStore, StoreError};

/// Length of generated passwords.
pub const GENERATED_LENGTH: usize = 12;

/// Alphabet generated passwords are drawn from (72 symbols).
pub const GENERATOR_ALPHABET: &[u8] =
    b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789!@#$%^&*";

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Duplicate check failed: {0}")]
    Store(#[from] StoreError),
    #[error("Password generation cancelled")]
    Cancelled,
}

fn draw_candidate<R: Rng>(rng: &mut R) -> SecretString {
    let candidate: String = (0..GENERATED_LENGTH)
        .map(|_| GENERATOR_ALPHABET[rng.gen_range(0..GENERATOR_ALPHABET.len())] as char)
        .collect();
    SecretString::new(candidate.into())
}

/// Draws candidates from `rng` until one passes the policy and is not in `store`.
///
/// There is no attempt cap; `is_cancelled` is polled before every draw.
pub(crate) fn generate_with_rng<R: Rng>(
    rng: &mut R,
    store: &dyn CredentialStore,
    is_cancelled: impl Fn() -> bool,
) -> Result<SecretString, GenerateError> {
    loop {
        if is_cancelled() {
            return Err(GenerateError::Cancelled);
        }

        let candidate = draw_candidate(rng);
        if !verify_password(&candidate).is_valid() {
            continue;
        }
        if store.exists_by_hash(&hash_password(&candidate))? {
            #[cfg(feature = "tracing")]
            tracing::debug!("Generated candidate already registered, retrying");
            continue;
        }

        return Ok(candidate);
    }
}

/// Generates a random password that satisfies the policy and is not already
/// registered in `store`.
///
/// Characters come from the operating system's secure random source. Nothing
/// is persisted.
///
/// # Arguments
/// * `store` - Store consulted for the duplicate check
/// * `token` - Optional cancellation token (async feature only)
///
/// # Errors
/// Returns [`GenerateError::Store`] if the store cannot be read and
/// [`GenerateError::Cancelled`] if the token fires.
pub fn generate_password(
    store: &dyn CredentialStore,
    #[cfg(feature = "async")] token: Option<CancellationToken>,
) -> Result<SecretString, GenerateError> {
    #[cfg(feature = "async")]
    let is_cancelled = || token.as_ref().is_some_and(|t| t.is_cancelled());

    #[cfg(not(feature = "async"))]
    let is_cancelled = || false;

    generate_with_rng(&mut OsRng, store, is_cancelled)
}

/// Async version that sends the generated password via channel.
///
/// The draw loop runs on the blocking pool, so the calling executor stays free
/// and can cancel `token` while generation is in progress.
#[cfg(feature = "async")]
pub async fn generate_password_tx(
    store: Arc<dyn CredentialStore>,
    token: CancellationToken,
    tx: mpsc::Sender<Result<SecretString, GenerateError>>,
) {
    #[cfg(feature = "tracing")]
    tracing::info!("password generation is about to start...");

    let handle =
        tokio::task::spawn_blocking(move || generate_password(store.as_ref(), Some(token)));
    let result = match handle.await {
        Ok(result) => result,
        Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
        // runtime shutting down
        Err(_) => Err(GenerateError::Cancelled),
    };

    if tx.send(result).await.is_err() {
        #[cfg(feature = "tracing")]
        tracing::error!("Failed to send generated password: receiver dropped");
    }
}
