//! The external homomorphic-encryption engine interface.
//!
//! The engine (an OpenFHE build, in practice) owns native objects that are not
//! reclaimed by Rust ownership: deserialized contexts and keys stay registered
//! in the engine until it is told to release them. [`EngineSession`] ties that
//! release to scope, so every exit path of a decryption (including `?` and
//! panics) hands the resources back.

use core::ops::Deref;
use super::{FheError, SerializationType};

/// Operations this crate needs from a CKKS engine.
///
/// Errors are produced by the engine as `FheError::HomomorphicEngineError`
/// and propagated unmodified. If the engine requires globally serialized
/// access, callers must serialize calls into it themselves.
pub trait HomomorphicEngine {
    type CryptoContext;
    type Ciphertext;
    type SecretKey;

    /// Engine identifier for logs.
    fn name(&self) -> &'static str;

    fn deserialize_context(
        &self,
        bytes: &[u8],
        format: SerializationType,
    ) -> Result<Self::CryptoContext, FheError>;

    fn deserialize_ciphertext(
        &self,
        bytes: &[u8],
        format: SerializationType,
    ) -> Result<Self::Ciphertext, FheError>;

    fn deserialize_secret_key(
        &self,
        bytes: &[u8],
        format: SerializationType,
    ) -> Result<Self::SecretKey, FheError>;

    /// Decrypts `ciphertext` and returns the engine's textual rendering of the
    /// plaintext truncated to `length` slots, e.g. `(0.98, 2.01, ... )`.
    fn decrypt(
        &self,
        context: &Self::CryptoContext,
        secret_key: &Self::SecretKey,
        ciphertext: &Self::Ciphertext,
        length: usize,
    ) -> Result<String, FheError>;

    /// Releases every context (and the objects hanging off it) the engine holds.
    fn release_all_contexts(&self);
}

/// Scoped access to an engine; releases all engine contexts on drop.
///
/// Handles obtained through a session must be declared after it so that they
/// are dropped before the release runs.
pub struct EngineSession<'a, E: HomomorphicEngine + ?Sized> {
    engine: &'a E,
}

impl<'a, E: HomomorphicEngine + ?Sized> EngineSession<'a, E> {
    pub fn acquire(engine: &'a E) -> Self {
        log::debug!("Acquired homomorphic engine session ({})", engine.name());
        Self { engine }
    }
}

impl<'a, E: HomomorphicEngine + ?Sized> Deref for EngineSession<'a, E> {
    type Target = E;

    fn deref(&self) -> &E {
        self.engine
    }
}

impl<'a, E: HomomorphicEngine + ?Sized> Drop for EngineSession<'a, E> {
    fn drop(&mut self) {
        self.engine.release_all_contexts();
        log::debug!("Released homomorphic engine contexts ({})", self.engine.name());
    }
}
