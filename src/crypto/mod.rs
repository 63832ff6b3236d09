//! Public-key and symmetric primitives, composed for the share and result paths.
//!
//! Nothing in this module reaches for ambient crypto state: every operation
//! receives a [`PrimitiveProvider`] capability from its caller. The default
//! provider is [`RustCryptoProvider`]; tests substitute their own.
//!
//! # Components
//! - `provider`: The capability trait and its RustCrypto implementation.
//! - `oaep`: RSA-OAEP (SHA-256, MGF1-SHA-256) with a binary label.
//! - `party`: Compute-party identities and SPKI import.
//! - `share_encrypt`: Label-bound encryption of one share to one party.
//! - `result`: Context-nonce AES-GCM reconstruction of computed results.

pub mod provider;
pub mod oaep;
pub mod party;
pub mod share_encrypt;
pub mod result;

pub use party::{Party, PartyInfo};
pub use provider::{PrimitiveProvider, RustCryptoProvider};

use core::fmt;

/// AES-GCM nonce length (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-GCM tag length (128 bits).
pub const TAG_LEN: usize = 16;

/// Errors raised by the cryptographic primitives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// The primitive rejected an encryption (carried text is the primitive's reason).
    EncryptionFailure(String),
    /// Authenticated decryption failed: wrong key, wrong context/label, or
    /// corrupted ciphertext. Deliberately carries no detail.
    AuthenticationFailed,
    /// Public key could not be decoded or imported.
    InvalidPublicKey(String),
    /// Symmetric key has the wrong length (carried).
    InvalidKeyLength(usize),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::EncryptionFailure(reason) => write!(f, "Encryption failed: {}", reason),
            CryptoError::AuthenticationFailed => write!(f, "Authentication failed"),
            CryptoError::InvalidPublicKey(reason) => write!(f, "Invalid public key: {}", reason),
            CryptoError::InvalidKeyLength(len) => write!(f, "Invalid symmetric key length: {} bytes", len),
        }
    }
}

impl std::error::Error for CryptoError {}
