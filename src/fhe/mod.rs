//! Homomorphic (CKKS) result decryption.
//!
//! For analyses run under homomorphic encryption the orchestration service
//! returns a serialized crypto context, ciphertext and secret key. This module
//! hands them to the external engine, decrypts, and turns the leading slots of
//! the plaintext into a probability vector.
//!
//! # Components
//! - `engine`: The engine trait and the scoped session that releases its resources.
//! - `plaintext`: Coefficient extraction and softmax.

pub mod engine;
pub mod plaintext;

pub use engine::{EngineSession, HomomorphicEngine};

use base64::alphabet::URL_SAFE;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine as _;
use core::fmt;
use serde::{Deserialize, Serialize};
use zeroize::{Zeroize, ZeroizeOnDrop, Zeroizing};

/// URL-safe alphabet, padding optional: the form the service emits for binary objects.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Errors from the homomorphic path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FheError {
    /// The engine failed to deserialize or decrypt (carried text is the engine's).
    HomomorphicEngineError(String),
    /// Decrypted plaintext could not be read as coefficients.
    MalformedPlaintext(String),
    /// A binary-serialized object was not valid base64.
    InvalidEncoding,
    /// Requested coefficient count (carried) is unusable.
    InvalidCoefficientCount(usize),
}

impl fmt::Display for FheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FheError::HomomorphicEngineError(msg) => write!(f, "Homomorphic engine error: {}", msg),
            FheError::MalformedPlaintext(msg) => write!(f, "Malformed plaintext: {}", msg),
            FheError::InvalidEncoding => write!(f, "Invalid serialized object encoding"),
            FheError::InvalidCoefficientCount(n) => write!(f, "Invalid coefficient count: {}", n),
        }
    }
}

impl std::error::Error for FheError {}

/// How the engine objects in a bundle are serialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SerializationType {
    /// Engine JSON serialization; strings are passed through as bytes.
    #[default]
    Json,
    /// Engine binary serialization, transported as URL-safe base64.
    Binary,
}

/// Serialized engine objects for one result. Request-scoped.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop, Serialize, Deserialize)]
pub struct HomomorphicBundle {
    pub crypto_context: String,
    pub ciphertext: String,
    pub secret_key: String,
}

impl fmt::Debug for HomomorphicBundle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HomomorphicBundle")
            .field("crypto_context_len", &self.crypto_context.len())
            .field("ciphertext_len", &self.ciphertext.len())
            .field("secret_key", &"***SENSITIVE***")
            .finish()
    }
}

impl HomomorphicBundle {
    pub fn new(
        crypto_context: impl Into<String>,
        ciphertext: impl Into<String>,
        secret_key: impl Into<String>,
    ) -> Self {
        Self {
            crypto_context: crypto_context.into(),
            ciphertext: ciphertext.into(),
            secret_key: secret_key.into(),
        }
    }
}

/// Converts a transported object into the bytes the engine deserializes.
pub fn decode_serialized(encoded: &str, format: SerializationType) -> Result<Zeroizing<Vec<u8>>, FheError> {
    match format {
        SerializationType::Json => Ok(Zeroizing::new(encoded.as_bytes().to_vec())),
        SerializationType::Binary => URL_SAFE_LENIENT
            .decode(encoded.trim())
            .map(Zeroizing::new)
            .map_err(|_| FheError::InvalidEncoding),
    }
}

/// Decrypts a CKKS result and returns the softmax of its first `coefficients` slots.
///
/// Engine resources are acquired for the duration of the call and released on
/// every exit path.
pub fn decrypt_homomorphic<E: HomomorphicEngine + ?Sized>(
    engine: &E,
    bundle: &HomomorphicBundle,
    format: SerializationType,
    coefficients: usize,
) -> Result<Vec<f64>, FheError> {
    if coefficients == 0 {
        return Err(FheError::InvalidCoefficientCount(coefficients));
    }

    let context_bytes = decode_serialized(&bundle.crypto_context, format)?;
    let ciphertext_bytes = decode_serialized(&bundle.ciphertext, format)?;
    let secret_key_bytes = decode_serialized(&bundle.secret_key, format)?;

    let text = {
        let session = EngineSession::acquire(engine);
        let context = session.deserialize_context(&context_bytes, format)?;
        let ciphertext = session.deserialize_ciphertext(&ciphertext_bytes, format)?;
        let secret_key = session.deserialize_secret_key(&secret_key_bytes, format)?;
        session.decrypt(&context, &secret_key, &ciphertext, coefficients)?
    };

    let values = plaintext::parse_coefficients(&text, coefficients)?;
    log::debug!("Decrypted {} homomorphic result coefficients", values.len());
    Ok(plaintext::softmax(&values))
}
