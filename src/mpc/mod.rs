//! Additive (XOR) secret sharing of device keys.
//!
//! The device key is split into one share per compute party such that the
//! bytewise XOR of all shares is the secret and any proper subset is uniformly
//! random. Depending on the protocol variant, the shared secret is either the
//! raw AES-128 key or its expanded round-key schedule.
//!
//! # Components
//! - `share`: A single party's share and the full share set.
//! - `split`: Algorithm selection and share generation.
//! - `reconstruct`: XOR recombination of a complete share set.
//!
//! # Security
//! - **Zeroization**: Shares and prepared secrets are zeroized on drop.
//! - **No partial state**: Failures drop (and wipe) every share drawn so far.

pub mod share;
pub mod split;
pub mod reconstruct;

use core::fmt;
use core::str::FromStr;
use serde::{Deserialize, Serialize};

/// Number of compute parties in every splitting operation.
pub const PARTY_COUNT: usize = 3;

/// Errors for secret sharing operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MpcError {
    /// Requested key-splitting algorithm is not supported.
    UnsupportedAlgorithm,
    /// Secret length (carried) does not match any accepted size.
    UnsupportedKeySize(usize),
    /// Share count (carried) cannot form a sharing.
    InvalidShareCount(usize),
    /// Shares of one set differ in length.
    ShareLengthMismatch,
    /// Secret is empty.
    EmptySecret,
    /// Random number generator failure.
    RngFailure,
    /// Entropy source reports less than full entropy per byte.
    InsufficientEntropy,
}

impl fmt::Display for MpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MpcError::UnsupportedAlgorithm => write!(f, "Unsupported key-splitting algorithm"),
            MpcError::UnsupportedKeySize(len) => write!(f, "Unsupported key size: {} bytes", len),
            MpcError::InvalidShareCount(n) => write!(f, "Invalid share count: {}", n),
            MpcError::ShareLengthMismatch => write!(f, "Share lengths differ"),
            MpcError::EmptySecret => write!(f, "Secret is empty"),
            MpcError::RngFailure => write!(f, "Random number generator failure"),
            MpcError::InsufficientEntropy => write!(f, "Entropy source below full entropy"),
        }
    }
}

impl std::error::Error for MpcError {}

/// Key-splitting algorithms understood by the compute parties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    /// AES-128 in GCM mode; the device key is 16 bytes.
    AesGcm128,
}

impl Algorithm {
    /// Name as it appears on the wire and in request contexts.
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::AesGcm128 => "AES-GCM-128",
        }
    }

    /// Length of the device key this algorithm expects.
    pub fn key_len(&self) -> usize {
        match self {
            Algorithm::AesGcm128 => crate::core::key_schedule::AES128_KEY_LEN,
        }
    }
}

impl FromStr for Algorithm {
    type Err = MpcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "AES-GCM-128" => Ok(Algorithm::AesGcm128),
            _ => Err(MpcError::UnsupportedAlgorithm),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What is shared, and how request contexts are tagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProtocolVariant {
    /// Earlier protocol: 16-byte shares of the raw key, no separation tag.
    RawKey,
    /// Current protocol: 176-byte shares of the AES-128 key schedule, request
    /// contexts start with a separation tag.
    #[default]
    KeySchedule,
}

impl ProtocolVariant {
    /// Whether request contexts carry a leading separation tag.
    pub fn tags_requests(&self) -> bool {
        matches!(self, ProtocolVariant::KeySchedule)
    }
}
