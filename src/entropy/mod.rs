//! Randomness capability.
//!
//! Share generation never reaches for an ambient RNG: every call that needs
//! fresh bytes receives an [`EntropySource`] from its caller. Production code
//! passes [`OsEntropy`]; tests pass deterministic sources.

pub mod os;

pub use os::OsEntropy;

use core::fmt;

/// Estimate a source must report to be used for key shares.
pub const FULL_ENTROPY_PER_BYTE: f64 = 8.0;

/// Error types for entropy collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntropyError {
    /// Failed to collect the requested bytes.
    CollectionFailed,
}

impl fmt::Display for EntropyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntropyError::CollectionFailed => write!(f, "Entropy collection failed"),
        }
    }
}

impl std::error::Error for EntropyError {}

/// A trait for entropy sources.
pub trait EntropySource {
    /// Returns a unique identifier for the source.
    fn name(&self) -> &'static str;

    /// Fills `dest` with random bytes from the source.
    ///
    /// # Returns
    /// * `Ok(())` on success.
    /// * `Err(EntropyError)` if the source fails; `dest` contents are then
    ///   unspecified and must not be used.
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError>;

    /// Returns the estimated entropy per byte (in bits, 0.0-8.0).
    ///
    /// Share generation refuses sources below [`FULL_ENTROPY_PER_BYTE`].
    fn entropy_estimate(&self) -> f64;
}
