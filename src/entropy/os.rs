//! Operating-system CSPRNG source.

use rand_core::{OsRng, RngCore};
use super::{EntropyError, EntropySource};

/// Entropy drawn from the platform CSPRNG (`getrandom`).
#[derive(Debug, Clone, Copy, Default)]
pub struct OsEntropy;

impl OsEntropy {
    pub fn new() -> Self {
        Self
    }
}

impl EntropySource for OsEntropy {
    fn name(&self) -> &'static str {
        "OsRng"
    }

    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        OsRng.try_fill_bytes(dest).map_err(|e| {
            log::warn!("OS entropy source failed: {}", e);
            EntropyError::CollectionFailed
        })
    }

    fn entropy_estimate(&self) -> f64 {
        8.0
    }
}
