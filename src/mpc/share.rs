//! Key share definitions.
//!
//! A share is addressed to one compute party (1-based `party_index`) and
//! carries as many bytes as the shared secret.
//!
//! # Security
//! - Implements `Zeroize` and `ZeroizeOnDrop` to wipe share bytes.
//! - `Debug` redacts the value.

use core::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};
use super::MpcError;

/// One party's share of a secret.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct Share {
    /// Which party (1..=N) this share is for. Public.
    #[zeroize(skip)]
    pub party_index: u8,

    /// Share bytes. Highly sensitive.
    value: Vec<u8>,
}

impl fmt::Debug for Share {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Share")
            .field("party_index", &self.party_index)
            .field("length", &self.value.len())
            .field("value", &"***SENSITIVE***")
            .finish()
    }
}

impl Share {
    /// Creates a share; the index must be non-zero and the value non-empty.
    pub fn new(party_index: u8, value: Vec<u8>) -> Result<Self, MpcError> {
        if party_index == 0 {
            return Err(MpcError::InvalidShareCount(0));
        }
        if value.is_empty() {
            return Err(MpcError::EmptySecret);
        }
        Ok(Self { party_index, value })
    }

    pub fn value(&self) -> &[u8] {
        &self.value
    }

    pub fn len(&self) -> usize {
        self.value.len()
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

/// A complete set of equal-length shares, one per party, in party order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareSet {
    shares: Vec<Share>,
}

impl ShareSet {
    /// Assembles a set, checking the equal-length invariant.
    pub fn new(shares: Vec<Share>) -> Result<Self, MpcError> {
        if shares.len() < 2 {
            return Err(MpcError::InvalidShareCount(shares.len()));
        }
        let len = shares[0].len();
        if shares.iter().any(|s| s.len() != len) {
            return Err(MpcError::ShareLengthMismatch);
        }
        Ok(Self { shares })
    }

    pub fn shares(&self) -> &[Share] {
        &self.shares
    }

    /// Number of shares in the set.
    pub fn len(&self) -> usize {
        self.shares.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shares.is_empty()
    }

    /// Length of each share (and of the secret).
    pub fn share_len(&self) -> usize {
        self.shares[0].len()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Share> {
        self.shares.iter()
    }

    pub fn into_shares(self) -> Vec<Share> {
        self.shares
    }
}

impl<'a> IntoIterator for &'a ShareSet {
    type Item = &'a Share;
    type IntoIter = core::slice::Iter<'a, Share>;

    fn into_iter(self) -> Self::IntoIter {
        self.shares.iter()
    }
}
