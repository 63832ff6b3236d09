//! Secret recombination from a complete share set.
//!
//! XOR sharing has no threshold: every share is required. This is the
//! party-side inverse of `split`, used by tooling and tests.

use zeroize::Zeroizing;
use crate::core::xor::xor_into;
use crate::mpc::share::ShareSet;
use crate::mpc::MpcError;

/// XORs all shares together.
///
/// # Returns
/// * `Ok(secret)` - The recombined secret.
/// * `Err(MpcError::InvalidShareCount)` if the set contains duplicate party indices.
pub fn combine_shares(shares: &ShareSet) -> Result<Zeroizing<Vec<u8>>, MpcError> {
    let all = shares.shares();
    for i in 0..all.len() {
        for j in (i + 1)..all.len() {
            if all[i].party_index == all[j].party_index {
                return Err(MpcError::InvalidShareCount(all.len()));
            }
        }
    }

    let mut secret = Zeroizing::new(vec![0u8; shares.share_len()]);
    for share in shares {
        xor_into(&mut secret, share.value());
    }
    Ok(secret)
}
