//! Share generation.
//!
//! `share[0..n-1]` are drawn uniformly at random; the final share is
//! `secret ^ share[0] ^ ... ^ share[n-2]`, so the XOR of all shares is the
//! secret and any `n - 1` of them are independent of it.

use zeroize::Zeroizing;
use crate::core::key_schedule::{expand_aes128, AES128_KEY_LEN, AES128_SCHEDULE_LEN};
use crate::core::xor::xor_into;
use crate::entropy::{EntropySource, FULL_ENTROPY_PER_BYTE};
use crate::mpc::share::{Share, ShareSet};
use crate::mpc::{Algorithm, MpcError, ProtocolVariant};

/// Produces the byte string that is actually shared: the raw key, or its
/// expanded schedule.
///
/// # Returns
/// * `Err(MpcError::UnsupportedKeySize)` if `key` is not the algorithm's key length.
pub fn prepare_secret(
    algorithm: Algorithm,
    key: &[u8],
    variant: ProtocolVariant,
) -> Result<Zeroizing<Vec<u8>>, MpcError> {
    if key.len() != algorithm.key_len() {
        return Err(MpcError::UnsupportedKeySize(key.len()));
    }

    match (algorithm, variant) {
        (Algorithm::AesGcm128, ProtocolVariant::RawKey) => Ok(Zeroizing::new(key.to_vec())),
        (Algorithm::AesGcm128, ProtocolVariant::KeySchedule) => {
            let mut raw = Zeroizing::new([0u8; AES128_KEY_LEN]);
            raw.copy_from_slice(key);
            let schedule = expand_aes128(&raw);
            Ok(Zeroizing::new(schedule.to_vec()))
        }
    }
}

/// Splits `secret` into `share_count` XOR shares.
///
/// # Arguments
/// * `secret` - 16 bytes (raw AES-128 key) or 176 bytes (AES-128 key schedule).
/// * `share_count` - Number of shares, at least 2.
/// * `rng` - Source of the `share_count - 1` random shares.
///
/// # Returns
/// * `Ok(ShareSet)` with shares indexed 1..=share_count.
/// * `Err(MpcError)` on a bad length or count, a source reporting less than
///   full entropy, or RNG failure. Nothing drawn before the failure survives it.
pub fn split_secret<R: EntropySource + ?Sized>(
    secret: &[u8],
    share_count: usize,
    rng: &mut R,
) -> Result<ShareSet, MpcError> {
    if secret.len() != AES128_KEY_LEN && secret.len() != AES128_SCHEDULE_LEN {
        return Err(MpcError::UnsupportedKeySize(secret.len()));
    }
    if share_count < 2 || share_count > u8::MAX as usize {
        return Err(MpcError::InvalidShareCount(share_count));
    }
    let estimate = rng.entropy_estimate();
    if estimate.is_nan() || estimate < FULL_ENTROPY_PER_BYTE {
        log::warn!("Entropy source '{}' reports {} bits/byte; refusing to generate shares", rng.name(), estimate);
        return Err(MpcError::InsufficientEntropy);
    }

    let mut shares = Vec::with_capacity(share_count);
    let mut last = Zeroizing::new(secret.to_vec());

    for i in 0..share_count - 1 {
        let mut value = Zeroizing::new(vec![0u8; secret.len()]);
        if let Err(e) = rng.fill(&mut value) {
            log::warn!("Entropy source '{}' failed during share generation: {}", rng.name(), e);
            return Err(MpcError::RngFailure);
        }
        xor_into(&mut last, &value);
        shares.push(Share::new((i + 1) as u8, value.to_vec())?);
    }
    shares.push(Share::new(share_count as u8, last.to_vec())?);

    log::debug!("Split {}-byte secret into {} shares", secret.len(), share_count);
    ShareSet::new(shares)
}

/// Validates the algorithm, prepares the secret for `variant`, and splits it.
///
/// The algorithm name is checked before the key is inspected and before any
/// randomness is drawn.
pub fn split_key<R: EntropySource + ?Sized>(
    algorithm: &str,
    key: &[u8],
    variant: ProtocolVariant,
    share_count: usize,
    rng: &mut R,
) -> Result<ShareSet, MpcError> {
    let algorithm: Algorithm = algorithm.parse()?;
    let secret = prepare_secret(algorithm, key, variant)?;
    split_secret(&secret, share_count, rng)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mpc::reconstruct::combine_shares;
    use crate::mpc::PARTY_COUNT;
    use crate::entropy::EntropyError;
    use crate::testing::{CountingEntropy, FailingEntropy, MockEntropy};

    /// Counts draws like `CountingEntropy` but reports a configurable estimate.
    struct WeakEntropy {
        estimate: f64,
        bytes_drawn: usize,
    }

    impl EntropySource for WeakEntropy {
        fn name(&self) -> &'static str { "Weak" }
        fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
            self.bytes_drawn += dest.len();
            dest.fill(0);
            Ok(())
        }
        fn entropy_estimate(&self) -> f64 { self.estimate }
    }

    #[test]
    fn test_split_raw_key_reconstructs() {
        let mut rng = MockEntropy::new(0x10);
        let secret = [0x42u8; 16];

        let shares = split_secret(&secret, PARTY_COUNT, &mut rng).expect("Split failed");

        assert_eq!(shares.len(), 3);
        for (i, share) in shares.iter().enumerate() {
            assert_eq!(share.party_index, (i + 1) as u8);
            assert_eq!(share.len(), 16);
        }
        assert_eq!(combine_shares(&shares).unwrap().as_slice(), &secret);
    }

    #[test]
    fn test_split_schedule_reconstructs_all_176_bytes() {
        let key: Vec<u8> = (0u8..16).collect();
        let secret = prepare_secret(Algorithm::AesGcm128, &key, ProtocolVariant::KeySchedule).unwrap();
        assert_eq!(secret.len(), 176);
        assert_eq!(&secret[..16], key.as_slice());

        let mut rng = MockEntropy::new(0x77);
        let shares = split_secret(&secret, PARTY_COUNT, &mut rng).unwrap();
        assert_eq!(shares.share_len(), 176);
        assert_eq!(combine_shares(&shares).unwrap().as_slice(), secret.as_slice());
    }

    #[test]
    fn test_split_with_os_entropy() {
        let mut rng = crate::entropy::OsEntropy::new();
        for seed in 0u8..32 {
            let secret = [seed; 16];
            let shares = split_secret(&secret, PARTY_COUNT, &mut rng).unwrap();
            let s = shares.shares();
            for i in 0..16 {
                assert_eq!(s[0].value()[i] ^ s[1].value()[i] ^ s[2].value()[i], secret[i]);
            }
        }
    }

    #[test]
    fn test_invalid_sizes() {
        let mut rng = MockEntropy::new(0);
        assert_eq!(split_secret(&[0u8; 15], 3, &mut rng), Err(MpcError::UnsupportedKeySize(15)));
        assert_eq!(split_secret(&[0u8; 32], 3, &mut rng), Err(MpcError::UnsupportedKeySize(32)));
        assert_eq!(split_secret(&[0u8; 16], 1, &mut rng), Err(MpcError::InvalidShareCount(1)));
        assert_eq!(
            prepare_secret(Algorithm::AesGcm128, &[0u8; 176], ProtocolVariant::KeySchedule),
            Err(MpcError::UnsupportedKeySize(176))
        );
    }

    #[test]
    fn test_unsupported_algorithm_draws_no_randomness() {
        let mut rng = CountingEntropy::default();
        let result = split_key("DES", &[0u8; 16], ProtocolVariant::KeySchedule, 3, &mut rng);
        assert_eq!(result, Err(MpcError::UnsupportedAlgorithm));
        assert_eq!(rng.bytes_drawn, 0);

        let result = split_key("AES-GCM-128", &[0u8; 8], ProtocolVariant::RawKey, 3, &mut rng);
        assert_eq!(result, Err(MpcError::UnsupportedKeySize(8)));
        assert_eq!(rng.bytes_drawn, 0);
    }

    #[test]
    fn test_rng_failure_is_reported() {
        let mut rng = FailingEntropy;
        assert_eq!(split_secret(&[1u8; 16], 3, &mut rng), Err(MpcError::RngFailure));
    }

    #[test]
    fn test_low_entropy_source_refused_before_drawing() {
        for estimate in [0.0, 4.0, 7.99, f64::NAN] {
            let mut rng = WeakEntropy { estimate, bytes_drawn: 0 };
            assert_eq!(split_secret(&[7u8; 16], 3, &mut rng), Err(MpcError::InsufficientEntropy));
            assert_eq!(
                split_key("AES-GCM-128", &[7u8; 16], ProtocolVariant::KeySchedule, 3, &mut rng),
                Err(MpcError::InsufficientEntropy)
            );
            assert_eq!(rng.bytes_drawn, 0);
        }

        let mut rng = WeakEntropy { estimate: 8.0, bytes_drawn: 0 };
        let shares = split_secret(&[7u8; 16], 3, &mut rng).unwrap();
        assert_eq!(rng.bytes_drawn, 2 * 16);
        assert_eq!(combine_shares(&shares).unwrap().as_slice(), &[7u8; 16]);
    }

    #[test]
    fn test_split_key_draws_n_minus_one_shares() {
        let mut rng = CountingEntropy::default();
        let shares = split_key("AES-GCM-128", &[9u8; 16], ProtocolVariant::KeySchedule, 3, &mut rng).unwrap();
        assert_eq!(rng.bytes_drawn, 2 * 176);
        assert_eq!(shares.share_len(), 176);
    }
}
