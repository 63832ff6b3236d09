//! Reconstruction of computed results on the symmetric response path.
//!
//! The compute parties encrypt the result under the device key with AES-GCM,
//! using `SHA-256(context)[..12]` as nonce and the full context as associated
//! data. The nonce is never transmitted; the client recomputes it.
//!
//! # Caller contract
//! Nonce uniqueness rests entirely on context uniqueness: a context must never
//! cover two different plaintexts under the same key. Result contexts always
//! fold in the analysis id for that reason (see `context::result_context`).

use zeroize::Zeroizing;
use crate::context::Context;
use super::{CryptoError, PrimitiveProvider, NONCE_LEN, TAG_LEN};

/// Derives the AES-GCM nonce of a result from its context.
pub fn derive_nonce<P: PrimitiveProvider + ?Sized>(provider: &P, context: &Context) -> [u8; NONCE_LEN] {
    let digest = provider.sha256(context.as_bytes());
    let mut nonce = [0u8; NONCE_LEN];
    nonce.copy_from_slice(&digest[..NONCE_LEN]);
    nonce
}

/// Authenticated-decrypts a result ciphertext (`message || 16-byte tag`).
///
/// # Returns
/// * `Ok(plaintext)` only if the tag verifies.
/// * `Err(CryptoError::AuthenticationFailed)` for a wrong key, wrong context
///   or corrupted ciphertext; no plaintext is released in that case.
/// * `Err(CryptoError::InvalidKeyLength)` if `secret` is not an AES-128 key.
pub fn reconstruct_result<P: PrimitiveProvider + ?Sized>(
    provider: &P,
    secret: &[u8],
    context: &Context,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    if ciphertext.len() < TAG_LEN {
        log::warn!("Result ciphertext shorter than the authentication tag ({} bytes)", ciphertext.len());
        return Err(CryptoError::AuthenticationFailed);
    }

    let nonce = derive_nonce(provider, context);
    match provider.aes_gcm_decrypt(secret, &nonce, context.as_bytes(), ciphertext) {
        Ok(plaintext) => {
            log::debug!("Reconstructed {}-byte result", plaintext.len());
            Ok(plaintext)
        }
        Err(e) => {
            log::warn!("Result reconstruction failed: {}", e);
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aes_gcm::aead::{Aead, KeyInit, Payload};
    use aes_gcm::{Aes128Gcm, Nonce};
    use crate::context::result_context;
    use crate::crypto::RustCryptoProvider;

    const PK1: &[u8] = b"spki-party-1";
    const PK2: &[u8] = b"spki-party-2";
    const PK3: &[u8] = b"spki-party-3";

    fn seal(key: &[u8], context: &Context, plaintext: &[u8]) -> Vec<u8> {
        let nonce = derive_nonce(&RustCryptoProvider, context);
        Aes128Gcm::new_from_slice(key)
            .unwrap()
            .encrypt(Nonce::from_slice(&nonce), Payload { msg: plaintext, aad: context.as_bytes() })
            .unwrap()
    }

    #[test]
    fn test_nonce_is_truncated_digest() {
        let ctx = Context::from_bytes(b"abc".to_vec());
        let nonce = derive_nonce(&RustCryptoProvider, &ctx);
        assert_eq!(hex::encode(nonce), "ba7816bf8f01cfea414140de");
    }

    #[test]
    fn test_roundtrip() {
        let key = [0x11u8; 16];
        let ctx = result_context("user", [PK1, PK2, PK3], "A1", "heartbeat");
        let ct = seal(&key, &ctx, b"classification: 3");

        let pt = reconstruct_result(&RustCryptoProvider, &key, &ctx, &ct).unwrap();
        assert_eq!(pt.as_slice(), b"classification: 3");
    }

    #[test]
    fn test_every_ciphertext_bit_flip_fails() {
        let key = [0x22u8; 16];
        let ctx = result_context("user", [PK1, PK2, PK3], "A1", "heartbeat");
        let ct = seal(&key, &ctx, b"result");

        for byte in 0..ct.len() {
            for bit in 0..8 {
                let mut tampered = ct.clone();
                tampered[byte] ^= 1u8 << bit;
                assert_eq!(
                    reconstruct_result(&RustCryptoProvider, &key, &ctx, &tampered),
                    Err(CryptoError::AuthenticationFailed),
                    "flip at byte {} bit {} went undetected",
                    byte,
                    bit
                );
            }
        }
    }

    #[test]
    fn test_context_bit_flip_fails() {
        let key = [0x33u8; 16];
        let ctx = result_context("user", [PK1, PK2, PK3], "A1", "heartbeat");
        let ct = seal(&key, &ctx, b"result");

        for pos in [0, ctx.len() / 2, ctx.len() - 1] {
            let mut bytes = ctx.as_bytes().to_vec();
            bytes[pos] ^= 0x01;
            let tampered = Context::from_bytes(bytes);
            assert_eq!(
                reconstruct_result(&RustCryptoProvider, &key, &tampered, &ct),
                Err(CryptoError::AuthenticationFailed)
            );
        }
    }

    #[test]
    fn test_analysis_id_mismatch_fails() {
        let key = [0x44u8; 16];
        let produced_for = result_context("user", [PK1, PK2, PK3], "A2", "heartbeat");
        let expected = result_context("user", [PK1, PK2, PK3], "A1", "heartbeat");
        let ct = seal(&key, &produced_for, b"result");

        assert_eq!(
            reconstruct_result(&RustCryptoProvider, &key, &expected, &ct),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_wrong_key_fails() {
        let ctx = result_context("user", [PK1, PK2, PK3], "A1", "heartbeat");
        let ct = seal(&[0x55u8; 16], &ctx, b"result");
        assert_eq!(
            reconstruct_result(&RustCryptoProvider, &[0x56u8; 16], &ctx, &ct),
            Err(CryptoError::AuthenticationFailed)
        );
    }

    #[test]
    fn test_short_ciphertext() {
        let ctx = result_context("user", [PK1, PK2, PK3], "A1", "heartbeat");
        assert_eq!(
            reconstruct_result(&RustCryptoProvider, &[0u8; 16], &ctx, &[0u8; 15]),
            Err(CryptoError::AuthenticationFailed)
        );
    }
}
