//! RSA-OAEP with SHA-256 as both hash and MGF1 hash (RFC 8017, section 7.1).
//!
//! The label is an arbitrary byte string. Share labels are `context || SPKI`
//! and are not UTF-8, so the padding is composed here and only the RSA
//! primitive itself comes from `rsa::hazmat` (blinded, CRT on the private side)
//! instead of going through a string-labelled padding type.
//!
//! # Format
//! `EM = 0x00 || maskedSeed (32) || maskedDB (k - 33)`,
//! `DB = SHA256(label) || 0x00.. || 0x01 || M`.

use rand_core::OsRng;
use rsa::hazmat::{rsa_decrypt_and_check, rsa_encrypt};
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, RsaPrivateKey, RsaPublicKey};
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, Zeroizing};
use crate::entropy::EntropySource;
use super::CryptoError;

const HASH_LEN: usize = 32;

/// Smallest modulus (bytes) that holds the OAEP encoding of an empty message.
const MIN_MODULUS_LEN: usize = 2 * HASH_LEN + 2;

/// Largest message that fits a modulus of `modulus_len` bytes.
pub fn max_message_len(modulus_len: usize) -> usize {
    modulus_len.saturating_sub(MIN_MODULUS_LEN)
}

/// Encrypts `msg` under `key`, binding `label`.
pub fn encrypt<R: EntropySource + ?Sized>(
    rng: &mut R,
    key: &RsaPublicKey,
    label: &[u8],
    msg: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let k = key.size();
    if k < MIN_MODULUS_LEN {
        return Err(CryptoError::EncryptionFailure(format!(
            "modulus too small for OAEP-SHA256: {} bits",
            k * 8
        )));
    }
    if msg.len() > max_message_len(k) {
        return Err(CryptoError::EncryptionFailure(format!(
            "message too long: {} bytes, limit {} for a {}-bit modulus",
            msg.len(),
            max_message_len(k),
            k * 8
        )));
    }

    let l_hash = Sha256::digest(label);
    let db_len = k - HASH_LEN - 1;

    let mut db = Zeroizing::new(vec![0u8; db_len]);
    db[..HASH_LEN].copy_from_slice(&l_hash);
    db[db_len - msg.len() - 1] = 0x01;
    db[db_len - msg.len()..].copy_from_slice(msg);

    let mut seed = Zeroizing::new([0u8; HASH_LEN]);
    rng.fill(seed.as_mut_slice())
        .map_err(|e| CryptoError::EncryptionFailure(format!("seed generation failed: {}", e)))?;

    let mut em = Zeroizing::new(vec![0u8; k]);
    {
        let (masked_seed, masked_db) = em[1..].split_at_mut(HASH_LEN);
        masked_db.copy_from_slice(&db);
        mgf1_xor(masked_db, seed.as_slice());
        masked_seed.copy_from_slice(seed.as_slice());
        mgf1_xor(masked_seed, masked_db);
    }

    let mut m = BigUint::from_bytes_be(&em);
    let c = rsa_encrypt(key, &m);
    m.zeroize();
    let c = c.map_err(|e| CryptoError::EncryptionFailure(e.to_string()))?;
    Ok(left_pad(&c.to_bytes_be(), k))
}

/// Decrypts an OAEP ciphertext with the matching private key and label.
///
/// Any failure (wrong key, label mismatch, malformed padding) is reported as
/// the single `AuthenticationFailed` error. This is the compute-party side of
/// share transport; the client only uses it to verify its own output.
pub fn decrypt(
    key: &RsaPrivateKey,
    label: &[u8],
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let k = key.size();
    if ciphertext.len() != k || k < MIN_MODULUS_LEN {
        return Err(CryptoError::AuthenticationFailed);
    }

    let c = BigUint::from_bytes_be(ciphertext);
    if &c >= key.n() {
        return Err(CryptoError::AuthenticationFailed);
    }
    let mut m = rsa_decrypt_and_check(key, Some(&mut OsRng), &c)
        .map_err(|_| CryptoError::AuthenticationFailed)?;
    let m_bytes = Zeroizing::new(m.to_bytes_be());
    m.zeroize();
    let mut em = Zeroizing::new(left_pad(&m_bytes, k));

    let y = em[0];
    let (masked_seed, masked_db) = em[1..].split_at_mut(HASH_LEN);
    mgf1_xor(masked_seed, masked_db);
    mgf1_xor(masked_db, masked_seed);
    let db = masked_db;

    let l_hash = Sha256::digest(label);

    // Accumulate every check before branching on the result.
    let mut bad = y as usize;
    bad |= !constant_time_eq(&db[..HASH_LEN], &l_hash) as usize;

    let mut separator_index = 0usize;
    let mut looking = 1usize;
    let mut invalid_padding = 0usize;
    for (i, &b) in db.iter().enumerate().skip(HASH_LEN) {
        let is_zero = (b == 0) as usize;
        let is_one = (b == 1) as usize;
        separator_index |= i * (looking & is_one);
        invalid_padding |= looking & !is_zero & !is_one & 1;
        looking &= !is_one & 1;
    }
    bad |= looking | invalid_padding;

    if bad != 0 {
        return Err(CryptoError::AuthenticationFailed);
    }
    Ok(Zeroizing::new(db[separator_index + 1..].to_vec()))
}

/// XORs MGF1-SHA256(`seed`) over `out`.
fn mgf1_xor(out: &mut [u8], seed: &[u8]) {
    let mut counter: u32 = 0;
    for chunk in out.chunks_mut(HASH_LEN) {
        let mut hasher = Sha256::new();
        hasher.update(seed);
        hasher.update(counter.to_be_bytes());
        let mask = hasher.finalize();
        for (o, m) in chunk.iter_mut().zip(mask.iter()) {
            *o ^= m;
        }
        counter += 1;
    }
}

fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let mut out = vec![0u8; len];
    let start = len.saturating_sub(bytes.len());
    out[start..].copy_from_slice(&bytes[bytes.len().saturating_sub(len)..]);
    out
}

#[inline(never)]
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
