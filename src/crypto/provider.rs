//! The primitive-provider capability.

use aes_gcm::aead::{Aead, KeyInit, Payload};
use aes_gcm::{Aes128Gcm, Nonce};
use rsa::pkcs8::{DecodePublicKey, EncodePublicKey};
use rsa::RsaPublicKey;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;
use crate::entropy::OsEntropy;
use super::{oaep, CryptoError, NONCE_LEN};

/// The platform primitives this crate composes.
///
/// Implementations must be stateless across calls; concurrent calls from
/// independent callers may share one provider.
pub trait PrimitiveProvider {
    /// RSA-OAEP encryption with SHA-256 / MGF1-SHA-256 and an explicit label.
    fn rsa_oaep_encrypt(
        &self,
        key: &RsaPublicKey,
        label: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError>;

    /// AES-GCM decryption with a 96-bit nonce, 128-bit tag and explicit
    /// associated data. `ciphertext` is the encrypted message with its tag
    /// appended. Returns no plaintext unless the tag verifies.
    fn aes_gcm_decrypt(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError>;

    /// SHA-256 digest.
    fn sha256(&self, data: &[u8]) -> [u8; 32];

    /// Imports a DER-encoded SubjectPublicKeyInfo RSA key.
    fn import_spki(&self, der: &[u8]) -> Result<RsaPublicKey, CryptoError>;

    /// Exports a key in its canonical SPKI DER form.
    fn export_spki(&self, key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError>;
}

/// Provider backed by the RustCrypto crates and the OS CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustCryptoProvider;

impl RustCryptoProvider {
    pub fn new() -> Self {
        Self
    }
}

impl PrimitiveProvider for RustCryptoProvider {
    fn rsa_oaep_encrypt(
        &self,
        key: &RsaPublicKey,
        label: &[u8],
        plaintext: &[u8],
    ) -> Result<Vec<u8>, CryptoError> {
        oaep::encrypt(&mut OsEntropy, key, label, plaintext)
    }

    fn aes_gcm_decrypt(
        &self,
        key: &[u8],
        nonce: &[u8; NONCE_LEN],
        aad: &[u8],
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
        let cipher = Aes128Gcm::new_from_slice(key)
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        cipher
            .decrypt(Nonce::from_slice(nonce), Payload { msg: ciphertext, aad })
            .map(Zeroizing::new)
            .map_err(|_| CryptoError::AuthenticationFailed)
    }

    fn sha256(&self, data: &[u8]) -> [u8; 32] {
        Sha256::digest(data).into()
    }

    fn import_spki(&self, der: &[u8]) -> Result<RsaPublicKey, CryptoError> {
        RsaPublicKey::from_public_key_der(der)
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }

    fn export_spki(&self, key: &RsaPublicKey) -> Result<Vec<u8>, CryptoError> {
        key.to_public_key_der()
            .map(|doc| doc.as_bytes().to_vec())
            .map_err(|e| CryptoError::InvalidPublicKey(e.to_string()))
    }
}
