//! Label-bound encryption of key shares.
//!
//! Each share is encrypted to exactly one party with RSA-OAEP, using
//! `context || recipient_spki` as the OAEP label. A ciphertext made for party A
//! under context C fails to decrypt for any other recipient key or context,
//! because the label hash embedded in the padding no longer matches.

use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;
use crate::context::Context;
use super::{oaep, CryptoError, Party, PrimitiveProvider};

/// Builds the OAEP label `context || exported_key`.
pub fn share_label(context: &Context, exported_key: &[u8]) -> Vec<u8> {
    let mut label = Vec::with_capacity(context.len() + exported_key.len());
    label.extend_from_slice(context.as_bytes());
    label.extend_from_slice(exported_key);
    label
}

/// Encrypts one share for one recipient.
///
/// # Arguments
/// * `share` - Share bytes; at most 190 bytes for a 2048-bit key.
/// * `public_key` - Recipient's encryption key.
/// * `exported_key` - Recipient's canonical SPKI bytes (bound into the label).
/// * `context` - The operation context (bound into the label).
///
/// # Returns
/// * `Err(CryptoError::EncryptionFailure)` from the primitive, unmodified.
pub fn encrypt_share<P: PrimitiveProvider + ?Sized>(
    provider: &P,
    share: &[u8],
    public_key: &RsaPublicKey,
    exported_key: &[u8],
    context: &Context,
) -> Result<Vec<u8>, CryptoError> {
    let label = share_label(context, exported_key);
    provider.rsa_oaep_encrypt(public_key, &label, share)
}

/// Encrypts one share for `party`.
pub fn encrypt_for_party<P: PrimitiveProvider + ?Sized>(
    provider: &P,
    share: &[u8],
    party: &Party,
    context: &Context,
) -> Result<Vec<u8>, CryptoError> {
    let ciphertext = encrypt_share(provider, share, party.public_key(), party.exported_key(), context)?;
    log::debug!(
        "Encrypted {}-byte share for party '{}' ({} byte ciphertext)",
        share.len(),
        party.party_id(),
        ciphertext.len()
    );
    Ok(ciphertext)
}

/// Party-side inverse of [`encrypt_share`]: recovers the share only if the
/// recipient key, its exported form and the context all match.
pub fn decrypt_share(
    private_key: &RsaPrivateKey,
    exported_key: &[u8],
    context: &Context,
    ciphertext: &[u8],
) -> Result<Zeroizing<Vec<u8>>, CryptoError> {
    let label = share_label(context, exported_key);
    oaep::decrypt(private_key, &label, ciphertext)
}
