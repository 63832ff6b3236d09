//! Compute-party identities.
//!
//! Parties are supplied by the caller (typically from the orchestration
//! service's party listing); this crate never discovers or caches them.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use core::fmt;
use rsa::RsaPublicKey;
use serde::{Deserialize, Serialize};
use super::{CryptoError, PrimitiveProvider};

/// A compute party: id, encryption key, and the key's canonical SPKI bytes.
#[derive(Clone, PartialEq, Eq)]
pub struct Party {
    party_id: String,
    public_key: RsaPublicKey,
    exported_key: Vec<u8>,
}

impl fmt::Debug for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Party")
            .field("party_id", &self.party_id)
            .field("spki_len", &self.exported_key.len())
            .finish()
    }
}

impl Party {
    /// Creates a party from an imported key, exporting its canonical SPKI form.
    pub fn new<P: PrimitiveProvider + ?Sized>(
        party_id: impl Into<String>,
        public_key: RsaPublicKey,
        provider: &P,
    ) -> Result<Self, CryptoError> {
        let exported_key = provider.export_spki(&public_key)?;
        Ok(Self {
            party_id: party_id.into(),
            public_key,
            exported_key,
        })
    }

    /// Imports a party key delivered as standard base64 of DER/SPKI.
    ///
    /// The stored exported form is re-encoded from the imported key, not the
    /// input bytes, so that it matches what the counterpart derives.
    pub fn from_base64_spki<P: PrimitiveProvider + ?Sized>(
        party_id: impl Into<String>,
        encoded: &str,
        provider: &P,
    ) -> Result<Self, CryptoError> {
        let party_id = party_id.into();
        let der = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::InvalidPublicKey(format!("base64: {}", e)))?;
        let public_key = provider.import_spki(&der)?;
        log::debug!("Imported key for party '{}' ({} DER bytes)", party_id, der.len());
        Self::new(party_id, public_key, provider)
    }

    pub fn party_id(&self) -> &str {
        &self.party_id
    }

    pub fn public_key(&self) -> &RsaPublicKey {
        &self.public_key
    }

    /// Canonical SPKI bytes, as folded into contexts and OAEP labels.
    pub fn exported_key(&self) -> &[u8] {
        &self.exported_key
    }
}

/// A party entry as listed by the orchestration service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyInfo {
    pub mpc_id: String,
    pub host: String,
    /// Base64 of the party's DER/SPKI RSA public key.
    pub mpc_key: String,
    pub region: String,
}

impl PartyInfo {
    /// Imports the listed key.
    pub fn to_party<P: PrimitiveProvider + ?Sized>(&self, provider: &P) -> Result<Party, CryptoError> {
        Party::from_base64_spki(self.mpc_id.clone(), &self.mpc_key, provider)
    }
}
