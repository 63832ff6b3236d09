//! The client operations exposed to the orchestration layer.
//!
//! [`MpcClient`] strings the lower layers together: request context, key
//! splitting and per-party share encryption on the way out; context-nonce
//! AES-GCM or homomorphic decryption on the way back. It owns no cross-call
//! state besides its provider and configuration.

#[cfg(feature = "async")]
pub mod concurrent;

use core::fmt;
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;
use crate::config::{ClientConfig, ConfigError};
use crate::context::{request_context, result_context, Context, SeparationTag};
use crate::crypto::share_encrypt::encrypt_for_party;
use crate::crypto::{result, CryptoError, Party, PrimitiveProvider, RustCryptoProvider};
use crate::entropy::EntropySource;
use crate::fhe::{decrypt_homomorphic, FheError, HomomorphicBundle, HomomorphicEngine};
use crate::mpc::share::ShareSet;
use crate::mpc::split::{prepare_secret, split_secret};
use crate::mpc::{Algorithm, MpcError, PARTY_COUNT};

/// One ciphertext per party, in party order.
pub type EncryptedShares = [Vec<u8>; PARTY_COUNT];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientError {
    Mpc(MpcError),
    Crypto(CryptoError),
    Fhe(FheError),
    Config(ConfigError),
    /// Caller-supplied text (hex, base64) could not be decoded.
    InvalidEncoding(String),
    /// A concurrent per-party worker did not complete.
    TaskFailed(String),
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::Mpc(e) => write!(f, "MPC error: {}", e),
            ClientError::Crypto(e) => write!(f, "Crypto error: {}", e),
            ClientError::Fhe(e) => write!(f, "FHE error: {}", e),
            ClientError::Config(e) => write!(f, "{}", e),
            ClientError::InvalidEncoding(msg) => write!(f, "Invalid encoding: {}", msg),
            ClientError::TaskFailed(msg) => write!(f, "Worker task failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ClientError::Mpc(e) => Some(e),
            ClientError::Crypto(e) => Some(e),
            ClientError::Fhe(e) => Some(e),
            ClientError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<MpcError> for ClientError {
    fn from(e: MpcError) -> Self {
        ClientError::Mpc(e)
    }
}

impl From<CryptoError> for ClientError {
    fn from(e: CryptoError) -> Self {
        ClientError::Crypto(e)
    }
}

impl From<FheError> for ClientError {
    fn from(e: FheError) -> Self {
        ClientError::Fhe(e)
    }
}

impl From<ConfigError> for ClientError {
    fn from(e: ConfigError) -> Self {
        ClientError::Config(e)
    }
}

/// Which data an analysis covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataWindow {
    /// Explicit batch timestamps (milliseconds).
    Indices(Vec<u64>),
    /// A streaming window `[begin, end]`.
    Stream { begin: u64, end: u64 },
}

impl DataWindow {
    pub fn separation_tag(&self) -> SeparationTag {
        match self {
            DataWindow::Indices(_) => SeparationTag::Batch,
            DataWindow::Stream { .. } => SeparationTag::Streaming,
        }
    }

    /// The numeric context fields, in encoding order.
    pub fn numeric_fields(&self) -> Vec<u64> {
        match self {
            DataWindow::Indices(indices) => indices.clone(),
            DataWindow::Stream { begin, end } => vec![*begin, *end],
        }
    }
}

/// Everything needed to hand a device key to the three parties for one analysis.
#[derive(Clone)]
pub struct AnalysisRequest {
    pub user_id: String,
    /// The device's 128-bit key.
    pub secret: Zeroizing<Vec<u8>>,
    pub algorithm: String,
    pub parties: [Party; PARTY_COUNT],
    pub analysis_type: String,
    pub window: DataWindow,
}

impl fmt::Debug for AnalysisRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisRequest")
            .field("user_id", &self.user_id)
            .field("secret", &"***SENSITIVE***")
            .field("algorithm", &self.algorithm)
            .field("parties", &self.parties)
            .field("analysis_type", &self.analysis_type)
            .field("window", &self.window)
            .finish()
    }
}

/// Request body of a homomorphic analysis: `[user_id, analysis_type, [indices...]]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FheAnalysisRequest(pub String, pub String, pub Vec<u64>);

impl FheAnalysisRequest {
    pub fn new(user_id: impl Into<String>, analysis_type: impl Into<String>, data_indices: Vec<u64>) -> Self {
        Self(user_id.into(), analysis_type.into(), data_indices)
    }

    pub fn to_json(&self) -> Result<String, ClientError> {
        serde_json::to_string(self).map_err(|e| ClientError::InvalidEncoding(e.to_string()))
    }
}

/// Decodes a hex result ciphertext as delivered by the orchestration service.
pub fn decode_hex_ciphertext(encoded: &str) -> Result<Vec<u8>, ClientError> {
    hex::decode(encoded.trim()).map_err(|e| ClientError::InvalidEncoding(format!("hex: {}", e)))
}

fn exported_keys(parties: &[Party; PARTY_COUNT]) -> [&[u8]; PARTY_COUNT] {
    [
        parties[0].exported_key(),
        parties[1].exported_key(),
        parties[2].exported_key(),
    ]
}

/// Client-side MPC operations over an explicit primitive provider.
#[derive(Debug, Clone)]
pub struct MpcClient<P: PrimitiveProvider = RustCryptoProvider> {
    provider: P,
    config: ClientConfig,
}

impl Default for MpcClient<RustCryptoProvider> {
    fn default() -> Self {
        Self {
            provider: RustCryptoProvider,
            config: ClientConfig::default(),
        }
    }
}

impl<P: PrimitiveProvider> MpcClient<P> {
    pub fn new(provider: P, config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        Ok(Self { provider, config })
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The context the parties will rebuild for `request`.
    pub fn request_context(&self, request: &AnalysisRequest, algorithm: Algorithm) -> Context {
        let separation = if self.config.protocol_variant.tags_requests() {
            Some(request.window.separation_tag())
        } else {
            None
        };
        request_context(
            separation,
            &request.user_id,
            exported_keys(&request.parties),
            &request.window.numeric_fields(),
            &request.analysis_type,
            algorithm.as_str(),
        )
    }

    /// Validates, builds the context and splits the key. The algorithm is
    /// checked first so an unsupported one draws no randomness.
    pub(crate) fn prepare<R: EntropySource + ?Sized>(
        &self,
        rng: &mut R,
        request: &AnalysisRequest,
    ) -> Result<(Context, ShareSet), ClientError> {
        let algorithm: Algorithm = request.algorithm.parse()?;
        let secret = prepare_secret(algorithm, &request.secret, self.config.protocol_variant)?;
        let context = self.request_context(request, algorithm);
        let shares = split_secret(&secret, PARTY_COUNT, rng)?;
        Ok((context, shares))
    }

    /// Splits the request's key and encrypts share `i` to party `i`.
    ///
    /// All three encryptions must succeed; any failure fails the whole
    /// operation and no ciphertext is returned.
    pub fn split_and_encrypt<R: EntropySource + ?Sized>(
        &self,
        rng: &mut R,
        request: &AnalysisRequest,
    ) -> Result<EncryptedShares, ClientError> {
        let (context, shares) = self.prepare(rng, request)?;

        let c1 = encrypt_for_party(&self.provider, shares.shares()[0].value(), &request.parties[0], &context)?;
        let c2 = encrypt_for_party(&self.provider, shares.shares()[1].value(), &request.parties[1], &context)?;
        let c3 = encrypt_for_party(&self.provider, shares.shares()[2].value(), &request.parties[2], &context)?;

        log::info!(
            "Distributed {}-byte shares for analysis '{}' (tag: {:?})",
            shares.share_len(),
            request.analysis_type,
            self.config.protocol_variant.tags_requests().then(|| request.window.separation_tag())
        );
        Ok([c1, c2, c3])
    }

    /// Decrypts a computed result for analysis `analysis_id`.
    ///
    /// # Returns
    /// * `Err(ClientError::Crypto(CryptoError::AuthenticationFailed))` if the
    ///   ciphertext was not produced under this exact key and context.
    pub fn reconstruct(
        &self,
        user_id: &str,
        secret: &[u8],
        parties: &[Party; PARTY_COUNT],
        analysis_id: &str,
        analysis_type: &str,
        ciphertext: &[u8],
    ) -> Result<Zeroizing<Vec<u8>>, ClientError> {
        let context = result_context(user_id, exported_keys(parties), analysis_id, analysis_type);
        let plaintext = result::reconstruct_result(&self.provider, secret, &context, ciphertext)?;
        Ok(plaintext)
    }

    /// Decrypts a homomorphic result into a probability vector of
    /// `result_coefficients` entries.
    pub fn reconstruct_homomorphic<E: HomomorphicEngine + ?Sized>(
        &self,
        engine: &E,
        bundle: &HomomorphicBundle,
    ) -> Result<Vec<f64>, ClientError> {
        let probabilities = decrypt_homomorphic(
            engine,
            bundle,
            self.config.serialization_type,
            self.config.result_coefficients,
        )?;
        Ok(probabilities)
    }
}
