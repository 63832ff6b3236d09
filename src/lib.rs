//! Client-side cryptographic core of a three-party secure-computation platform.
//!
//! A device key (or its AES-128 key schedule) is XOR-split into three shares;
//! each share is RSA-OAEP encrypted to one compute party under a label that
//! binds the request context and the party's key. Results come back either as
//! AES-GCM ciphertexts keyed by the device key with a context-derived nonce,
//! or as CKKS ciphertexts decrypted through an external homomorphic engine.

pub mod core;
pub mod entropy;
pub mod context;
pub mod mpc;
pub mod crypto;
pub mod fhe;
pub mod config;
pub mod client;

#[cfg(test)]
mod testing;

pub use client::{AnalysisRequest, ClientError, DataWindow, EncryptedShares, FheAnalysisRequest, MpcClient};
pub use config::ClientConfig;
pub use context::{Context, ContextBuilder, SeparationTag};
pub use crypto::{CryptoError, Party, PartyInfo, PrimitiveProvider, RustCryptoProvider};
pub use fhe::{FheError, HomomorphicBundle, HomomorphicEngine, SerializationType};
pub use mpc::{Algorithm, MpcError, ProtocolVariant};
