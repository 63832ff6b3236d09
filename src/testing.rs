//! Shared test fixtures: deterministic entropy and RSA party keys.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use rsa::pkcs8::EncodePublicKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use std::sync::OnceLock;
use crate::crypto::{Party, RustCryptoProvider};
use crate::entropy::{EntropyError, EntropySource};

/// Incrementing byte stream.
pub struct MockEntropy {
    fill_val: u8,
}

impl MockEntropy {
    pub fn new(start: u8) -> Self {
        Self { fill_val: start }
    }
}

impl EntropySource for MockEntropy {
    fn name(&self) -> &'static str { "Mock" }
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        for b in dest.iter_mut() {
            *b = self.fill_val;
            self.fill_val = self.fill_val.wrapping_add(1);
        }
        Ok(())
    }
    fn entropy_estimate(&self) -> f64 { 8.0 }
}

/// Records how many bytes were requested; fills with a fixed pattern.
#[derive(Default)]
pub struct CountingEntropy {
    pub bytes_drawn: usize,
}

impl EntropySource for CountingEntropy {
    fn name(&self) -> &'static str { "Counting" }
    fn fill(&mut self, dest: &mut [u8]) -> Result<(), EntropyError> {
        self.bytes_drawn += dest.len();
        dest.fill(0x5A);
        Ok(())
    }
    fn entropy_estimate(&self) -> f64 { 8.0 }
}

pub struct FailingEntropy;

impl EntropySource for FailingEntropy {
    fn name(&self) -> &'static str { "Failing" }
    fn fill(&mut self, _dest: &mut [u8]) -> Result<(), EntropyError> {
        Err(EntropyError::CollectionFailed)
    }
    fn entropy_estimate(&self) -> f64 { 8.0 }
}

/// Routes `log` output to the test harness; safe to call from every test.
pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

const TEST_KEY_COUNT: usize = 4;

/// 2048-bit keys, generated once per test binary.
fn party_keys() -> &'static [RsaPrivateKey] {
    static KEYS: OnceLock<Vec<RsaPrivateKey>> = OnceLock::new();
    KEYS.get_or_init(|| {
        (0..TEST_KEY_COUNT)
            .map(|_| RsaPrivateKey::new(&mut rand_core::OsRng, 2048).expect("RSA keygen failed"))
            .collect()
    })
}

pub fn party_private_key(index: usize) -> &'static RsaPrivateKey {
    &party_keys()[index]
}

pub fn party_public_key(index: usize) -> RsaPublicKey {
    party_private_key(index).to_public_key()
}

/// Standard base64 of the DER/SPKI public key, as the service lists it.
pub fn party_spki_base64(index: usize) -> String {
    let der = party_public_key(index)
        .to_public_key_der()
        .expect("SPKI export failed");
    STANDARD.encode(der.as_bytes())
}

/// Parties 1..=3 over keys 0..=2. Key 3 is a spare outsider.
pub fn test_parties() -> [Party; 3] {
    let provider = RustCryptoProvider;
    let make = |i: usize| {
        Party::new(format!("party-{}", i + 1), party_public_key(i), &provider).expect("party")
    };
    [make(0), make(1), make(2)]
}
