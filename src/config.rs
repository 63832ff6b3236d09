//! Configuration management for the MPC client core.
//!
//! Defines the structure for user-configurable settings.

use core::fmt;
use serde::{Deserialize, Serialize};
use crate::fhe::SerializationType;
use crate::mpc::ProtocolVariant;

/// Number of leading CKKS slots that carry a result.
pub const DEFAULT_RESULT_COEFFICIENTS: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Parse(String),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
            ConfigError::Invalid(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Main configuration structure for the client core.
///
/// This struct should be populated by the host application and passed to
/// [`crate::client::MpcClient`]. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// How homomorphic result bundles are serialized by the service.
    pub serialization_type: SerializationType,

    /// How many leading plaintext coefficients make up a homomorphic result.
    pub result_coefficients: usize,

    /// Raw-key shares (earlier protocol) or key-schedule shares with tagged contexts.
    pub protocol_variant: ProtocolVariant,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            serialization_type: SerializationType::Json,
            result_coefficients: DEFAULT_RESULT_COEFFICIENTS,
            protocol_variant: ProtocolVariant::KeySchedule,
        }
    }
}

impl ClientConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: ClientConfig =
            serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_coefficients == 0 {
            return Err(ConfigError::Invalid("result_coefficients must be at least 1"));
        }
        Ok(())
    }
}
