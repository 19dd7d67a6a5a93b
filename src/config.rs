use serde::{Deserialize, Serialize};

use crate::errors::PythiaError;

pub const DEFAULT_RETAINED_VERSIONS: usize = 2;

/// Runtime knobs shared by the client and server endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PythiaConfig {
    /// Ask for (client) and expect (server default) a proof with each evaluation.
    pub include_proof: bool,
    /// Key versions kept per selector, the current one included. Older
    /// versions are retired and rejected with `InvalidKeyVersion`.
    pub retained_versions: usize,
}

impl Default for PythiaConfig {
    fn default() -> Self {
        Self { include_proof: true, retained_versions: DEFAULT_RETAINED_VERSIONS }
    }
}

impl PythiaConfig {
    /// # Errors
    /// `Config` if no key version would be retained.
    pub fn validate(&self) -> Result<(), PythiaError> {
        if self.retained_versions == 0 {
            return Err(PythiaError::Config("retained_versions must be at least 1".into()));
        }
        Ok(())
    }

    /// Parse and validate a JSON config; missing fields take their defaults.
    ///
    /// # Errors
    /// `Config` on malformed JSON, unknown fields or invalid values.
    pub fn from_json_str(s: &str) -> Result<Self, PythiaError> {
        let config: Self = serde_json::from_str(s).map_err(|e| PythiaError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
