//! Versioned master-key table.
//!
//! Each ensemble selector owns a run of key versions starting at 1. Readers
//! get an `Arc` snapshot of one version, so an evaluation keeps working on the
//! material it started with even if a rotation lands mid-request. Rotations
//! take the write lock and are serialized.

use std::{
    collections::{BTreeMap, HashMap},
    fmt,
    sync::{Arc, RwLock},
};

use ark_bn254::G1Affine;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::{
    config::PythiaConfig,
    errors::PythiaError,
    keys::public_commitment,
    rotate::get_delta,
    types::Rotation,
};

/// Wire and API value meaning "whatever version is current".
pub const CURRENT_VERSION: u32 = 0;

/// Master secret key and per-record state for one key version.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial {
    master_key: Vec<u8>,
    state: Vec<u8>,
}

impl KeyMaterial {
    #[must_use]
    pub fn new(master_key: impl Into<Vec<u8>>, state: impl Into<Vec<u8>>) -> Self {
        Self { master_key: master_key.into(), state: state.into() }
    }

    #[must_use]
    pub fn master_key(&self) -> &[u8] {
        &self.master_key
    }

    #[must_use]
    pub fn state(&self) -> &[u8] {
        &self.state
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(<redacted>)")
    }
}

/// One consistent view of a key version, valid for the whole request.
#[derive(Clone, Debug)]
pub struct KeySnapshot {
    pub version: u32,
    pub material: Arc<KeyMaterial>,
}

/// Key lookup capability the server evaluates against.
pub trait KeyStore {
    /// Fetch key material for `selector`. `version` of [`CURRENT_VERSION`]
    /// resolves to the newest version.
    ///
    /// # Errors
    /// `UnknownSelector`, `InvalidKeyVersion` or `KeyTablePoisoned`.
    fn get(&self, selector: &[u8], version: u32) -> Result<KeySnapshot, PythiaError>;
}

/// Result of a rotation: the token and commitment plus the versions involved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RotationOutcome {
    pub rotation: Rotation,
    pub previous_version: u32,
    pub new_version: u32,
}

struct Epochs {
    current: u32,
    versions: BTreeMap<u32, Arc<KeyMaterial>>,
}

impl Epochs {
    fn snapshot(&self, version: u32) -> Result<KeySnapshot, PythiaError> {
        let resolved = if version == CURRENT_VERSION { self.current } else { version };
        self.versions
            .get(&resolved)
            .map(|material| KeySnapshot { version: resolved, material: Arc::clone(material) })
            .ok_or(PythiaError::InvalidKeyVersion { version })
    }
}

/// In-memory [`KeyStore`] with administrative rotation.
pub struct KeyTable {
    retained: usize,
    selectors: RwLock<HashMap<Vec<u8>, Epochs>>,
}

impl KeyTable {
    /// # Errors
    /// `Config` if the configuration is invalid.
    pub fn new(config: &PythiaConfig) -> Result<Self, PythiaError> {
        config.validate()?;
        Ok(Self { retained: config.retained_versions, selectors: RwLock::new(HashMap::new()) })
    }

    /// Install version 1 for a new selector.
    ///
    /// # Errors
    /// `AlreadyProvisioned` if the selector has key material.
    pub fn provision(&self, selector: &[u8], material: KeyMaterial) -> Result<u32, PythiaError> {
        let mut selectors = self.selectors.write().map_err(|_| PythiaError::KeyTablePoisoned)?;
        if selectors.contains_key(selector) {
            return Err(PythiaError::AlreadyProvisioned);
        }
        let mut versions = BTreeMap::new();
        versions.insert(1, Arc::new(material));
        selectors.insert(selector.to_vec(), Epochs { current: 1, versions });
        tracing::info!(version = 1, "provisioned key material");
        Ok(1)
    }

    /// # Errors
    /// `UnknownSelector` or `KeyTablePoisoned`.
    pub fn current_version(&self, selector: &[u8]) -> Result<u32, PythiaError> {
        let selectors = self.selectors.read().map_err(|_| PythiaError::KeyTablePoisoned)?;
        selectors.get(selector).map(|e| e.current).ok_or(PythiaError::UnknownSelector)
    }

    /// Public commitment P = kw·G of a key version.
    ///
    /// # Errors
    /// Lookup errors, or key derivation failures.
    pub fn commitment(&self, selector: &[u8], version: u32) -> Result<G1Affine, PythiaError> {
        let snapshot = self.get(selector, version)?;
        public_commitment(selector, snapshot.material.master_key(), snapshot.material.state())
    }

    /// Replace the current key material with `next`, returning the update
    /// token from the old version to the new one. Versions beyond the
    /// retention window are retired.
    ///
    /// # Errors
    /// `UnknownSelector`, `KeyTablePoisoned`, key derivation failures, or
    /// `Degenerate` on version overflow.
    pub fn rotate(&self, selector: &[u8], next: KeyMaterial) -> Result<RotationOutcome, PythiaError> {
        let mut selectors = self.selectors.write().map_err(|_| PythiaError::KeyTablePoisoned)?;
        let epochs = selectors.get_mut(selector).ok_or(PythiaError::UnknownSelector)?;

        let previous = epochs.snapshot(CURRENT_VERSION)?;
        let rotation = get_delta(
            selector,
            previous.material.master_key(),
            previous.material.state(),
            selector,
            next.master_key(),
            next.state(),
        )?;

        let new_version = previous
            .version
            .checked_add(1)
            .ok_or(PythiaError::Degenerate("key version overflow"))?;
        epochs.versions.insert(new_version, Arc::new(next));
        epochs.current = new_version;
        while epochs.versions.len() > self.retained {
            if let Some((retired, _)) = epochs.versions.pop_first() {
                tracing::info!(version = retired, "retired key version");
            }
        }

        tracing::info!(previous_version = previous.version, new_version, "rotated master key");
        Ok(RotationOutcome { rotation, previous_version: previous.version, new_version })
    }
}

impl KeyStore for KeyTable {
    fn get(&self, selector: &[u8], version: u32) -> Result<KeySnapshot, PythiaError> {
        let selectors = self.selectors.read().map_err(|_| PythiaError::KeyTablePoisoned)?;
        selectors.get(selector).ok_or(PythiaError::UnknownSelector)?.snapshot(version)
    }
}

impl fmt::Debug for KeyTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyTable").field("retained", &self.retained).finish_non_exhaustive()
    }
}
