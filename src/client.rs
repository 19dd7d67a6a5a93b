//! Client endpoint: blind, send, verify, deblind.

use std::collections::BTreeMap;

use ark_bn254::G1Affine;
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::{
    blind::{blind_with_rng, deblind},
    config::PythiaConfig,
    errors::PythiaError,
    key_table::CURRENT_VERSION,
    messages::{EvalRequest, EvalResponse, RotationResponse},
    proof::{verify, verify_with_commitment},
    rotate::update,
    types::PrfOutput,
};

/// Carries one evaluation request to a server and returns its response.
/// Hosts plug HTTP or any other channel in here.
pub trait Transport {
    /// # Errors
    /// Host failures, wrapped as `PythiaError::Transport`, or errors the
    /// remote server reported.
    fn send(&self, request: &EvalRequest) -> Result<EvalResponse, PythiaError>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, request: &EvalRequest) -> Result<EvalResponse, PythiaError> {
        (**self).send(request)
    }
}

pub struct PythiaClient<T: Transport> {
    transport: T,
    config: PythiaConfig,
    commitment: Option<G1Affine>,
    // Commitments of rotated-out versions, still answerable by the server.
    previous: BTreeMap<u32, G1Affine>,
}

impl<T: Transport> PythiaClient<T> {
    /// # Errors
    /// `Config` if `config` is invalid.
    pub fn new(transport: T, config: PythiaConfig) -> Result<Self, PythiaError> {
        config.validate()?;
        Ok(Self { transport, config, commitment: None, previous: BTreeMap::new() })
    }

    /// Only accept proofs made under `commitment` for the current key.
    #[must_use]
    pub fn with_commitment(mut self, commitment: G1Affine) -> Self {
        self.commitment = Some(commitment);
        self
    }

    #[must_use]
    pub const fn commitment(&self) -> Option<&G1Affine> {
        self.commitment.as_ref()
    }

    /// Commitment that proofs tagged with `version` must match. Versions
    /// learned through [`Self::apply_rotation`] keep their own commitment;
    /// anything else is checked against the current one.
    #[must_use]
    pub fn commitment_for(&self, version: u32) -> Option<&G1Affine> {
        self.previous.get(&version).or(self.commitment.as_ref())
    }

    /// Obtain the PRF output for `message` under `tweak`. `version` of
    /// [`CURRENT_VERSION`] asks for the server's current key.
    ///
    /// # Errors
    /// `Transport`, `Decode` on a malformed response, `InvalidKeyVersion` if
    /// the server answered under a different version than requested, and
    /// `ProofVerificationFailed` if a requested proof is missing or invalid.
    pub fn evaluate(&self, tweak: &[u8], message: &[u8], version: u32) -> Result<PrfOutput, PythiaError> {
        self.evaluate_with_rng(tweak, message, version, &mut OsRng)
    }

    /// [`Self::evaluate`] with a caller-supplied blinding RNG.
    ///
    /// # Errors
    /// As [`Self::evaluate`].
    pub fn evaluate_with_rng<R: RngCore + CryptoRng>(
        &self,
        tweak: &[u8],
        message: &[u8],
        version: u32,
        rng: &mut R,
    ) -> Result<PrfOutput, PythiaError> {
        let (r_inv, x) = blind_with_rng(message, rng)?;
        let request = EvalRequest::new(tweak, &x)
            .with_proof(self.config.include_proof)
            .with_version(version);

        let response = self.transport.send(&request)?;
        if version != CURRENT_VERSION && response.version != version {
            return Err(PythiaError::InvalidKeyVersion { version: response.version });
        }
        let y = response.result()?;

        if self.config.include_proof {
            let Some(proof) = response.proof()? else {
                tracing::warn!(version = response.version, "response is missing the requested proof");
                return Err(PythiaError::ProofVerificationFailed);
            };
            let verified = self.commitment_for(response.version).map_or_else(
                || verify(&x, tweak, &y, &proof),
                |commitment| verify_with_commitment(&x, tweak, &y, &proof, commitment),
            );
            if let Err(e) = verified {
                tracing::warn!(version = response.version, "rejected evaluation proof");
                return Err(e);
            }
        }

        deblind(&r_inv, &y)
    }

    /// Move a stored output to the rotated key and pin the new commitment.
    /// The commitment pinned so far stays valid for the previous version
    /// while that version is inside the retention window.
    ///
    /// # Errors
    /// `Decode` on a malformed token or commitment.
    pub fn apply_rotation(&mut self, z: &PrfOutput, rotation: &RotationResponse) -> Result<PrfOutput, PythiaError> {
        let delta = rotation.delta()?;
        let commitment = rotation.new_commitment()?;
        let updated = update(z, &delta)?;
        if let Some(old) = self.commitment.replace(commitment) {
            self.previous.insert(rotation.previous_key_version, old);
        }
        while self.previous.len() >= self.config.retained_versions {
            if self.previous.pop_first().is_none() {
                break;
            }
        }
        tracing::debug!(previous_version = rotation.previous_key_version, "applied key rotation");
        Ok(updated)
    }
}
