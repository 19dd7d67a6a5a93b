//! Server endpoint: evaluates blinded requests for one ensemble selector.

use rand_core::{CryptoRng, OsRng, RngCore};

use crate::{
    errors::PythiaError,
    eval::eval,
    key_table::{KeyMaterial, KeySnapshot, KeyStore, KeyTable, CURRENT_VERSION},
    messages::{EvalRequest, EvalResponse, RotationResponse},
    proof::prove_with_rng,
};

pub struct PythiaServer<K: KeyStore> {
    selector: Vec<u8>,
    keys: K,
}

impl<K: KeyStore> PythiaServer<K> {
    #[must_use]
    pub fn new(selector: impl Into<Vec<u8>>, keys: K) -> Self {
        Self { selector: selector.into(), keys }
    }

    #[must_use]
    pub fn selector(&self) -> &[u8] {
        &self.selector
    }

    #[must_use]
    pub const fn keys(&self) -> &K {
        &self.keys
    }

    /// Evaluate one request. The blinded message is validated before any
    /// key material is touched, and the response names the key version used.
    ///
    /// # Errors
    /// `Decode` for a bad blinded message, key lookup errors, or
    /// `Degenerate` from the evaluation itself.
    pub fn eval(&self, request: &EvalRequest) -> Result<EvalResponse, PythiaError> {
        self.eval_with_rng(request, &mut OsRng)
    }

    /// [`Self::eval`] with a caller-supplied RNG for the proof nonce.
    ///
    /// # Errors
    /// As [`Self::eval`].
    pub fn eval_with_rng<R: RngCore + CryptoRng>(
        &self,
        request: &EvalRequest,
        rng: &mut R,
    ) -> Result<EvalResponse, PythiaError> {
        let x = request.blinded_message()?;
        let KeySnapshot { version, material } = self.keys.get(&self.selector, request.version)?;

        let evaluation = eval(&self.selector, &request.tweak, &x, material.master_key(), material.state())?;
        let proof = if request.include_proof {
            Some(prove_with_rng(&x, &evaluation.t_tilde, &evaluation.kw, &evaluation.y, rng)?)
        } else {
            None
        };

        tracing::debug!(version, include_proof = request.include_proof, "evaluated request");
        Ok(EvalResponse::new(&evaluation.y, proof.as_ref(), version))
    }
}

impl PythiaServer<KeyTable> {
    /// Rotate this selector to `next` and publish the update token.
    ///
    /// # Errors
    /// Errors from [`KeyTable::rotate`].
    pub fn rotate(&self, next: KeyMaterial) -> Result<RotationResponse, PythiaError> {
        let outcome = self.keys.rotate(&self.selector, next)?;
        Ok(RotationResponse::from(&outcome))
    }

    /// Public commitment of the current key, for clients to pin.
    ///
    /// # Errors
    /// Errors from [`KeyTable::commitment`].
    pub fn commitment(&self) -> Result<ark_bn254::G1Affine, PythiaError> {
        self.keys.commitment(&self.selector, CURRENT_VERSION)
    }
}
