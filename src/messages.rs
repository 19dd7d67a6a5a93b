//! Transport-independent request/response shapes. Byte fields travel as hex
//! strings in JSON and are decoded into typed values only through the
//! accessors below, which validate every field before use.

use ark_bn254::G1Affine;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    errors::DecodeError,
    key_table::{RotationOutcome, CURRENT_VERSION},
    ser::{decode_g1, encode_g1},
    types::{BlindedMessage, PrfOutput, Proof, UpdateToken},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalRequest {
    #[serde(with = "hex")]
    pub tweak: Vec<u8>,
    #[serde(with = "hex")]
    pub blinded_message: Vec<u8>,
    #[serde(default)]
    pub include_proof: bool,
    /// Key version to evaluate under; 0 means current.
    #[serde(default)]
    pub version: u32,
}

impl EvalRequest {
    #[must_use]
    pub fn new(tweak: &[u8], x: &BlindedMessage) -> Self {
        Self {
            tweak: tweak.to_vec(),
            blinded_message: x.to_bytes(),
            include_proof: false,
            version: CURRENT_VERSION,
        }
    }

    #[must_use]
    pub const fn with_proof(mut self, include_proof: bool) -> Self {
        self.include_proof = include_proof;
        self
    }

    #[must_use]
    pub const fn with_version(mut self, version: u32) -> Self {
        self.version = version;
        self
    }

    /// # Errors
    /// `DecodeError` unless the bytes are a valid non-identity G1 point.
    pub fn blinded_message(&self) -> Result<BlindedMessage, DecodeError> {
        BlindedMessage::try_from(self.blinded_message.as_slice())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WireProof {
    #[serde(with = "hex")]
    pub p: Vec<u8>,
    #[serde(with = "hex")]
    pub c: Vec<u8>,
    #[serde(with = "hex")]
    pub u: Vec<u8>,
}

impl From<&Proof> for WireProof {
    fn from(proof: &Proof) -> Self {
        let (p, c, u) = proof.to_parts();
        Self { p, c: c.to_vec(), u: u.to_vec() }
    }
}

impl WireProof {
    /// # Errors
    /// Per-field `DecodeError`.
    pub fn decode(&self) -> Result<Proof, DecodeError> {
        Proof::from_parts(&self.p, &self.c, &self.u)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvalResponse {
    #[serde(with = "hex")]
    pub result: Vec<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub proof: Option<WireProof>,
    /// Key version the result was computed under.
    pub version: u32,
}

impl EvalResponse {
    #[must_use]
    pub fn new(y: &PrfOutput, proof: Option<&Proof>, version: u32) -> Self {
        Self { result: y.to_bytes(), proof: proof.map(WireProof::from), version }
    }

    /// # Errors
    /// `DecodeError` unless `result` is a valid non-identity GT element.
    pub fn result(&self) -> Result<PrfOutput, DecodeError> {
        PrfOutput::try_from(self.result.as_slice())
    }

    /// # Errors
    /// Per-field `DecodeError` when a proof is present but malformed.
    pub fn proof(&self) -> Result<Option<Proof>, DecodeError> {
        self.proof.as_ref().map(WireProof::decode).transpose()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotationResponse {
    #[serde(with = "hex")]
    pub delta: Vec<u8>,
    #[serde(with = "hex")]
    pub new_commitment: Vec<u8>,
    pub previous_key_version: u32,
}

impl From<&RotationOutcome> for RotationResponse {
    fn from(outcome: &RotationOutcome) -> Self {
        Self {
            delta: outcome.rotation.delta.to_bytes().to_vec(),
            new_commitment: encode_g1(&outcome.rotation.commitment),
            previous_key_version: outcome.previous_version,
        }
    }
}

impl RotationResponse {
    /// # Errors
    /// `DecodeError` for a zero, out-of-range or wrong-length delta.
    pub fn delta(&self) -> Result<UpdateToken, DecodeError> {
        UpdateToken::try_from(self.delta.as_slice())
    }

    /// # Errors
    /// `DecodeError` unless the commitment is a valid non-identity G1 point.
    pub fn new_commitment(&self) -> Result<G1Affine, DecodeError> {
        decode_g1("new_commitment", &self.new_commitment)
    }
}

/// Parse a JSON-encoded message. Field contents are validated later by the
/// typed accessors.
///
/// # Errors
/// `Malformed` naming `what` on any JSON or hex error.
pub fn decode_message<T: DeserializeOwned>(what: &'static str, json: &[u8]) -> Result<T, DecodeError> {
    serde_json::from_slice(json).map_err(|_| DecodeError::Malformed { field: what })
}
