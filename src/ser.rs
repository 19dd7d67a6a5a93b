//! Canonical byte encodings.
//!
//! Scalars are fixed-width big-endian and must be `< r`. Group elements use the
//! arkworks compressed form and are validated (on curve, in the order-r
//! subgroup, not the identity) before any arithmetic sees them. Lengths are
//! exact; trailing bytes are an error.

use ark_bn254::{Fr, G1Affine, G2Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInt, BigInteger, PrimeField, Zero};
use ark_serialize::{CanonicalDeserialize, CanonicalSerialize};
use zeroize::Zeroizing;

use crate::{
    errors::DecodeError,
    types::{
        BlindedMessage, BlindingFactor, Gt, HashedTweak, PrfOutput, Proof, UpdateToken, G1_LEN,
        G2_LEN, GT_LEN, SCALAR_LEN,
    },
};

fn check_len(field: &'static str, expected: usize, bytes: &[u8]) -> Result<(), DecodeError> {
    if bytes.len() != expected {
        return Err(DecodeError::InvalidLength { field, expected, got: bytes.len() });
    }
    Ok(())
}

fn to_canonical<T: CanonicalSerialize>(value: &T) -> Vec<u8> {
    let mut out = Vec::with_capacity(value.compressed_size());
    // Vec<u8> writes are infallible.
    let _ = value.serialize_compressed(&mut out);
    out
}

/// Big-endian, exactly `SCALAR_LEN` bytes.
#[must_use]
pub fn encode_scalar(s: &Fr) -> [u8; SCALAR_LEN] {
    let be = s.into_bigint().to_bytes_be();
    let mut out = [0u8; SCALAR_LEN];
    out[SCALAR_LEN - be.len()..].copy_from_slice(&be);
    out
}

/// Decode a big-endian scalar, rejecting values `>= r` rather than reducing.
///
/// # Errors
/// `InvalidLength` or `ScalarOutOfRange`.
pub fn decode_scalar(field: &'static str, bytes: &[u8]) -> Result<Fr, DecodeError> {
    check_len(field, SCALAR_LEN, bytes)?;
    let mut limbs = [0u64; 4];
    for (limb, chunk) in limbs.iter_mut().zip(bytes.rchunks_exact(8)) {
        let mut word = [0u8; 8];
        word.copy_from_slice(chunk);
        *limb = u64::from_be_bytes(word);
    }
    Fr::from_bigint(BigInt::new(limbs)).ok_or(DecodeError::ScalarOutOfRange { field })
}

/// Like [`decode_scalar`] but also rejects zero.
///
/// # Errors
/// `InvalidLength`, `ScalarOutOfRange` or `Identity`.
pub fn decode_nonzero_scalar(field: &'static str, bytes: &[u8]) -> Result<Fr, DecodeError> {
    let s = decode_scalar(field, bytes)?;
    if s.is_zero() {
        return Err(DecodeError::Identity { field });
    }
    Ok(s)
}

#[must_use]
pub fn encode_g1(p: &G1Affine) -> Vec<u8> {
    to_canonical(p)
}

/// # Errors
/// `InvalidLength`, `InvalidPoint` (off curve / wrong subgroup / bad flags) or `Identity`.
pub fn decode_g1(field: &'static str, bytes: &[u8]) -> Result<G1Affine, DecodeError> {
    check_len(field, G1_LEN, bytes)?;
    let p = G1Affine::deserialize_compressed(bytes).map_err(|_| DecodeError::InvalidPoint { field })?;
    if p.is_zero() {
        return Err(DecodeError::Identity { field });
    }
    Ok(p)
}

#[must_use]
pub fn encode_g2(p: &G2Affine) -> Vec<u8> {
    to_canonical(p)
}

/// # Errors
/// `InvalidLength`, `InvalidPoint` or `Identity`.
pub fn decode_g2(field: &'static str, bytes: &[u8]) -> Result<G2Affine, DecodeError> {
    check_len(field, G2_LEN, bytes)?;
    let p = G2Affine::deserialize_compressed(bytes).map_err(|_| DecodeError::InvalidPoint { field })?;
    if p.is_zero() {
        return Err(DecodeError::Identity { field });
    }
    Ok(p)
}

#[must_use]
pub fn encode_gt(e: &Gt) -> Vec<u8> {
    to_canonical(e)
}

/// Decoding checks membership in the order-r subgroup of Fq12*.
///
/// # Errors
/// `InvalidLength`, `InvalidPoint` or `Identity`.
pub fn decode_gt(field: &'static str, bytes: &[u8]) -> Result<Gt, DecodeError> {
    check_len(field, GT_LEN, bytes)?;
    let e = Gt::deserialize_compressed(bytes).map_err(|_| DecodeError::InvalidPoint { field })?;
    if e.is_zero() {
        return Err(DecodeError::Identity { field });
    }
    Ok(e)
}

// Typed codecs: one field name per wire value so errors say what was wrong.
macro_rules! impl_element_codec {
    ($t:ty, $field:literal, $encode:ident, $decode:ident, $getter:ident) => {
        impl $t {
            #[must_use]
            pub fn to_bytes(&self) -> Vec<u8> {
                $encode(self.$getter())
            }
        }

        impl TryFrom<&[u8]> for $t {
            type Error = DecodeError;
            fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
                let value = $decode($field, b)?;
                Self::new(value).map_err(|_| DecodeError::Identity { field: $field })
            }
        }
    };
}

impl_element_codec!(BlindedMessage, "blinded_message", encode_g1, decode_g1, point);
impl_element_codec!(HashedTweak, "hashed_tweak", encode_g2, decode_g2, point);
impl_element_codec!(PrfOutput, "result", encode_gt, decode_gt, element);

impl UpdateToken {
    #[must_use]
    pub fn to_bytes(&self) -> [u8; SCALAR_LEN] {
        encode_scalar(self.scalar())
    }
}

impl TryFrom<&[u8]> for UpdateToken {
    type Error = DecodeError;
    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        let delta = decode_nonzero_scalar("delta", b)?;
        Self::new(delta).map_err(|_| DecodeError::Identity { field: "delta" })
    }
}

impl BlindingFactor {
    /// Serialized `rInv` for clients that persist it between blind and deblind.
    #[must_use]
    pub fn to_bytes(&self) -> Zeroizing<[u8; SCALAR_LEN]> {
        Zeroizing::new(encode_scalar(self.inverse()))
    }
}

impl TryFrom<&[u8]> for BlindingFactor {
    type Error = DecodeError;
    fn try_from(b: &[u8]) -> Result<Self, Self::Error> {
        let r_inv = Zeroizing::new(decode_nonzero_scalar("blinding_factor", b)?);
        Self::from_inverse(*r_inv).map_err(|_| DecodeError::Identity { field: "blinding_factor" })
    }
}

impl Proof {
    /// (P, c, u) as three separate byte strings, matching the wire shape.
    #[must_use]
    pub fn to_parts(&self) -> (Vec<u8>, [u8; SCALAR_LEN], [u8; SCALAR_LEN]) {
        (encode_g1(self.p()), encode_scalar(self.c()), encode_scalar(self.u()))
    }

    /// # Errors
    /// Per-field `DecodeError` for P, c or u.
    pub fn from_parts(p: &[u8], c: &[u8], u: &[u8]) -> Result<Self, DecodeError> {
        let p = decode_g1("proof.p", p)?;
        let c = decode_scalar("proof.c", c)?;
        let u = decode_scalar("proof.u", u)?;
        Self::new(p, c, u).map_err(|_| DecodeError::Identity { field: "proof.p" })
    }
}
