//! H1, H2 and Hz.
//!
//! H1/H2 seed SHAKE256 with a domain tag and the input, then let the XOF
//! stream drive arkworks' uniform point sampler (random x, sign bit, lift,
//! cofactor clearing). The output has no known discrete log relative to the
//! generator. Hz absorbs a length-framed transcript and reduces 64 bytes of
//! XOF output mod r.

use ark_bn254::{Fr, G1Affine, G1Projective, G2Affine, G2Projective};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::PrimeField;
use ark_std::UniformRand;
use rand_core::{impls, RngCore};
use sha3::{
    digest::{ExtendableOutput, Update, XofReader},
    Shake256, Shake256Reader,
};

use crate::{
    domain::{TAG_H1, TAG_H2, TAG_HZ},
    errors::PythiaError,
    types::HashedTweak,
};

/// Deterministic byte stream for the point sampler. Not a CSPRNG for secrets.
struct XofRng(Shake256Reader);

impl XofRng {
    fn new(tag: &[u8], input: &[u8]) -> Self {
        let mut xof = Shake256::default();
        xof.update(tag);
        xof.update(input);
        Self(xof.finalize_xof())
    }
}

impl RngCore for XofRng {
    fn next_u32(&mut self) -> u32 {
        impls::next_u32_via_fill(self)
    }

    fn next_u64(&mut self) -> u64 {
        impls::next_u64_via_fill(self)
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        self.0.read(dest);
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand_core::Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}

/// H1: bytes -> G1.
///
/// # Errors
/// `Degenerate` if sampling lands on the identity.
pub fn hash_to_g1(input: &[u8]) -> Result<G1Affine, PythiaError> {
    let p = G1Projective::rand(&mut XofRng::new(TAG_H1, input)).into_affine();
    if p.is_zero() {
        return Err(PythiaError::Degenerate("H1 output is the identity"));
    }
    Ok(p)
}

/// H2: bytes -> G2.
///
/// # Errors
/// `Degenerate` if cofactor clearing lands on the identity.
pub fn hash_to_g2(input: &[u8]) -> Result<G2Affine, PythiaError> {
    let p = G2Projective::rand(&mut XofRng::new(TAG_H2, input)).into_affine();
    if p.is_zero() {
        return Err(PythiaError::Degenerate("H2 output is the identity"));
    }
    Ok(p)
}

/// `tTilde` = H2(t).
///
/// # Errors
/// See [`hash_to_g2`].
pub fn hash_tweak(tweak: &[u8]) -> Result<HashedTweak, PythiaError> {
    HashedTweak::new(hash_to_g2(tweak)?)
}

/// Hz = SHAKE256( TAG_HZ || Σ ( LE64(|p|) || p ) ) reduced mod r.
#[must_use]
pub fn hash_to_scalar(parts: &[&[u8]]) -> Fr {
    let mut xof = Shake256::default();
    xof.update(TAG_HZ);
    for p in parts {
        xof.update(&(p.len() as u64).to_le_bytes());
        xof.update(p);
    }
    let mut wide = [0u8; 64];
    xof.finalize_xof().read(&mut wide);
    Fr::from_be_bytes_mod_order(&wide)
}
