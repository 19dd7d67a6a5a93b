//! Fiat-Shamir Schnorr proof that the server used the kw behind its public
//! commitment: knowledge of kw with P = kw·G and y = e(x, `tTilde`)^kw.
//!
//! ```text
//! Prove(x, tTilde, kw, y):
//!   beta = e(x, tTilde); P = kw·G; v <- Z_r*
//!   t1 = v·G; t2 = beta^v
//!   c = Hz(G, P, beta, y, t1, t2); u = v - c·kw
//! Verify(x, t, y, P, c, u):
//!   beta = e(x, H2(t)); t1' = u·G + c·P; t2' = y^c · beta^u
//!   accept iff Hz(G, P, beta, y, t1', t2') == c
//! ```

use ark_bn254::{Bn254, Fr, G1Affine};
use ark_ec::{pairing::Pairing, AffineRepr, CurveGroup};
use rand_core::{CryptoRng, OsRng, RngCore};
use subtle::ConstantTimeEq;

use crate::{
    errors::PythiaError,
    hashers::{hash_to_scalar, hash_tweak},
    keys::{commit, random_nonzero_scalar},
    ser::{encode_g1, encode_gt, encode_scalar},
    types::{BlindedMessage, BoundKey, Gt, HashedTweak, PrfOutput, Proof},
};

fn challenge(p: &G1Affine, beta: &Gt, y: &Gt, t1: &G1Affine, t2: &Gt) -> Fr {
    hash_to_scalar(&[
        encode_g1(&G1Affine::generator()).as_slice(),
        encode_g1(p).as_slice(),
        encode_gt(beta).as_slice(),
        encode_gt(y).as_slice(),
        encode_g1(t1).as_slice(),
        encode_gt(t2).as_slice(),
    ])
}

/// Prove with a witness nonce from the OS RNG.
///
/// # Errors
/// `Degenerate` if the commitment is the identity.
pub fn prove(
    x: &BlindedMessage,
    t_tilde: &HashedTweak,
    kw: &BoundKey,
    y: &PrfOutput,
) -> Result<Proof, PythiaError> {
    prove_with_rng(x, t_tilde, kw, y, &mut OsRng)
}

/// [`prove`] with a caller-supplied RNG. The nonce v is zeroized on return.
///
/// # Errors
/// `Degenerate` if the commitment is the identity.
pub fn prove_with_rng<R: RngCore + CryptoRng>(
    x: &BlindedMessage,
    t_tilde: &HashedTweak,
    kw: &BoundKey,
    y: &PrfOutput,
    rng: &mut R,
) -> Result<Proof, PythiaError> {
    let beta = Bn254::pairing(*x.point(), *t_tilde.point());
    let p = commit(kw);

    let v = random_nonzero_scalar(rng);
    let t1 = (G1Affine::generator() * *v).into_affine();
    let t2 = beta * *v;

    let c = challenge(&p, &beta, y.element(), &t1, &t2);
    let u = *v - c * kw.scalar();
    Proof::new(p, c, u)
}

/// Check a proof against the blinded message, the raw tweak and the server
/// result. Any mismatch is `ProofVerificationFailed`, which is final.
///
/// # Errors
/// `ProofVerificationFailed`, or `Degenerate` if H2(t) is the identity.
pub fn verify(
    x: &BlindedMessage,
    t: &[u8],
    y: &PrfOutput,
    proof: &Proof,
) -> Result<(), PythiaError> {
    let t_tilde = hash_tweak(t)?;
    let beta = Bn254::pairing(*x.point(), *t_tilde.point());

    let t1 = (G1Affine::generator() * proof.u() + *proof.p() * proof.c()).into_affine();
    let t2 = *y.element() * *proof.c() + beta * *proof.u();

    let expected = encode_scalar(&challenge(proof.p(), &beta, y.element(), &t1, &t2));
    if bool::from(expected[..].ct_eq(&encode_scalar(proof.c())[..])) {
        Ok(())
    } else {
        Err(PythiaError::ProofVerificationFailed)
    }
}

/// [`verify`], additionally requiring the proof to be made under a commitment
/// the client already trusts.
///
/// # Errors
/// `ProofVerificationFailed` on a commitment mismatch or a bad proof.
pub fn verify_with_commitment(
    x: &BlindedMessage,
    t: &[u8],
    y: &PrfOutput,
    proof: &Proof,
    commitment: &G1Affine,
) -> Result<(), PythiaError> {
    if proof.p() != commitment {
        return Err(PythiaError::ProofVerificationFailed);
    }
    verify(x, t, y, proof)
}
