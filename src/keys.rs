use ark_bn254::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use ark_ff::{BigInt, BigInteger, Field, PrimeField, Zero};
use ark_std::UniformRand;
use hkdf::Hkdf;
use rand_core::{CryptoRng, RngCore};
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{domain::TAG_KW, errors::PythiaError, types::BoundKey};

/// kw = HKDF-SHA256(ikm = msk, salt = w || s, info = `TAG_KW`)[..32] mod r
///
/// # Errors
/// `KeyDerivation` if HKDF refuses the output length, `Degenerate` if kw
/// reduces to zero.
pub fn gen_kw(w: &[u8], msk: &[u8], s: &[u8]) -> Result<BoundKey, PythiaError> {
    let mut salt = Zeroizing::new(Vec::with_capacity(w.len() + s.len()));
    salt.extend_from_slice(w);
    salt.extend_from_slice(s);

    let hk = Hkdf::<Sha256>::new(Some(&salt[..]), msk);
    let mut okm = Zeroizing::new([0u8; 32]);
    hk.expand(TAG_KW, &mut okm[..]).map_err(|_| PythiaError::KeyDerivation)?;

    BoundKey::new(Fr::from_be_bytes_mod_order(&okm[..]))
}

/// k^(r-2) mod r. The only inversion routine in the crate.
///
/// # Errors
/// `Degenerate` for k = 0.
pub fn fermat_inverse(k: &Fr) -> Result<Fr, PythiaError> {
    if k.is_zero() {
        return Err(PythiaError::Degenerate("cannot invert zero"));
    }
    let mut exponent = Fr::MODULUS;
    let borrowed = exponent.sub_with_borrow(&BigInt::from(2u64));
    debug_assert!(!borrowed);
    Ok(k.pow(exponent))
}

/// Uniform in [1, r-1]; zeroized when dropped.
pub(crate) fn random_nonzero_scalar<R: RngCore + CryptoRng>(rng: &mut R) -> Zeroizing<Fr> {
    loop {
        let s = Zeroizing::new(Fr::rand(rng));
        if !s.is_zero() {
            return s;
        }
    }
}

/// P = kw·G
#[must_use]
pub fn commit(kw: &BoundKey) -> G1Affine {
    (G1Affine::generator() * kw.scalar()).into_affine()
}

/// The public commitment P = kw·G for a (w, msk, s) triple. Clients pin this
/// value to authenticate proofs.
///
/// # Errors
/// See [`gen_kw`].
pub fn public_commitment(w: &[u8], msk: &[u8], s: &[u8]) -> Result<G1Affine, PythiaError> {
    Ok(commit(&gen_kw(w, msk, s)?))
}
