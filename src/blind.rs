use ark_ec::CurveGroup;
use rand_core::{CryptoRng, OsRng, RngCore};

use crate::{
    errors::PythiaError,
    hashers::hash_to_g1,
    keys::{fermat_inverse, random_nonzero_scalar},
    types::{BlindedMessage, BlindingFactor, PrfOutput},
};

/// Mask `message` with a fresh r from the OS RNG.
///
/// Returns `rInv` (keep it) and x = r·H1(message) (send it).
///
/// # Errors
/// `Degenerate` on an identity H1 output.
pub fn blind(message: &[u8]) -> Result<(BlindingFactor, BlindedMessage), PythiaError> {
    blind_with_rng(message, &mut OsRng)
}

/// [`blind`] with a caller-supplied RNG.
///
/// # Errors
/// `Degenerate` on an identity H1 output.
pub fn blind_with_rng<R: RngCore + CryptoRng>(
    message: &[u8],
    rng: &mut R,
) -> Result<(BlindingFactor, BlindedMessage), PythiaError> {
    let r = random_nonzero_scalar(rng);
    let r_inv = BlindingFactor::from_inverse(fermat_inverse(&r)?)?;
    let x = (hash_to_g1(message)? * *r).into_affine();
    Ok((r_inv, BlindedMessage::new(x)?))
}

/// Unmask: z = y raised to `rInv`.
///
/// # Errors
/// `Degenerate` if the result is the GT identity.
pub fn deblind(r_inv: &BlindingFactor, y: &PrfOutput) -> Result<PrfOutput, PythiaError> {
    PrfOutput::new(*y.element() * *r_inv.inverse())
}
