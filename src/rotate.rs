use crate::{
    errors::PythiaError,
    keys::{commit, fermat_inverse, gen_kw},
    types::{PrfOutput, Rotation, UpdateToken},
};

/// Update token moving outputs from key (w1, msk1, s1) to (w2, msk2, s2).
///
/// delta = k2 · k1^-1 mod r, and the new public commitment P2 = k2·G.
///
/// # Errors
/// Key derivation failures, or `Degenerate` if either key is zero.
pub fn get_delta(
    w1: &[u8],
    msk1: &[u8],
    s1: &[u8],
    w2: &[u8],
    msk2: &[u8],
    s2: &[u8],
) -> Result<Rotation, PythiaError> {
    let k1 = gen_kw(w1, msk1, s1)?;
    let k2 = gen_kw(w2, msk2, s2)?;

    let delta = UpdateToken::new(*k2.scalar() * fermat_inverse(k1.scalar())?)?;
    Ok(Rotation { delta, commitment: commit(&k2) })
}

/// z' = z^delta
///
/// # Errors
/// `Degenerate` if the result is the GT identity.
pub fn update(z: &PrfOutput, delta: &UpdateToken) -> Result<PrfOutput, PythiaError> {
    PrfOutput::new(*z.element() * *delta.scalar())
}
