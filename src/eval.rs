use ark_bn254::Bn254;
use ark_ec::pairing::Pairing;

use crate::{
    errors::PythiaError,
    hashers::hash_tweak,
    keys::gen_kw,
    types::{BlindedMessage, BoundKey, Evaluation, HashedTweak, PrfOutput},
};

/// Server-side PRF evaluation over a blinded message.
///
/// kw = `genKw(w, msk, s)`, `tTilde` = H2(t), y = e(kw·x, `tTilde`).
///
/// `x` must already be a decoded, validated [`BlindedMessage`]; wire bytes go
/// through `BlindedMessage::try_from` first. The returned `kw` and `t_tilde`
/// are for [`crate::proof::prove`] in the same request and must not be sent to
/// the client.
///
/// # Errors
/// `KeyDerivation`/`Degenerate` from key derivation or hashing, `Degenerate`
/// if y is the identity.
pub fn eval(
    w: &[u8],
    t: &[u8],
    x: &BlindedMessage,
    msk: &[u8],
    s: &[u8],
) -> Result<Evaluation, PythiaError> {
    let kw = gen_kw(w, msk, s)?;
    let t_tilde = hash_tweak(t)?;
    let y = eval_with_key(&kw, x, &t_tilde)?;
    Ok(Evaluation { y, kw, t_tilde })
}

/// y = e(kw·x, `tTilde`) for an already derived key.
///
/// # Errors
/// `Degenerate` if y is the identity.
pub fn eval_with_key(
    kw: &BoundKey,
    x: &BlindedMessage,
    t_tilde: &HashedTweak,
) -> Result<PrfOutput, PythiaError> {
    let xkw = *x.point() * kw.scalar();
    PrfOutput::new(Bn254::pairing(xkw, *t_tilde.point()))
}
