use core::fmt;

use ark_bn254::{Bn254, Fr, G1Affine, G2Affine};
use ark_ec::{pairing::PairingOutput, AffineRepr};
use ark_ff::Zero;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::errors::PythiaError;

/// The pairing target group, written additively by arkworks: `a + b` is the
/// GT product and `a * k` is exponentiation.
pub type Gt = PairingOutput<Bn254>;

pub const SCALAR_LEN: usize = 32; // big-endian, < r
pub const G1_LEN: usize = 32;     // compressed
pub const G2_LEN: usize = 64;     // compressed
pub const GT_LEN: usize = 384;    // 12 x Fq

/// x = r·H1(message). Never the identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlindedMessage(G1Affine);

impl BlindedMessage {
    /// # Errors
    /// Rejects the identity point.
    pub fn new(point: G1Affine) -> Result<Self, PythiaError> {
        if point.is_zero() {
            return Err(PythiaError::Degenerate("blinded message is the identity"));
        }
        Ok(Self(point))
    }

    #[must_use]
    pub const fn point(&self) -> &G1Affine {
        &self.0
    }
}

/// `tTilde` = H2(t).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HashedTweak(G2Affine);

impl HashedTweak {
    /// # Errors
    /// Rejects the identity point.
    pub fn new(point: G2Affine) -> Result<Self, PythiaError> {
        if point.is_zero() {
            return Err(PythiaError::Degenerate("hashed tweak is the identity"));
        }
        Ok(Self(point))
    }

    #[must_use]
    pub const fn point(&self) -> &G2Affine {
        &self.0
    }
}

/// A PRF value in GT: either the masked server result y or the final z.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PrfOutput(Gt);

impl PrfOutput {
    /// # Errors
    /// Rejects the GT identity.
    pub fn new(element: Gt) -> Result<Self, PythiaError> {
        if element.is_zero() {
            return Err(PythiaError::Degenerate("PRF output is the identity"));
        }
        Ok(Self(element))
    }

    #[must_use]
    pub const fn element(&self) -> &Gt {
        &self.0
    }
}

/// kw, the per-selector secret scalar. Stays on the server.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BoundKey(Fr);

impl BoundKey {
    pub(crate) fn new(k: Fr) -> Result<Self, PythiaError> {
        if k.is_zero() {
            return Err(PythiaError::Degenerate("bound key is zero"));
        }
        Ok(Self(k))
    }

    #[must_use]
    pub const fn scalar(&self) -> &Fr {
        &self.0
    }
}

impl fmt::Debug for BoundKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BoundKey(<redacted>)")
    }
}

/// `rInv`, retained by the client between blind and deblind.
#[derive(Clone, Zeroize, ZeroizeOnDrop)]
pub struct BlindingFactor(Fr);

impl BlindingFactor {
    /// # Errors
    /// Rejects zero, which would erase the PRF output on deblind.
    pub fn from_inverse(r_inv: Fr) -> Result<Self, PythiaError> {
        if r_inv.is_zero() {
            return Err(PythiaError::Degenerate("blinding factor is zero"));
        }
        Ok(Self(r_inv))
    }

    #[must_use]
    pub const fn inverse(&self) -> &Fr {
        &self.0
    }
}

impl fmt::Debug for BlindingFactor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("BlindingFactor(<redacted>)")
    }
}

/// Non-interactive proof (P, c, u) that y = e(x, `tTilde`)^kw with P = kw·G.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Proof {
    p: G1Affine,
    c: Fr,
    u: Fr,
}

impl Proof {
    /// # Errors
    /// Rejects an identity commitment P.
    pub fn new(p: G1Affine, c: Fr, u: Fr) -> Result<Self, PythiaError> {
        if p.is_zero() {
            return Err(PythiaError::Degenerate("proof commitment is the identity"));
        }
        Ok(Self { p, c, u })
    }

    #[must_use]
    pub const fn p(&self) -> &G1Affine {
        &self.p
    }

    #[must_use]
    pub const fn c(&self) -> &Fr {
        &self.c
    }

    #[must_use]
    pub const fn u(&self) -> &Fr {
        &self.u
    }
}

/// delta = k2 / k1, moves outputs from one key epoch to the next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct UpdateToken(Fr);

impl UpdateToken {
    /// # Errors
    /// Rejects zero.
    pub fn new(delta: Fr) -> Result<Self, PythiaError> {
        if delta.is_zero() {
            return Err(PythiaError::Degenerate("update token is zero"));
        }
        Ok(Self(delta))
    }

    #[must_use]
    pub const fn scalar(&self) -> &Fr {
        &self.0
    }
}

/// Output of a key rotation: the update token and the new public commitment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rotation {
    pub delta: UpdateToken,
    pub commitment: G1Affine,
}

/// Server-side result of Eval. `kw` and `t_tilde` exist only to build a proof
/// in the same request.
#[derive(Debug)]
pub struct Evaluation {
    pub y: PrfOutput,
    pub kw: BoundKey,
    pub t_tilde: HashedTweak,
}
