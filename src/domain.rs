//! Domain-separation tags. Every hash invocation in the protocol absorbs
//! exactly one of these before any caller-supplied bytes.

/// HKDF `info` for the bound key kw.
pub const TAG_KW: &[u8] = b"TAG_PYTHIA_KW";

/// SHAKE256 prefix for H1 (bytes -> G1).
pub const TAG_H1: &[u8] = b"PYTHIA-BN254-H1";

/// SHAKE256 prefix for H2 (bytes -> G2).
pub const TAG_H2: &[u8] = b"PYTHIA-BN254-H2";

/// SHAKE256 prefix for the Fiat-Shamir challenge Hz.
pub const TAG_HZ: &[u8] = b"PYTHIA-BN254-HZ";
