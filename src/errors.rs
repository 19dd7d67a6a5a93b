use thiserror::Error;

/// Rejection of a malformed wire value. Carries the name of the field that
/// failed so callers can report which part of a message was bad.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("{field}: invalid length: expected {expected} got {got}")]
    InvalidLength { field: &'static str, expected: usize, got: usize },

    #[error("{field}: scalar not reduced modulo the group order")]
    ScalarOutOfRange { field: &'static str },

    #[error("{field}: not a valid group element")]
    InvalidPoint { field: &'static str },

    #[error("{field}: identity element")]
    Identity { field: &'static str },

    #[error("{field}: malformed message")]
    Malformed { field: &'static str },
}

#[derive(Debug, Error)]
pub enum PythiaError {
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("zero-knowledge proof failed verification")]
    ProofVerificationFailed,

    #[error("unknown or retired key version {version}")]
    InvalidKeyVersion { version: u32 },

    #[error("no key material for ensemble selector")]
    UnknownSelector,

    #[error("ensemble selector already provisioned")]
    AlreadyProvisioned,

    #[error("degenerate value: {0}")]
    Degenerate(&'static str),

    #[error("key derivation failed")]
    KeyDerivation,

    #[error("key table lock poisoned")]
    KeyTablePoisoned,

    #[error("config error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(String),
}
