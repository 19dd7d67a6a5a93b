#![forbid(unsafe_code)]
#![deny(warnings)]
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

//! Pythia verifiable, rotatable OPRF over BN254.
//!
//! A client blinds its message, the server evaluates it under a key bound to
//! an ensemble selector `w` and a public tweak `t`, and proves in zero
//! knowledge that it used the key committed to by `P = kw·G`. The client
//! deblinds to a value that depends only on `(w, t, m)` and the server's key.
//! Key rotation publishes an update token that moves stored outputs to the
//! new key without the clients' messages.
//!
// Fixed cryptographic choices:
// - Curve: BN254 (arkworks), G1 for messages, G2 for tweaks, GT for outputs
// - Hash-to-group: SHAKE256 seeded sampling, domain-tagged per group
// - Key derivation: HKDF-SHA256, info "TAG_PYTHIA_KW"
// - Proof: Fiat-Shamir Schnorr equality of discrete logs across G1 and GT
// - Encodings: big-endian scalars, arkworks compressed points

// Core modules
pub mod types;
pub mod errors;
pub mod ser;
pub mod domain;
pub mod hashers;
pub mod keys;
pub mod blind;
pub mod eval;
pub mod proof;
pub mod rotate;

// Endpoints
pub mod config;
pub mod key_table;
pub mod messages;
pub mod server;
pub mod client;

// Re-export commonly used types and functions
pub use types::*;
pub use errors::{DecodeError, PythiaError};
pub use blind::{blind, blind_with_rng, deblind};
pub use eval::{eval, eval_with_key};
pub use keys::{gen_kw, public_commitment};
pub use proof::{prove, prove_with_rng, verify, verify_with_commitment};
pub use rotate::{get_delta, update};
pub use config::PythiaConfig;
pub use key_table::{KeyMaterial, KeySnapshot, KeyStore, KeyTable, CURRENT_VERSION};
pub use messages::{decode_message, EvalRequest, EvalResponse, RotationResponse, WireProof};
pub use server::PythiaServer;
pub use client::{PythiaClient, Transport};

// Version and protocol constants
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROTOCOL_VERSION: u32 = 1;
