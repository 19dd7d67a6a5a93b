//! End-to-end protocol tests: blind, eval, prove, verify, deblind, rotate.

use pythia_oprf::*;
use pythia_oprf::ser::encode_gt;
use rand_core::{OsRng, RngCore};

const SELECTOR: &[u8] = b"selector-1";
const TWEAK: &[u8] = b"user@example.com";
const MESSAGE: &[u8] = b"hunter2";

fn random_key() -> ([u8; 32], [u8; 16]) {
    let mut msk = [0u8; 32];
    let mut s = [0u8; 16];
    OsRng.fill_bytes(&mut msk);
    OsRng.fill_bytes(&mut s);
    (msk, s)
}

fn flip(bytes: &[u8], bit: usize) -> Vec<u8> {
    let mut out = bytes.to_vec();
    out[bit / 8] ^= 1 << (bit % 8);
    out
}

#[test]
fn test_determinism_over_many_blindings() {
    let (msk, s) = random_key();
    let outputs: Vec<Vec<u8>> = (0..100)
        .map(|_| {
            let (r_inv, x) = blind(MESSAGE).unwrap();
            let y = eval(SELECTOR, TWEAK, &x, &msk, &s).unwrap().y;
            deblind(&r_inv, &y).unwrap().to_bytes()
        })
        .collect();
    assert!(outputs.windows(2).all(|w| w[0] == w[1]));
}

#[test]
fn test_concrete_scenario() {
    let (msk, s) = random_key();
    let (r_inv, x) = blind(MESSAGE).unwrap();
    let ev = eval(SELECTOR, TWEAK, &x, &msk, &s).unwrap();
    let proof = prove(&x, &ev.t_tilde, &ev.kw, &ev.y).unwrap();

    let commitment = public_commitment(SELECTOR, &msk, &s).unwrap();
    assert_eq!(*proof.p(), commitment);
    verify_with_commitment(&x, TWEAK, &ev.y, &proof, &commitment).unwrap();

    let z = deblind(&r_inv, &ev.y).unwrap();
    assert_eq!(z.to_bytes().len(), GT_LEN);

    // A second run with a fresh blinding factor lands on the same z.
    let (r_inv2, x2) = blind(MESSAGE).unwrap();
    assert_ne!(x2, x);
    let ev2 = eval(SELECTOR, TWEAK, &x2, &msk, &s).unwrap();
    let proof2 = prove(&x2, &ev2.t_tilde, &ev2.kw, &ev2.y).unwrap();
    verify_with_commitment(&x2, TWEAK, &ev2.y, &proof2, &commitment).unwrap();
    assert_eq!(deblind(&r_inv2, &ev2.y).unwrap(), z);
}

#[test]
fn test_negative_scenario() {
    let (msk, s) = random_key();
    let (_, x) = blind(MESSAGE).unwrap();
    let ev = eval(SELECTOR, TWEAK, &x, &msk, &s).unwrap();
    let proof = prove(&x, &ev.t_tilde, &ev.kw, &ev.y).unwrap();

    assert!(matches!(
        verify(&x, b"someone@example.com", &ev.y, &proof),
        Err(PythiaError::ProofVerificationFailed)
    ));

    let (p, mut c, u) = proof.to_parts();
    c[31] = c[31].wrapping_add(1);
    let bumped = Proof::from_parts(&p, &c, &u).unwrap();
    assert!(matches!(
        verify(&x, TWEAK, &ev.y, &bumped),
        Err(PythiaError::ProofVerificationFailed)
    ));
}

/// Decode every field from raw bytes and verify, as a client would.
fn accepts(x: &[u8], t: &[u8], y: &[u8], p: &[u8], c: &[u8], u: &[u8]) -> bool {
    let Ok(x) = BlindedMessage::try_from(x) else { return false };
    let Ok(y) = PrfOutput::try_from(y) else { return false };
    let Ok(proof) = Proof::from_parts(p, c, u) else { return false };
    verify(&x, t, &y, &proof).is_ok()
}

#[test]
fn test_single_bit_flips_are_rejected() {
    let (msk, s) = random_key();
    let (_, x) = blind(MESSAGE).unwrap();
    let ev = eval(SELECTOR, TWEAK, &x, &msk, &s).unwrap();
    let proof = prove(&x, &ev.t_tilde, &ev.kw, &ev.y).unwrap();

    let x = x.to_bytes();
    let y = encode_gt(ev.y.element());
    let (p, c, u) = proof.to_parts();
    assert!(accepts(&x, TWEAK, &y, &p, &c, &u));

    for bit in [0, 1, 9, 100, 200, 250, 255] {
        assert!(!accepts(&flip(&x, bit), TWEAK, &y, &p, &c, &u), "x bit {bit}");
        assert!(!accepts(&x, &flip(TWEAK, bit % (TWEAK.len() * 8)), &y, &p, &c, &u), "t bit {bit}");
        assert!(!accepts(&x, TWEAK, &flip(&y, bit * 11), &p, &c, &u), "y bit {bit}");
        assert!(!accepts(&x, TWEAK, &y, &flip(&p, bit), &c, &u), "P bit {bit}");
        assert!(!accepts(&x, TWEAK, &y, &p, &flip(&c, bit), &u), "c bit {bit}");
        assert!(!accepts(&x, TWEAK, &y, &p, &c, &flip(&u, bit)), "u bit {bit}");
    }
}

#[test]
fn test_rotation_homomorphism() {
    let (msk1, s1) = random_key();
    let (msk2, s2) = random_key();
    let (r_inv, x) = blind(MESSAGE).unwrap();

    let z_old = deblind(&r_inv, &eval(SELECTOR, TWEAK, &x, &msk1, &s1).unwrap().y).unwrap();
    let z_new = deblind(&r_inv, &eval(b"selector-2", TWEAK, &x, &msk2, &s2).unwrap().y).unwrap();

    let rotation = get_delta(SELECTOR, &msk1, &s1, b"selector-2", &msk2, &s2).unwrap();
    assert_eq!(update(&z_old, &rotation.delta).unwrap(), z_new);
}

// In-process transports

/// Sends requests through JSON, the way a network host would.
struct JsonLoopback<'a>(&'a PythiaServer<KeyTable>);

impl Transport for JsonLoopback<'_> {
    fn send(&self, request: &EvalRequest) -> Result<EvalResponse, PythiaError> {
        let wire = serde_json::to_vec(request).map_err(|e| PythiaError::Transport(e.to_string()))?;
        let request: EvalRequest = decode_message("eval_request", &wire)?;
        let response = self.0.eval(&request)?;
        let wire = serde_json::to_vec(&response).map_err(|e| PythiaError::Transport(e.to_string()))?;
        Ok(decode_message("eval_response", &wire)?)
    }
}

/// Answers honestly but drops the proof.
struct StripProof<'a>(&'a PythiaServer<KeyTable>);

impl Transport for StripProof<'_> {
    fn send(&self, request: &EvalRequest) -> Result<EvalResponse, PythiaError> {
        let mut response = self.0.eval(request)?;
        response.proof = None;
        Ok(response)
    }
}

struct Offline;

impl Transport for Offline {
    fn send(&self, _: &EvalRequest) -> Result<EvalResponse, PythiaError> {
        Err(PythiaError::Transport("connection refused".into()))
    }
}

fn provisioned_server() -> PythiaServer<KeyTable> {
    let (msk, s) = random_key();
    let table = KeyTable::new(&PythiaConfig::default()).unwrap();
    table.provision(SELECTOR, KeyMaterial::new(msk.to_vec(), s.to_vec())).unwrap();
    PythiaServer::new(SELECTOR, table)
}

#[test]
fn test_client_server_round_trip() {
    let server = provisioned_server();
    let client = PythiaClient::new(JsonLoopback(&server), PythiaConfig::default())
        .unwrap()
        .with_commitment(server.commitment().unwrap());

    let z1 = client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION).unwrap();
    let z2 = client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION).unwrap();
    assert_eq!(z1, z2);

    let snapshot = server.keys().get(SELECTOR, CURRENT_VERSION).unwrap();
    let (r_inv, x) = blind(MESSAGE).unwrap();
    let direct = eval(
        SELECTOR,
        TWEAK,
        &x,
        snapshot.material.master_key(),
        snapshot.material.state(),
    )
    .unwrap();
    assert_eq!(deblind(&r_inv, &direct.y).unwrap(), z1);
}

#[test]
fn test_client_rejects_missing_proof() {
    let server = provisioned_server();
    let client = PythiaClient::new(StripProof(&server), PythiaConfig::default()).unwrap();
    assert!(matches!(
        client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION),
        Err(PythiaError::ProofVerificationFailed)
    ));

    let config = PythiaConfig { include_proof: false, ..PythiaConfig::default() };
    let unverified = PythiaClient::new(StripProof(&server), config).unwrap();
    assert!(unverified.evaluate(TWEAK, MESSAGE, CURRENT_VERSION).is_ok());
}

#[test]
fn test_client_rejects_foreign_commitment() {
    let server = provisioned_server();
    let other = provisioned_server();
    let client = PythiaClient::new(JsonLoopback(&server), PythiaConfig::default())
        .unwrap()
        .with_commitment(other.commitment().unwrap());
    assert!(matches!(
        client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION),
        Err(PythiaError::ProofVerificationFailed)
    ));
}

#[test]
fn test_transport_errors_pass_through() {
    let client = PythiaClient::new(Offline, PythiaConfig::default()).unwrap();
    assert!(matches!(
        client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION),
        Err(PythiaError::Transport(_))
    ));
}

#[test]
fn test_rotation_through_endpoints() {
    let server = provisioned_server();
    let mut client = PythiaClient::new(JsonLoopback(&server), PythiaConfig::default())
        .unwrap()
        .with_commitment(server.commitment().unwrap());
    let z_v1 = client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION).unwrap();

    let (msk, s) = random_key();
    let rotation = server.rotate(KeyMaterial::new(msk.to_vec(), s.to_vec())).unwrap();
    let wire = serde_json::to_vec(&rotation).unwrap();
    let rotation: RotationResponse = decode_message("rotation_response", &wire).unwrap();
    assert_eq!(rotation.previous_key_version, 1);

    // Old version stays usable inside the retention window.
    assert_eq!(client.evaluate(TWEAK, MESSAGE, 1).unwrap(), z_v1);

    let z_moved = client.apply_rotation(&z_v1, &rotation).unwrap();
    assert_eq!(client.evaluate(TWEAK, MESSAGE, CURRENT_VERSION).unwrap(), z_moved);
    assert_eq!(client.evaluate(TWEAK, MESSAGE, 2).unwrap(), z_moved);
}
