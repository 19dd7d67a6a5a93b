//! Property-based tests for the Pythia OPRF

use pythia_oprf::*;
use pythia_oprf::hashers::hash_to_scalar;
use pythia_oprf::ser::{decode_g1, decode_g2, decode_gt, decode_scalar};
use proptest::prelude::*;

// Pairings are slow; keep the case count small for the crypto properties.
fn crypto_cases() -> ProptestConfig {
    ProptestConfig::with_cases(8)
}

// Property test: the deblinded output does not depend on the blinding factor
proptest! {
    #![proptest_config(crypto_cases())]
    #[test]
    fn output_independent_of_blinding(
        w in prop::collection::vec(any::<u8>(), 1..32),
        t in prop::collection::vec(any::<u8>(), 0..64),
        m in prop::collection::vec(any::<u8>(), 0..64),
        msk in prop::array::uniform32(any::<u8>()),
        s in prop::array::uniform16(any::<u8>()),
    ) {
        let (r1, x1) = blind(&m).unwrap();
        let (r2, x2) = blind(&m).unwrap();
        prop_assert_ne!(x1, x2);

        let z1 = deblind(&r1, &eval(&w, &t, &x1, &msk, &s).unwrap().y).unwrap();
        let z2 = deblind(&r2, &eval(&w, &t, &x2, &msk, &s).unwrap().y).unwrap();
        prop_assert_eq!(z1, z2);
    }
}

// Property test: honest proofs always verify under the public commitment
proptest! {
    #![proptest_config(crypto_cases())]
    #[test]
    fn honest_proofs_verify(
        t in prop::collection::vec(any::<u8>(), 0..64),
        m in prop::collection::vec(any::<u8>(), 0..64),
        msk in prop::array::uniform32(any::<u8>()),
        s in prop::array::uniform16(any::<u8>()),
    ) {
        let (_, x) = blind(&m).unwrap();
        let ev = eval(b"selector-1", &t, &x, &msk, &s).unwrap();
        let proof = prove(&x, &ev.t_tilde, &ev.kw, &ev.y).unwrap();
        let commitment = public_commitment(b"selector-1", &msk, &s).unwrap();
        prop_assert!(verify_with_commitment(&x, &t, &ev.y, &proof, &commitment).is_ok());
    }
}

// Property test: rotation tokens carry outputs between arbitrary key triples
proptest! {
    #![proptest_config(crypto_cases())]
    #[test]
    fn rotation_homomorphism(
        w1 in prop::collection::vec(any::<u8>(), 1..32),
        w2 in prop::collection::vec(any::<u8>(), 1..32),
        msk1 in prop::array::uniform32(any::<u8>()),
        msk2 in prop::array::uniform32(any::<u8>()),
        s1 in prop::array::uniform16(any::<u8>()),
        s2 in prop::array::uniform16(any::<u8>()),
    ) {
        let (r_inv, x) = blind(b"hunter2").unwrap();
        let z_old = deblind(&r_inv, &eval(&w1, b"t", &x, &msk1, &s1).unwrap().y).unwrap();
        let z_new = deblind(&r_inv, &eval(&w2, b"t", &x, &msk2, &s2).unwrap().y).unwrap();

        let rotation = get_delta(&w1, &msk1, &s1, &w2, &msk2, &s2).unwrap();
        prop_assert_eq!(update(&z_old, &rotation.delta).unwrap(), z_new);
        prop_assert_eq!(rotation.commitment, public_commitment(&w2, &msk2, &s2).unwrap());
    }
}

// Property test: decoders are total over arbitrary input
proptest! {
    #[test]
    fn decoders_never_panic(data in prop::collection::vec(any::<u8>(), 0..512)) {
        let _ = decode_scalar("scalar", &data);
        let _ = decode_g1("g1", &data);
        let _ = decode_g2("g2", &data);
        let _ = decode_message::<EvalRequest>("eval_request", &data);
        let _ = decode_message::<EvalResponse>("eval_response", &data);
        let _ = decode_message::<RotationResponse>("rotation_response", &data);
    }
}

// Property test: GT decoding only ever accepts canonical 384-byte encodings
proptest! {
    #![proptest_config(crypto_cases())]
    #[test]
    fn gt_decoder_rejects_noise(data in prop::collection::vec(any::<u8>(), GT_LEN..=GT_LEN)) {
        prop_assert!(decode_gt("result", &data).is_err());
    }
}

// Property test: the transcript hash is sensitive to part boundaries
proptest! {
    #[test]
    fn transcript_framing_is_unambiguous(
        data in prop::collection::vec(any::<u8>(), 2..64),
        split in 1usize..63,
    ) {
        let split = split.min(data.len() - 1);
        let (a, b) = data.split_at(split);
        prop_assert_ne!(hash_to_scalar(&[a, b]), hash_to_scalar(&[data.as_slice()]));
        prop_assert_eq!(hash_to_scalar(&[a, b]), hash_to_scalar(&[a, b]));
    }
}
