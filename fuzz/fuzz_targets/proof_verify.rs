#![no_main]

use libfuzzer_sys::fuzz_target;
use pythia_oprf::types::{G1_LEN, GT_LEN, SCALAR_LEN};
use pythia_oprf::{verify, BlindedMessage, PrfOutput, Proof};

const FIXED: usize = G1_LEN + GT_LEN + G1_LEN + 2 * SCALAR_LEN;

fuzz_target!(|data: &[u8]| {
    // Layout: x || y || P || c || u || tweak
    if data.len() < FIXED {
        return;
    }
    let (x, rest) = data.split_at(G1_LEN);
    let (y, rest) = rest.split_at(GT_LEN);
    let (p, rest) = rest.split_at(G1_LEN);
    let (c, rest) = rest.split_at(SCALAR_LEN);
    let (u, tweak) = rest.split_at(SCALAR_LEN);

    let (Ok(x), Ok(y), Ok(proof)) = (
        BlindedMessage::try_from(x),
        PrfOutput::try_from(y),
        Proof::from_parts(p, c, u),
    ) else {
        return;
    };
    let _ = verify(&x, tweak, &y, &proof);
});
