#![no_main]

use libfuzzer_sys::fuzz_target;
use pythia_oprf::{decode_message, EvalRequest, EvalResponse, RotationResponse};

fuzz_target!(|data: &[u8]| {
    // Every accessor must fail cleanly on whatever the JSON layer lets through
    if let Ok(req) = decode_message::<EvalRequest>("eval_request", data) {
        let _ = req.blinded_message();
    }
    if let Ok(resp) = decode_message::<EvalResponse>("eval_response", data) {
        let _ = resp.result();
        let _ = resp.proof();
    }
    if let Ok(rot) = decode_message::<RotationResponse>("rotation_response", data) {
        let _ = rot.delta();
        let _ = rot.new_commitment();
    }
});
