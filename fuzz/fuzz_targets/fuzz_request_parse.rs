#![no_main]

use libfuzzer_sys::fuzz_target;

use birthright_rpc::handlers::{AllocationRequest, VerifyRequest};
use birthright_types::Birthdate;

// Fuzz API request parsing with arbitrary bytes.
// Parsing may fail, but must never panic.
fuzz_target!(|data: &[u8]| {
    if let Ok(request) = serde_json::from_slice::<VerifyRequest>(data) {
        let missing = request.proof.missing_fields();
        assert_eq!(missing.is_empty(), request.proof.is_complete());
    }

    let _ = serde_json::from_slice::<AllocationRequest>(data);

    if let Ok(s) = std::str::from_utf8(data) {
        if let Ok(birthdate) = s.parse::<Birthdate>() {
            // Display and parse agree on anything that parsed.
            assert_eq!(birthdate.to_string().parse::<Birthdate>().ok(), Some(birthdate));
        }
    }
});
