//! Fuzz target for agent reply decoding.
//!
//! Arbitrary text must decode or fail cleanly, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ml_service_core::decode::{decode_response, Decoded};

fuzz_target!(|data: &[u8]| {
    let Ok(json) = std::str::from_utf8(data) else {
        return;
    };
    match decode_response(json) {
        Ok(Decoded::List(list)) => assert!(!list.is_empty()),
        Ok(Decoded::Single(info)) => {
            for (key, value) in info.iter() {
                assert!(!key.is_empty() && !value.is_empty());
            }
        }
        Err(_) => {}
    }
});
