//! Fuzz target for agent frame decoding.
//!
//! Arbitrary bytes parsed as a reply frame must return Ok or Err.

#![no_main]

use libfuzzer_sys::fuzz_target;
use ml_service_core::agent::protocol::{decode_body, ReplyFrame, RequestFrame, DEFAULT_MAX_FRAME_SIZE};

fuzz_target!(|data: &[u8]| {
    let _ = decode_body::<ReplyFrame>(data, DEFAULT_MAX_FRAME_SIZE);
    let _ = decode_body::<RequestFrame>(data, DEFAULT_MAX_FRAME_SIZE);
});
