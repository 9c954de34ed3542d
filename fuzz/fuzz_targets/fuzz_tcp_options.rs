//! Fuzz target for TCP options walking.
//!
//! Fuzz data is placed after a 20-byte TCP header and walked from the
//! header's data offset, the way a TCP dissector calls the walker.

#![no_main]

use dissect_core::tcp_options;
use libfuzzer_sys::fuzz_target;

const TCP_HEADER_LEN: usize = 20;

fuzz_target!(|data: &[u8]| {
    // TCP options can be 0-40 bytes
    if data.len() > 40 {
        return;
    }

    let mut segment = vec![0u8; TCP_HEADER_LEN];
    segment.extend_from_slice(data);

    let result = tcp_options().walk(&segment[..], TCP_HEADER_LEN, data.len());
    assert!(result.consumed <= data.len());
    assert!(result.iter().all(|r| r.offset >= TCP_HEADER_LEN));
    if !result.is_complete() {
        assert!(result.stop().is_some());
    }
});
