//! Fuzz target for IPv4 options walking.
//!
//! The first byte selects the declared region length so the walker also
//! sees regions longer than the captured bytes. The rest is the options.

#![no_main]

use dissect_core::ip_options;
use libfuzzer_sys::fuzz_target;

// IHL 15 leaves at most 40 option bytes
const MAX_OPTIONS: usize = 40;

fuzz_target!(|data: &[u8]| {
    let Some((&declared, options)) = data.split_first() else {
        return;
    };
    let region_len = usize::from(declared) % (MAX_OPTIONS + 1);

    let result = ip_options().walk(options, 0, region_len);
    assert!(result.consumed <= region_len);
    assert!(result
        .records
        .windows(2)
        .all(|pair| pair[0].offset < pair[1].offset));
    for record in result.iter() {
        let _ = record.to_string();
    }

    if let Some(slot) = ip_options().find_trailing_offset(options, 0, region_len) {
        assert!(slot + 4 <= region_len);
    }
});
