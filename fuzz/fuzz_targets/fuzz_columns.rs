//! Fuzz target for column operations.
//!
//! Each input byte pair is decoded into one column call, so arbitrary
//! sequences of set, append, prepend, fence and clear are exercised
//! against small capacities.

#![no_main]

use dissect_core::{ColumnConfig, ColumnFormat, ColumnSet};
use libfuzzer_sys::fuzz_target;

const TEXTS: [&str; 6] = ["", "TCP", "Echo request", "→", "[TCP segment of a PDU]", "ü€𝄞"];

fuzz_target!(|data: &[u8]| {
    let config = ColumnConfig::default().with_max_len(16).with_max_info_len(24);
    let Ok(mut cols) = ColumnSet::setup(&[ColumnFormat::Protocol, ColumnFormat::Info], config)
    else {
        return;
    };
    cols.init();

    for op in data.chunks_exact(2) {
        let kind = if op[0] & 0x80 == 0 {
            ColumnFormat::Protocol
        } else {
            ColumnFormat::Info
        };
        let text = TEXTS[usize::from(op[1]) % TEXTS.len()];

        match op[0] & 0x0f {
            0 => cols.set_text(kind, text),
            1 => cols.add_text(kind, text),
            2 => cols.append_text(kind, text),
            3 => cols.append_sep_text(kind, ", ", text),
            4 => cols.prepend_text(kind, text),
            5 => cols.prepend_fence_fmt(kind, format_args!("{text} ")),
            6 => cols.set_fence(kind),
            7 => cols.clear(kind),
            8 => cols.init(),
            9 => cols.set_writable(op[1] & 1 == 0),
            _ => cols.append_fmt(kind, format_args!("{}", op[1])),
        }

        for column in cols.iter() {
            if !column.is_borrowed() {
                assert!(column.text().len() <= column.capacity());
            }
            assert!(column.fence() <= column.capacity());
        }
    }
});
