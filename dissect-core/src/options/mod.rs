//! Generic TLV options walking.
//!
//! This module provides:
//! - [`OptionTable`] / [`OptionDescriptor`] for describing an options region
//! - [`walk`] to decode a region into [`OptionRecord`]s with diagnostics
//! - [`find_trailing_offset`] to locate a source route's effective destination
//! - Built-in tables for IPv4 ([`ip_options`]) and TCP ([`tcp_options`])
//!
//! ## Example
//!
//! ```rust
//! use dissect_core::options::{ip_options, WalkEnd};
//!
//! let options: &[u8] = &[
//!     0x07, 0x0b, 0x04,        // Record Route, len 11, pointer 4
//!     192, 168, 0, 1,          // slot 1
//!     192, 168, 0, 2,          // slot 2
//!     0x00,                    // EOL
//! ];
//!
//! let result = ip_options().walk(options, 0, options.len());
//! assert_eq!(result.end, WalkEnd::EndOfList);
//! assert_eq!(result.consumed, 12);
//! for record in result.iter() {
//!     println!("{record}");
//! }
//! ```

mod decoders;
mod descriptor;
pub mod ip;
mod route;
pub mod tcp;
mod walker;

#[cfg(test)]
pub mod test_utils;

use once_cell::sync::Lazy;

pub use decoders::{RawPayload, SackBlocks, U32Pair, UnsignedValue, Width};
pub use descriptor::{DecodedOption, LengthPolicy, OptionDecoder, OptionDescriptor, OptionTable};
pub use ip::IpTimestampDecoder;
pub use route::{RouteDecoder, FIRST_SLOT_POINTER, SLOT_SIZE};
pub use walker::{
    find_trailing_offset, walk, Diagnostic, OptionOutcome, OptionRecord, WalkEnd, WalkResult,
};

static IP_OPTIONS: Lazy<OptionTable> = Lazy::new(ip::table);
static TCP_OPTIONS: Lazy<OptionTable> = Lazy::new(tcp::table);

/// The shared IPv4 options table.
pub fn ip_options() -> &'static OptionTable {
    &IP_OPTIONS
}

/// The shared TCP options table.
pub fn tcp_options() -> &'static OptionTable {
    &TCP_OPTIONS
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tables_are_shareable() {
        fn assert_sync<T: Send + Sync>(_: &T) {}
        assert_sync(ip_options());
        assert_sync(tcp_options());
    }

    #[test]
    fn test_builtin_tables() {
        assert_eq!(ip_options().end_code(), Some(0));
        assert_eq!(ip_options().nop_code(), Some(1));
        assert!(ip_options().get(ip::code::LOOSE_ROUTE).unwrap().is_source_route());
        assert!(!ip_options().get(ip::code::RECORD_ROUTE).unwrap().is_source_route());

        assert_eq!(
            tcp_options().get(tcp::code::MSS).map(|d| d.policy()),
            Some(LengthPolicy::Fixed(4))
        );
        assert_eq!(tcp_options().len(), 14);
    }

    #[test]
    fn test_threads_share_one_table() {
        let data: Vec<u8> = vec![0x02, 0x04, 0x05, 0xb4];
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let data = data.clone();
                std::thread::spawn(move || {
                    let consumed = tcp_options().walk(&data[..], 0, data.len()).consumed;
                    consumed
                })
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), 4);
        }
    }
}
