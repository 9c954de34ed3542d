//! # dissect-core
//!
//! Building blocks for packet dissectors: a table-driven TLV options walker
//! and the per-packet column engine that accumulates the one-line summary
//! shown in a packet list.
//!
//! ## Features
//!
//! - **Options Walking**: decode IPv4, TCP or any other type-length-value
//!   options region from a static [`OptionTable`], with structured
//!   diagnostics for malformed options instead of errors
//! - **Source Routes**: locate the effective destination slot of loose and
//!   strict source route options
//! - **Column Engine**: fixed-capacity columns with zero-copy borrowed text,
//!   append/prepend writes and a fence that protects committed prefixes
//! - **Derived Columns**: frame number, timestamps, addresses and ports with
//!   matching display filter expressions
//!
//! ## Quick Start
//!
//! ```rust
//! use dissect_core::prelude::*;
//!
//! // TCP options from a SYN: MSS 1460, NOP, Window scale 7
//! let options: &[u8] = &[0x02, 0x04, 0x05, 0xb4, 0x01, 0x03, 0x03, 0x07];
//! let result = tcp_options().walk(options, 0, options.len());
//! assert!(result.is_complete());
//!
//! let mut cols = ColumnSet::from_specs(&["%p", "%i"], ColumnConfig::default()).unwrap();
//! cols.init();
//! cols.set_text(ColumnFormat::Protocol, "TCP");
//! for record in result.iter().filter(|r| r.decoded().is_some()) {
//!     cols.append_sep_fmt(ColumnFormat::Info, ", ", format_args!("{record}"));
//! }
//!
//! assert_eq!(
//!     cols.text_of(ColumnFormat::Info),
//!     Some("Maximum segment size: mss=1460, Window scale: shift=7, multiplier=128")
//! );
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |                          dissect-core                               |
//! +---------------------------------------------------------------------+
//! |  options/    - OptionTable, walk, find_trailing_offset, IP/TCP      |
//! |  column/     - ColumnSet, ColumnFormat, derived columns, resolvers  |
//! |  buffer/     - Bounds-checked big-endian packet reads               |
//! |  field/      - FieldValue for decoded option fields                 |
//! |  format/     - Address and timestamp formatting                     |
//! |  error/      - Error types                                          |
//! +---------------------------------------------------------------------+
//! ```

pub mod buffer;
pub mod column;
pub mod error;
pub mod field;
pub mod format;
pub mod options;
pub mod prelude;

// Re-export commonly used types at crate root for convenience
pub use buffer::PacketBuffer;
pub use column::{
    AddressResolver, ColumnConfig, ColumnFormat, ColumnSet, FilterExpr, HostTable,
    NumericResolver, PacketInfo, PacketTimes, PortType, TimestampFormat, TimestampPrecision,
};
pub use error::{BufferError, ConfigError, Error, Result};
pub use field::{FieldEntry, FieldValue};
pub use format::{format_mac, Address, Direction};
pub use options::{
    find_trailing_offset, ip_options, tcp_options, walk, Diagnostic, LengthPolicy,
    OptionDecoder, OptionDescriptor, OptionOutcome, OptionRecord, OptionTable, WalkEnd,
    WalkResult,
};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
