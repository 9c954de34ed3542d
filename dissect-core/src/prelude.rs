//! Convenient re-exports for common usage.
//!
//! # Example
//!
//! ```rust
//! use dissect_core::prelude::*;
//!
//! let table = ip_options();
//! let cols = ColumnSet::setup(&[ColumnFormat::Info], ColumnConfig::default()).unwrap();
//! assert!(table.get(7).is_some());
//! assert_eq!(cols.len(), 1);
//! ```

// Options walking
pub use crate::options::{
    find_trailing_offset, ip_options, tcp_options, walk, DecodedOption, Diagnostic, LengthPolicy,
    OptionDecoder, OptionDescriptor, OptionOutcome, OptionRecord, OptionTable, WalkEnd,
    WalkResult,
};

// Columns
pub use crate::column::{
    AddressResolver, ColumnConfig, ColumnFormat, ColumnSet, NumericResolver, PacketInfo,
    PortType, TimestampFormat,
};

// Values
pub use crate::buffer::PacketBuffer;
pub use crate::field::FieldValue;
pub use crate::format::Address;

// Error types
pub use crate::error::{Error, Result};
