//! Packet list columns.
//!
//! This module provides:
//! - [`ColumnSet`] - the per-packet column engine (fence, borrow, append, prepend)
//! - [`ColumnFormat`] - the column kinds and their `%`-style specifiers
//! - [`ColumnConfig`] - capacities and timestamp display preferences
//! - [`PacketInfo`] and [`ColumnSet::fill_in`] - frame, time, address and port columns
//! - [`AddressResolver`] - name lookups for resolved address and port columns
//!
//! ## Example
//!
//! ```rust
//! use dissect_core::column::{ColumnConfig, ColumnFormat, ColumnSet};
//!
//! let mut cols = ColumnSet::from_specs(&["%m", "%p", "%i"], ColumnConfig::default()).unwrap();
//! cols.init();
//!
//! cols.set_text(ColumnFormat::Protocol, "TCP");
//! cols.add_text(ColumnFormat::Info, "443 → 51000");
//! cols.set_fence(ColumnFormat::Info);
//! cols.append_text(ColumnFormat::Info, " [SYN]");
//! cols.clear(ColumnFormat::Info);
//!
//! assert_eq!(cols.text_of(ColumnFormat::Info), Some("443 → 51000"));
//! ```

mod config;
mod derived;
mod fixed;
mod format;
mod packet;
mod resolve;
mod set;

pub use config::{ColumnConfig, TimestampFormat, TimestampPrecision};
pub use fixed::FixedBuffer;
pub use format::{ColumnFormat, KindSet};
pub use packet::{AddressLayer, Circuit, CircuitType, PacketInfo, PacketTimes, PortType};
pub use resolve::{AddressResolver, HostTable, NumericResolver};
pub use set::{Column, ColumnSet, FilterExpr};
