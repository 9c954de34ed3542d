//! Display formatting for column values.
//!
//! - [`address`] - link and network addresses, filter field names
//! - [`time`] - absolute, relative, delta and epoch timestamps

pub mod address;
pub mod time;

pub use address::{format_mac, Address, Direction};
pub use time::{format_date_time, format_delta, format_epoch, format_time_of_day};
