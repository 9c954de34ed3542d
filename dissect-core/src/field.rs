//! Decoded option field values.
//!
//! Option decoders produce a small list of named fields per option. Values
//! borrow from the packet buffer when the option carries raw data verbatim
//! (`Bytes`) and own their data only when something has to be constructed.

use std::net::{IpAddr, Ipv4Addr};

use compact_str::CompactString;
use smallvec::SmallVec;

/// A named field produced by an option decoder: (field_name, value).
pub type FieldEntry<'data> = (&'static str, FieldValue<'data>);

/// Fields of a single decoded option. Most options carry 1-3 fields.
pub type OptionFields<'data> = SmallVec<[FieldEntry<'data>; 4]>;

/// Value of one decoded option field.
///
/// The lifetime `'data` ties borrowed variants to the packet buffer the
/// option was read from.
#[derive(Debug, Clone)]
pub enum FieldValue<'data> {
    /// Unsigned 8-bit integer (pointers, shift counts, flags)
    UInt8(u8),
    /// Unsigned 16-bit integer (MSS, stream id, router alert value)
    UInt16(u16),
    /// Unsigned 32-bit integer (timestamps, sequence edges)
    UInt32(u32),
    /// Boolean flag
    Bool(bool),
    /// IP address embedded in an option
    IpAddr(IpAddr),
    /// Zero-copy option payload bytes
    Bytes(&'data [u8]),
    /// Constructed text (names, joined summaries)
    OwnedString(CompactString),
    /// Repeated values (route addresses, SACK edges, timestamp entries)
    List(Vec<FieldValue<'data>>),
    /// Value not present
    Null,
}

impl<'data> FieldValue<'data> {
    /// Build an IPv4 address value from the first four bytes of `bytes`.
    pub fn ipv4(bytes: &[u8]) -> Self {
        match bytes {
            [a, b, c, d, ..] => FieldValue::IpAddr(IpAddr::V4(Ipv4Addr::new(*a, *b, *c, *d))),
            _ => FieldValue::Null,
        }
    }

    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Widen any unsigned integer variant to u64.
    pub fn as_u64(&self) -> Option<u64> {
        match self {
            FieldValue::UInt8(v) => Some(u64::from(*v)),
            FieldValue::UInt16(v) => Some(u64::from(*v)),
            FieldValue::UInt32(v) => Some(u64::from(*v)),
            _ => None,
        }
    }

    pub fn as_ip(&self) -> Option<IpAddr> {
        match self {
            FieldValue::IpAddr(addr) => Some(*addr),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&'data [u8]> {
        match self {
            FieldValue::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::OwnedString(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FieldValue<'data>]> {
        match self {
            FieldValue::List(items) => Some(items.as_slice()),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::UInt8(v) => write!(f, "{v}"),
            FieldValue::UInt16(v) => write!(f, "{v}"),
            FieldValue::UInt32(v) => write!(f, "{v}"),
            FieldValue::Bool(v) => write!(f, "{v}"),
            FieldValue::IpAddr(addr) => write!(f, "{addr}"),
            FieldValue::Bytes(b) => {
                for (i, byte) in b.iter().enumerate() {
                    if i > 0 {
                        f.write_str(":")?;
                    }
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
            FieldValue::OwnedString(s) => f.write_str(s),
            FieldValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str("]")
            }
            FieldValue::Null => f.write_str("NULL"),
        }
    }
}

// Borrowed and owned values compare by content regardless of lifetime.
impl<'a, 'b> PartialEq<FieldValue<'b>> for FieldValue<'a> {
    fn eq(&self, other: &FieldValue<'b>) -> bool {
        match (self, other) {
            (FieldValue::UInt8(a), FieldValue::UInt8(b)) => a == b,
            (FieldValue::UInt16(a), FieldValue::UInt16(b)) => a == b,
            (FieldValue::UInt32(a), FieldValue::UInt32(b)) => a == b,
            (FieldValue::Bool(a), FieldValue::Bool(b)) => a == b,
            (FieldValue::IpAddr(a), FieldValue::IpAddr(b)) => a == b,
            (FieldValue::Bytes(a), FieldValue::Bytes(b)) => a == b,
            (FieldValue::OwnedString(a), FieldValue::OwnedString(b)) => a == b,
            (FieldValue::List(a), FieldValue::List(b)) => {
                a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| x == y)
            }
            (FieldValue::Null, FieldValue::Null) => true,
            _ => false,
        }
    }
}
