//! Network address formatting.
//!
//! Provides the [`Address`] value carried by packet metadata and the
//! human-readable forms shown in address columns.

use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};

use compact_str::{format_compact, CompactString};

/// Which end of a conversation an address or port belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Source,
    Destination,
}

/// A link-layer or network-layer address.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Address {
    /// No address known for this layer
    #[default]
    None,
    /// 48-bit MAC address
    Ether([u8; 6]),
    Ipv4(Ipv4Addr),
    Ipv6(Ipv6Addr),
}

impl Address {
    /// Build an Ethernet address from exactly six bytes.
    pub fn ether(bytes: &[u8]) -> Option<Self> {
        let octets: [u8; 6] = bytes.try_into().ok()?;
        Some(Address::Ether(octets))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Address::None)
    }

    /// Display filter field matching this address type, e.g. `ip.src`.
    pub fn filter_field(&self, direction: Direction) -> Option<&'static str> {
        let field = match (self, direction) {
            (Address::None, _) => return None,
            (Address::Ether(_), Direction::Source) => "eth.src",
            (Address::Ether(_), Direction::Destination) => "eth.dst",
            (Address::Ipv4(_), Direction::Source) => "ip.src",
            (Address::Ipv4(_), Direction::Destination) => "ip.dst",
            (Address::Ipv6(_), Direction::Source) => "ipv6.src",
            (Address::Ipv6(_), Direction::Destination) => "ipv6.dst",
        };
        Some(field)
    }

    /// Numeric form, e.g. `192.168.1.1` or `aa:bb:cc:dd:ee:ff`.
    pub fn to_compact(&self) -> CompactString {
        format_compact!("{self}")
    }
}

impl From<IpAddr> for Address {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(v4) => Address::Ipv4(v4),
            IpAddr::V6(v6) => Address::Ipv6(v6),
        }
    }
}

impl From<Ipv4Addr> for Address {
    fn from(addr: Ipv4Addr) -> Self {
        Address::Ipv4(addr)
    }
}

impl From<Ipv6Addr> for Address {
    fn from(addr: Ipv6Addr) -> Self {
        Address::Ipv6(addr)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Address::None => Ok(()),
            Address::Ether(mac) => f.write_str(&format_mac(mac)),
            Address::Ipv4(addr) => write!(f, "{addr}"),
            Address::Ipv6(addr) => write!(f, "{addr}"),
        }
    }
}

/// Format a MAC address in colon-separated lowercase hex.
///
/// # Example
///
/// ```
/// use dissect_core::format::format_mac;
///
/// assert_eq!(format_mac(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]), "aa:bb:cc:dd:ee:ff");
/// ```
pub fn format_mac(mac: &[u8; 6]) -> CompactString {
    format_compact!(
        "{:02x}:{:02x}:{:02x}:{:02x}:{:02x}:{:02x}",
        mac[0],
        mac[1],
        mac[2],
        mac[3],
        mac[4],
        mac[5]
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_forms() {
        assert_eq!(Address::Ipv4(Ipv4Addr::new(192, 168, 1, 1)).to_string(), "192.168.1.1");
        assert_eq!(
            Address::Ipv6("2001:db8::1".parse().unwrap()).to_compact(),
            "2001:db8::1"
        );
        assert_eq!(
            Address::ether(&[0x00, 0x11, 0x22, 0x33, 0x44, 0x55]).unwrap().to_string(),
            "00:11:22:33:44:55"
        );
        assert_eq!(Address::None.to_string(), "");
    }

    #[test]
    fn test_ether_needs_six_bytes() {
        assert!(Address::ether(&[1, 2, 3]).is_none());
        assert!(Address::ether(&[0; 7]).is_none());
    }

    #[test]
    fn test_filter_fields() {
        let v4 = Address::from(Ipv4Addr::LOCALHOST);
        assert_eq!(v4.filter_field(Direction::Source), Some("ip.src"));
        assert_eq!(v4.filter_field(Direction::Destination), Some("ip.dst"));

        let v6 = Address::from(Ipv6Addr::LOCALHOST);
        assert_eq!(v6.filter_field(Direction::Destination), Some("ipv6.dst"));

        let mac = Address::Ether([0; 6]);
        assert_eq!(mac.filter_field(Direction::Source), Some("eth.src"));

        assert_eq!(Address::None.filter_field(Direction::Source), None);
    }
}
