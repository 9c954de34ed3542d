//! Name resolution for address and port columns.

use std::collections::HashMap;
use std::net::IpAddr;

use compact_str::CompactString;

use super::packet::PortType;
use crate::format::Address;

/// Best-effort mapping from addresses and ports to names.
///
/// Returning `None` makes the column fall back to the numeric form.
pub trait AddressResolver {
    fn resolve_address(&self, address: &Address) -> Option<CompactString>;

    fn resolve_port(&self, port_type: PortType, port: u16) -> Option<CompactString>;
}

/// Resolver that never resolves anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NumericResolver;

impl AddressResolver for NumericResolver {
    fn resolve_address(&self, _address: &Address) -> Option<CompactString> {
        None
    }

    fn resolve_port(&self, _port_type: PortType, _port: u16) -> Option<CompactString> {
        None
    }
}

/// Static host, ethers and services tables.
#[derive(Debug, Clone, Default)]
pub struct HostTable {
    hosts: HashMap<IpAddr, CompactString>,
    ethers: HashMap<[u8; 6], CompactString>,
    services: HashMap<(PortType, u16), CompactString>,
}

impl HostTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_host(mut self, addr: impl Into<IpAddr>, name: &str) -> Self {
        self.hosts.insert(addr.into(), CompactString::from(name));
        self
    }

    pub fn with_ether(mut self, mac: [u8; 6], name: &str) -> Self {
        self.ethers.insert(mac, CompactString::from(name));
        self
    }

    pub fn with_service(mut self, port_type: PortType, port: u16, name: &str) -> Self {
        self.services.insert((port_type, port), CompactString::from(name));
        self
    }

    pub fn len(&self) -> usize {
        self.hosts.len() + self.ethers.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AddressResolver for HostTable {
    fn resolve_address(&self, address: &Address) -> Option<CompactString> {
        match address {
            Address::None => None,
            Address::Ether(mac) => self.ethers.get(mac).cloned(),
            Address::Ipv4(v4) => self.hosts.get(&IpAddr::V4(*v4)).cloned(),
            Address::Ipv6(v6) => self.hosts.get(&IpAddr::V6(*v6)).cloned(),
        }
    }

    fn resolve_port(&self, port_type: PortType, port: u16) -> Option<CompactString> {
        self.services.get(&(port_type, port)).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::Ipv4Addr;

    #[test]
    fn test_numeric_resolver() {
        let resolver = NumericResolver;
        assert!(resolver
            .resolve_address(&Address::Ipv4(Ipv4Addr::LOCALHOST))
            .is_none());
        assert!(resolver.resolve_port(PortType::Tcp, 80).is_none());
    }

    #[test]
    fn test_host_table() {
        let table = HostTable::new()
            .with_host(Ipv4Addr::new(10, 0, 0, 1), "gateway")
            .with_ether([0x00, 0x11, 0x22, 0x33, 0x44, 0x55], "Router_33:44:55")
            .with_service(PortType::Tcp, 443, "https");

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.resolve_address(&Address::Ipv4(Ipv4Addr::new(10, 0, 0, 1))),
            Some(CompactString::from("gateway"))
        );
        assert_eq!(
            table.resolve_address(&Address::Ether([0x00, 0x11, 0x22, 0x33, 0x44, 0x55])),
            Some(CompactString::from("Router_33:44:55"))
        );
        assert_eq!(table.resolve_port(PortType::Tcp, 443).as_deref(), Some("https"));
        // Services are keyed by transport
        assert_eq!(table.resolve_port(PortType::Udp, 443), None);
    }
}
