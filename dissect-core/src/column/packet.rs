//! Per-packet metadata consumed by the derived columns.

use chrono::{DateTime, TimeDelta, Utc};

use crate::format::{Address, Direction};

/// Transport whose ports populate the port columns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PortType {
    #[default]
    None,
    Tcp,
    Udp,
    Sctp,
}

impl PortType {
    pub fn filter_field(&self, direction: Direction) -> Option<&'static str> {
        let field = match (self, direction) {
            (PortType::None, _) => return None,
            (PortType::Tcp, Direction::Source) => "tcp.srcport",
            (PortType::Tcp, Direction::Destination) => "tcp.dstport",
            (PortType::Udp, Direction::Source) => "udp.srcport",
            (PortType::Udp, Direction::Destination) => "udp.dstport",
            (PortType::Sctp, Direction::Source) => "sctp.srcport",
            (PortType::Sctp, Direction::Destination) => "sctp.dstport",
        };
        Some(field)
    }
}

/// Kind of virtual circuit a frame was carried on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitType {
    FrameRelay,
    X25,
    Isdn,
}

impl CircuitType {
    pub fn filter_field(&self) -> &'static str {
        match self {
            CircuitType::FrameRelay => "fr.dlci",
            CircuitType::X25 => "x25.lcn",
            CircuitType::Isdn => "isdn.channel",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circuit {
    pub kind: CircuitType,
    pub id: u32,
}

/// Timestamps of one packet in every form a time column can show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PacketTimes {
    pub absolute: DateTime<Utc>,
    /// Since the first packet of the capture
    pub relative: TimeDelta,
    /// Since the previous captured packet
    pub delta: TimeDelta,
    /// Since the previous displayed packet
    pub delta_displayed: TimeDelta,
}

impl PacketTimes {
    /// Derive the relative and delta times from the reference timestamps.
    pub fn new(
        absolute: DateTime<Utc>,
        first: DateTime<Utc>,
        previous_captured: DateTime<Utc>,
        previous_displayed: DateTime<Utc>,
    ) -> Self {
        Self {
            absolute,
            relative: absolute - first,
            delta: absolute - previous_captured,
            delta_displayed: absolute - previous_displayed,
        }
    }
}

/// What the dissection of one packet established.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PacketInfo {
    /// 1-based frame number
    pub number: u32,
    /// Length on the wire
    pub len: u32,
    /// Captured length
    pub cap_len: u32,
    /// Wire bytes of all frames up to and including this one
    pub cumulative_bytes: u64,
    pub times: PacketTimes,
    pub dl_src: Address,
    pub dl_dst: Address,
    pub net_src: Address,
    pub net_dst: Address,
    /// Highest-layer source address (usually the network one)
    pub src: Address,
    pub dst: Address,
    pub port_type: PortType,
    pub src_port: u16,
    pub dst_port: u16,
    pub circuit: Option<Circuit>,
}

impl PacketInfo {
    pub fn new(number: u32) -> Self {
        Self {
            number,
            ..Self::default()
        }
    }

    pub fn with_lengths(mut self, len: u32, cap_len: u32) -> Self {
        self.len = len;
        self.cap_len = cap_len;
        self
    }

    pub fn with_cumulative_bytes(mut self, bytes: u64) -> Self {
        self.cumulative_bytes = bytes;
        self
    }

    pub fn with_times(mut self, times: PacketTimes) -> Self {
        self.times = times;
        self
    }

    pub fn with_link_addresses(mut self, src: Address, dst: Address) -> Self {
        self.dl_src = src;
        self.dl_dst = dst;
        if self.src.is_none() {
            self.src = src;
            self.dst = dst;
        }
        self
    }

    /// Network addresses also become the generic source and destination.
    pub fn with_net_addresses(mut self, src: Address, dst: Address) -> Self {
        self.net_src = src;
        self.net_dst = dst;
        self.src = src;
        self.dst = dst;
        self
    }

    pub fn with_ports(mut self, port_type: PortType, src: u16, dst: u16) -> Self {
        self.port_type = port_type;
        self.src_port = src;
        self.dst_port = dst;
        self
    }

    pub fn with_circuit(mut self, kind: CircuitType, id: u32) -> Self {
        self.circuit = Some(Circuit { kind, id });
        self
    }

    pub fn address(&self, layer: AddressLayer, direction: Direction) -> &Address {
        match (layer, direction) {
            (AddressLayer::Any, Direction::Source) => &self.src,
            (AddressLayer::Any, Direction::Destination) => &self.dst,
            (AddressLayer::Link, Direction::Source) => &self.dl_src,
            (AddressLayer::Link, Direction::Destination) => &self.dl_dst,
            (AddressLayer::Network, Direction::Source) => &self.net_src,
            (AddressLayer::Network, Direction::Destination) => &self.net_dst,
        }
    }

    pub fn port(&self, direction: Direction) -> u16 {
        match direction {
            Direction::Source => self.src_port,
            Direction::Destination => self.dst_port,
        }
    }
}

/// Which address of a packet a column shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressLayer {
    /// Highest layer that set an address
    Any,
    Link,
    Network,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::net::Ipv4Addr;

    #[test]
    fn test_packet_times() {
        let at = |secs, nanos| Utc.timestamp_opt(secs, nanos).single().unwrap();
        let times = PacketTimes::new(at(100, 500), at(90, 0), at(99, 0), at(95, 0));

        assert_eq!(times.relative, TimeDelta::seconds(10) + TimeDelta::nanoseconds(500));
        assert_eq!(times.delta.num_seconds(), 1);
        assert_eq!(times.delta_displayed.num_seconds(), 5);
    }

    #[test]
    fn test_link_addresses_fill_generic_when_unset() {
        let mac_a = Address::Ether([0, 1, 2, 3, 4, 5]);
        let mac_b = Address::Ether([0, 1, 2, 3, 4, 6]);
        let ip_a = Address::Ipv4(Ipv4Addr::new(10, 0, 0, 1));
        let ip_b = Address::Ipv4(Ipv4Addr::new(10, 0, 0, 2));

        let arp = PacketInfo::new(1).with_link_addresses(mac_a, mac_b);
        assert_eq!(arp.address(AddressLayer::Any, Direction::Source), &mac_a);

        let ip = PacketInfo::new(2)
            .with_link_addresses(mac_a, mac_b)
            .with_net_addresses(ip_a, ip_b);
        assert_eq!(ip.address(AddressLayer::Any, Direction::Destination), &ip_b);
        assert_eq!(ip.address(AddressLayer::Link, Direction::Destination), &mac_b);
    }

    #[test]
    fn test_port_filter_fields() {
        assert_eq!(PortType::Udp.filter_field(Direction::Destination), Some("udp.dstport"));
        assert_eq!(PortType::None.filter_field(Direction::Source), None);
        assert_eq!(CircuitType::FrameRelay.filter_field(), "fr.dlci");
    }
}
