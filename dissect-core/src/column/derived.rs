//! Columns derived from packet metadata rather than written by dissectors.
//!
//! [`ColumnSet::fill_in`] renders frame number, lengths, timestamps,
//! addresses, ports and circuit ids, and records a filter expression for
//! each value it shows.

use compact_str::{format_compact, CompactString, ToCompactString};

use super::config::ColumnConfig;
use super::format::ColumnFormat;
use super::packet::{AddressLayer, PacketInfo};
use super::resolve::AddressResolver;
use super::set::{Column, ColumnSet, FilterExpr};
use crate::format::{self, Direction};

/// Whether an address or port column shows names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Resolution {
    /// Follows `ColumnConfig::resolve_names`
    Default,
    Resolved,
    Unresolved,
}

impl Resolution {
    fn wants_names(self, config: &ColumnConfig) -> bool {
        match self {
            Resolution::Default => config.resolve_names,
            Resolution::Resolved => true,
            Resolution::Unresolved => false,
        }
    }
}

fn address_kind(format: ColumnFormat) -> Option<(AddressLayer, Direction, Resolution)> {
    use AddressLayer::*;
    use ColumnFormat::*;
    use Direction::*;
    use Resolution::*;

    let kind = match format {
        DefSrc => (Any, Source, Default),
        ResSrc => (Any, Source, Resolved),
        UnresSrc => (Any, Source, Unresolved),
        DefDlSrc => (Link, Source, Default),
        ResDlSrc => (Link, Source, Resolved),
        UnresDlSrc => (Link, Source, Unresolved),
        DefNetSrc => (Network, Source, Default),
        ResNetSrc => (Network, Source, Resolved),
        UnresNetSrc => (Network, Source, Unresolved),
        DefDst => (Any, Destination, Default),
        ResDst => (Any, Destination, Resolved),
        UnresDst => (Any, Destination, Unresolved),
        DefDlDst => (Link, Destination, Default),
        ResDlDst => (Link, Destination, Resolved),
        UnresDlDst => (Link, Destination, Unresolved),
        DefNetDst => (Network, Destination, Default),
        ResNetDst => (Network, Destination, Resolved),
        UnresNetDst => (Network, Destination, Unresolved),
        _ => return None,
    };
    Some(kind)
}

fn port_kind(format: ColumnFormat) -> Option<(Direction, Resolution)> {
    let kind = match format {
        ColumnFormat::DefSrcPort => (Direction::Source, Resolution::Default),
        ColumnFormat::ResSrcPort => (Direction::Source, Resolution::Resolved),
        ColumnFormat::UnresSrcPort => (Direction::Source, Resolution::Unresolved),
        ColumnFormat::DefDstPort => (Direction::Destination, Resolution::Default),
        ColumnFormat::ResDstPort => (Direction::Destination, Resolution::Resolved),
        ColumnFormat::UnresDstPort => (Direction::Destination, Resolution::Unresolved),
        _ => return None,
    };
    Some(kind)
}

fn filter(field: &'static str, value: CompactString) -> Option<FilterExpr> {
    Some(FilterExpr { field, value })
}

impl<'a> ColumnSet<'a> {
    /// Populate every derived column from `packet`.
    ///
    /// Protocol, info and custom columns are left alone. Text is written
    /// after the fence like [`add_text`](ColumnSet::add_text); a kind the
    /// packet has no value for (no ports, no circuit) is not touched.
    pub fn fill_in(&mut self, packet: &PacketInfo, resolver: &dyn AddressResolver) {
        let (config, columns) = self.columns_mut();
        for column in columns {
            fill_column(column, config, packet, resolver);
        }
    }
}

fn fill_column(
    column: &mut Column<'_>,
    config: &ColumnConfig,
    packet: &PacketInfo,
    resolver: &dyn AddressResolver,
) {
    let mut format = column.format();
    if format == ColumnFormat::ClsTime {
        format = ColumnFormat::for_timestamp_format(config.timestamp_format);
    }

    if let Some((layer, direction, resolution)) = address_kind(format) {
        let address = packet.address(layer, direction);
        let numeric = address.to_compact();
        let text = if resolution.wants_names(config) {
            resolver.resolve_address(address).unwrap_or_else(|| numeric.clone())
        } else {
            numeric.clone()
        };
        column.write_owned(&text);
        column.set_filter(address.filter_field(direction).and_then(|f| filter(f, numeric)));
        return;
    }

    if let Some((direction, resolution)) = port_kind(format) {
        let Some(field) = packet.port_type.filter_field(direction) else {
            return;
        };
        let port = packet.port(direction);
        let numeric = port.to_compact_string();
        let text = if resolution.wants_names(config) {
            resolver
                .resolve_port(packet.port_type, port)
                .unwrap_or_else(|| numeric.clone())
        } else {
            numeric.clone()
        };
        column.write_owned(&text);
        column.set_filter(filter(field, numeric));
        return;
    }

    let precision = config.timestamp_precision;
    let times = &packet.times;
    let (text, expr) = match format {
        ColumnFormat::Number => {
            let n = packet.number.to_compact_string();
            (n.clone(), filter("frame.number", n))
        }
        ColumnFormat::PacketLength => {
            let n = packet.len.to_compact_string();
            (n.clone(), filter("frame.len", n))
        }
        ColumnFormat::CumulativeBytes => (packet.cumulative_bytes.to_compact_string(), None),
        ColumnFormat::AbsTime => (format::format_time_of_day(&times.absolute, precision), None),
        ColumnFormat::AbsDateTime => {
            let text = format::format_date_time(&times.absolute, precision);
            let quoted = format_compact!("\"{text}\"");
            (text, filter("frame.time", quoted))
        }
        ColumnFormat::RelTime => {
            let text = format::format_delta(&times.relative, precision);
            (text.clone(), filter("frame.time_relative", text))
        }
        ColumnFormat::DeltaTime => {
            let text = format::format_delta(&times.delta, precision);
            (text.clone(), filter("frame.time_delta", text))
        }
        ColumnFormat::DeltaTimeDisplayed => {
            let text = format::format_delta(&times.delta_displayed, precision);
            (text.clone(), filter("frame.time_delta_displayed", text))
        }
        ColumnFormat::EpochTime => {
            let text = format::format_epoch(&times.absolute, precision);
            (text.clone(), filter("frame.time_epoch", text))
        }
        ColumnFormat::CircuitId => {
            let Some(circuit) = packet.circuit else {
                return;
            };
            let id = circuit.id.to_compact_string();
            (id.clone(), filter(circuit.kind.filter_field(), id))
        }
        _ => return,
    };
    column.write_owned(&text);
    column.set_filter(expr);
}
