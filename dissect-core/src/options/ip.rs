//! IPv4 header options (RFC 791, RFC 1108, RFC 2113, RFC 4782).

use compact_str::format_compact;

use super::decoders::UnsignedValue;
use super::route::RouteDecoder;
use super::{DecodedOption, Diagnostic, OptionDecoder, OptionDescriptor, OptionTable};
use crate::buffer::PacketBuffer;
use crate::field::FieldValue;

/// IPv4 option codes (copy flag, class and number combined).
pub mod code {
    pub const EOL: u8 = 0;
    pub const NOP: u8 = 1;
    pub const RECORD_ROUTE: u8 = 7;
    pub const QUICK_START: u8 = 25;
    pub const TIMESTAMP: u8 = 68;
    pub const SECURITY: u8 = 130;
    pub const LOOSE_ROUTE: u8 = 131;
    pub const STREAM_ID: u8 = 136;
    pub const STRICT_ROUTE: u8 = 137;
    pub const ROUTER_ALERT: u8 = 148;
}

/// Build the IPv4 options table.
pub fn table() -> OptionTable {
    OptionTable::new(vec![
        OptionDescriptor::no_length(code::EOL, "End of Options List (EOL)"),
        OptionDescriptor::no_length(code::NOP, "No Operation (NOP)"),
        OptionDescriptor::fixed(code::SECURITY, "Security", 11).with_decoder(security),
        OptionDescriptor::variable(code::LOOSE_ROUTE, "Loose Source Route", 3)
            .with_decoder(RouteDecoder)
            .source_route(),
        OptionDescriptor::variable(code::TIMESTAMP, "Time Stamp", 4)
            .with_decoder(IpTimestampDecoder),
        OptionDescriptor::variable(code::RECORD_ROUTE, "Record Route", 3)
            .with_decoder(RouteDecoder),
        OptionDescriptor::fixed(code::STREAM_ID, "Stream Identifier", 4)
            .with_decoder(UnsignedValue::u16("stream_id")),
        OptionDescriptor::variable(code::STRICT_ROUTE, "Strict Source Route", 3)
            .with_decoder(RouteDecoder)
            .source_route(),
        OptionDescriptor::fixed(code::ROUTER_ALERT, "Router Alert", 4)
            .with_decoder(UnsignedValue::u16("value")),
        OptionDescriptor::fixed(code::QUICK_START, "Quick-Start", 8).with_decoder(quick_start),
    ])
    .with_end_code(code::EOL)
    .with_nop_code(code::NOP)
}

/// Timestamp option flag values.
mod flag {
    pub const TIMESTAMPS_ONLY: u8 = 0;
    pub const ADDRESS_AND_TIMESTAMP: u8 = 1;
    pub const PRESPECIFIED: u8 = 3;
}

/// Pointer value of the first timestamp entry.
const FIRST_ENTRY_POINTER: u8 = 5;

/// Decoder for the Internet Timestamp option.
///
/// Layout: code, length, pointer, overflow (4 bits) | flag (4 bits), then
/// entries of 4 bytes (timestamps only) or 8 bytes (address + timestamp).
#[derive(Debug, Clone, Copy, Default)]
pub struct IpTimestampDecoder;

impl OptionDecoder for IpTimestampDecoder {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        let pointer = buf.u8_at(offset + 2)?;
        let overflow_flag = buf.u8_at(offset + 3)?;
        let overflow = overflow_flag >> 4;
        let flag = overflow_flag & 0x0f;

        let entry_len = match flag {
            flag::TIMESTAMPS_ONLY => 4,
            flag::ADDRESS_AND_TIMESTAMP | flag::PRESPECIFIED => 8,
            other => {
                return Err(Diagnostic::InvalidPayload {
                    reason: format_compact!("unknown timestamp flag {other}"),
                })
            }
        };
        if pointer < FIRST_ENTRY_POINTER || usize::from(pointer - FIRST_ENTRY_POINTER) % entry_len != 0
        {
            return Err(Diagnostic::PointerOutOfRange {
                pointer,
                len: len as u8,
            });
        }

        let entries = buf.bytes_at(offset + 4, len.saturating_sub(4))?;
        if entries.len() % entry_len != 0 {
            return Err(Diagnostic::InvalidPayload {
                reason: format_compact!(
                    "timestamp data length {} is not a multiple of {entry_len}",
                    entries.len()
                ),
            });
        }

        let mut decoded = DecodedOption::new()
            .with_field("pointer", FieldValue::UInt8(pointer))
            .with_field("overflow", FieldValue::UInt8(overflow))
            .with_field("flag", FieldValue::UInt8(flag));

        let timestamp_at = |entry: &[u8], at: usize| {
            FieldValue::UInt32(u32::from_be_bytes([
                entry[at],
                entry[at + 1],
                entry[at + 2],
                entry[at + 3],
            ]))
        };

        if entry_len == 4 {
            let timestamps = entries
                .chunks_exact(4)
                .map(|entry| timestamp_at(entry, 0))
                .collect();
            decoded.push("timestamps", FieldValue::List(timestamps));
        } else {
            let (addresses, timestamps) = entries
                .chunks_exact(8)
                .map(|entry| (FieldValue::ipv4(&entry[..4]), timestamp_at(entry, 4)))
                .unzip();
            decoded.push("addresses", FieldValue::List(addresses));
            decoded.push("timestamps", FieldValue::List(timestamps));
        }
        Ok(decoded)
    }
}

/// Basic Security Option (RFC 1108): classification level and protection
/// authority flags.
fn security<'a>(
    buf: &PacketBuffer<'a>,
    offset: usize,
    len: usize,
) -> Result<DecodedOption<'a>, Diagnostic> {
    Ok(DecodedOption::new()
        .with_field("level", FieldValue::UInt16(buf.u16_at(offset + 2)?))
        .with_field("compartments", FieldValue::UInt16(buf.u16_at(offset + 4)?))
        .with_field("handling", FieldValue::UInt16(buf.u16_at(offset + 6)?))
        .with_field(
            "tcc",
            FieldValue::Bytes(buf.bytes_at(offset + 8, len.saturating_sub(8))?),
        ))
}

/// Quick-Start request / report (RFC 4782).
fn quick_start<'a>(
    buf: &PacketBuffer<'a>,
    offset: usize,
    _len: usize,
) -> Result<DecodedOption<'a>, Diagnostic> {
    let func_rate = buf.u8_at(offset + 2)?;
    let ttl = buf.u8_at(offset + 3)?;
    let nonce = buf.u32_at(offset + 4)? >> 2;

    Ok(DecodedOption::new()
        .with_field("function", FieldValue::UInt8(func_rate >> 4))
        .with_field("rate", FieldValue::UInt8(func_rate & 0x0f))
        .with_field("ttl", FieldValue::UInt8(ttl))
        .with_field("nonce", FieldValue::UInt32(nonce)))
}

#[cfg(test)]
mod tests {
    use std::net::{IpAddr, Ipv4Addr};

    use super::*;
    use crate::options::test_utils::{OptionsBuilder, RouteBuilder};
    use crate::options::{ip_options, OptionOutcome, WalkEnd};

    fn ip(a: u8, b: u8, c: u8, d: u8) -> FieldValue<'static> {
        FieldValue::IpAddr(IpAddr::V4(Ipv4Addr::new(a, b, c, d)))
    }

    // ========== table walks ==========

    #[test]
    fn test_record_route_then_eol() {
        let data = [
            0x07, 0x0b, 0x04, // Record Route, len 11, ptr 4
            0xc0, 0xa8, 0x00, 0x01, // 192.168.0.1
            0xc0, 0xa8, 0x00, 0x02, // 192.168.0.2
            0x00, // EOL
        ];

        let result = ip_options().walk(&data[..], 0, data.len());

        assert_eq!(result.end, WalkEnd::EndOfList);
        assert_eq!(result.consumed, 12);
        assert_eq!(result.records.len(), 2);

        let rr = &result.records[0];
        assert_eq!((rr.offset, rr.length), (0, 11));
        assert_eq!(rr.name, "Record Route");
        assert_eq!(
            rr.decoded().unwrap().get("addresses"),
            Some(&FieldValue::List(vec![ip(192, 168, 0, 1), ip(192, 168, 0, 2)]))
        );

        let eol = &result.records[1];
        assert_eq!(eol.offset, 11);
        assert_eq!(eol.code, code::EOL);
    }

    #[test]
    fn test_padding_after_eol_is_ignored() {
        let data = OptionsBuilder::new()
            .option(code::ROUTER_ALERT, &[0x00, 0x00])
            .eol()
            .raw(&[0xff, 0xff, 0xff])
            .build();

        let result = ip_options().walk(&data[..], 0, data.len());

        assert_eq!(result.end, WalkEnd::EndOfList);
        assert_eq!(result.consumed, 5);
        assert_eq!(
            result.records[0].decoded().unwrap().get("value"),
            Some(&FieldValue::UInt16(0))
        );
    }

    #[test]
    fn test_security_wrong_length() {
        let data = OptionsBuilder::new()
            .option(code::SECURITY, &[0; 7])
            .pad_to_word()
            .build();

        let result = ip_options().walk(&data[..], 0, data.len());

        assert_eq!(
            result.stop(),
            Some(&Diagnostic::WrongFixedLength { len: 9, expected: 11 })
        );
        assert_eq!(result.consumed, 2);
    }

    #[test]
    fn test_security_decodes() {
        let data = [
            0x82, 0x0b, // Security, len 11
            0xab, 0xcd, // level
            0x00, 0x01, // compartments
            0x00, 0x02, // handling restrictions
            0x0a, 0x0b, 0x0c, // TCC
            0x00, // EOL
        ];

        let result = ip_options().walk(&data[..], 0, data.len());
        let decoded = result.find(code::SECURITY).and_then(|r| r.decoded()).unwrap();

        assert_eq!(decoded.get("level"), Some(&FieldValue::UInt16(0xabcd)));
        assert_eq!(decoded.get("tcc"), Some(&FieldValue::Bytes(&[0x0a, 0x0b, 0x0c])));
    }

    #[test]
    fn test_quick_start() {
        let data = [
            0x19, 0x08, // Quick-Start, len 8
            0x03, // function 0, rate 3
            0x40, // TTL diff
            0x00, 0x00, 0x00, 0x2c, // nonce 11, reserved
        ];

        let result = ip_options().walk(&data[..], 0, data.len());
        let decoded = result.records[0].decoded().unwrap();

        assert_eq!(decoded.get("rate"), Some(&FieldValue::UInt8(3)));
        assert_eq!(decoded.get("ttl"), Some(&FieldValue::UInt8(0x40)));
        assert_eq!(decoded.get("nonce"), Some(&FieldValue::UInt32(11)));
    }

    #[test]
    fn test_bad_route_pointer_keeps_walking() {
        let route = RouteBuilder::new().pointer(2).address([10, 0, 0, 1]);
        let data = OptionsBuilder::new()
            .option(code::RECORD_ROUTE, &route.payload())
            .eol()
            .build();

        let result = ip_options().walk(&data[..], 0, data.len());

        assert_eq!(
            result.records[0].outcome,
            OptionOutcome::Malformed(Diagnostic::PointerOutOfRange { pointer: 2, len: 7 })
        );
        assert_eq!(result.end, WalkEnd::EndOfList);
        assert_eq!(result.consumed, 8);
    }

    // ========== timestamp ==========

    #[test]
    fn test_timestamps_only() {
        let data = [
            0x44, 0x0c, 0x0d, 0x00, // TS, len 12, ptr 13, flag 0
            0x00, 0x00, 0x00, 0x01, // ts 1
            0x00, 0x00, 0x00, 0x02, // ts 2
        ];
        let buf = PacketBuffer::new(&data);

        let decoded = IpTimestampDecoder.decode(&buf, 0, 12).unwrap();

        assert_eq!(decoded.get("flag"), Some(&FieldValue::UInt8(0)));
        assert_eq!(
            decoded.get("timestamps"),
            Some(&FieldValue::List(vec![FieldValue::UInt32(1), FieldValue::UInt32(2)]))
        );
        assert!(decoded.get("addresses").is_none());
    }

    #[test]
    fn test_address_and_timestamp() {
        let data = [
            0x44, 0x0c, 0x05, 0x21, // TS, len 12, ptr 5, overflow 2, flag 1
            10, 0, 0, 1, // address
            0x00, 0x00, 0x03, 0xe8, // ts 1000
        ];
        let buf = PacketBuffer::new(&data);

        let decoded = IpTimestampDecoder.decode(&buf, 0, 12).unwrap();

        assert_eq!(decoded.get("overflow"), Some(&FieldValue::UInt8(2)));
        assert_eq!(
            decoded.get("addresses"),
            Some(&FieldValue::List(vec![ip(10, 0, 0, 1)]))
        );
        assert_eq!(
            decoded.get("timestamps"),
            Some(&FieldValue::List(vec![FieldValue::UInt32(1000)]))
        );
    }

    #[test]
    fn test_timestamp_misaligned_pointer() {
        let data = [0x44, 0x0c, 0x09, 0x01, 0, 0, 0, 0, 0, 0, 0, 0];
        let buf = PacketBuffer::new(&data);

        assert_eq!(
            IpTimestampDecoder.decode(&buf, 0, 12),
            Err(Diagnostic::PointerOutOfRange { pointer: 9, len: 12 })
        );
    }

    #[test]
    fn test_timestamp_unknown_flag() {
        let data = [0x44, 0x08, 0x05, 0x02, 0, 0, 0, 0];
        let buf = PacketBuffer::new(&data);

        assert!(matches!(
            IpTimestampDecoder.decode(&buf, 0, 8),
            Err(Diagnostic::InvalidPayload { .. })
        ));
    }

    // ========== effective destination ==========

    #[test]
    fn test_find_trailing_offset_strict_route() {
        let route = RouteBuilder::new()
            .pointer(8)
            .address([10, 0, 0, 1])
            .address([10, 0, 0, 2]);
        let data = OptionsBuilder::new()
            .nop()
            .option(code::STRICT_ROUTE, &route.payload())
            .build();

        // Option starts at 1; pointer 8 selects the slot at option offset 7
        assert_eq!(ip_options().find_trailing_offset(&data[..], 0, data.len()), Some(8));
        assert_eq!(&data[8..12], &[10, 0, 0, 2]);
    }

    #[test]
    fn test_find_trailing_offset_ignores_record_route() {
        let route = RouteBuilder::new().address([10, 0, 0, 1]);
        let data = OptionsBuilder::new()
            .option(code::RECORD_ROUTE, &route.payload())
            .eol()
            .build();

        assert_eq!(ip_options().find_trailing_offset(&data[..], 0, data.len()), None);
    }

    #[test]
    fn test_find_trailing_offset_completed_route() {
        let route = RouteBuilder::new().pointer(8).address([10, 0, 0, 1]);
        let data = OptionsBuilder::new()
            .option(code::LOOSE_ROUTE, &route.payload())
            .eol()
            .build();

        assert_eq!(ip_options().find_trailing_offset(&data[..], 0, data.len()), None);
    }

    #[test]
    fn test_find_trailing_offset_stops_at_eol() {
        let route = RouteBuilder::new().address([10, 0, 0, 1]);
        let data = OptionsBuilder::new()
            .eol()
            .option(code::LOOSE_ROUTE, &route.payload())
            .build();

        assert_eq!(ip_options().find_trailing_offset(&data[..], 0, data.len()), None);
    }
}
