//! TCP header options (RFC 9293, RFC 7323, RFC 2018, RFC 5482).

use super::decoders::{RawPayload, SackBlocks, U32Pair, UnsignedValue};
use super::{DecodedOption, Diagnostic, OptionDescriptor, OptionTable};
use crate::buffer::PacketBuffer;
use crate::field::FieldValue;

/// TCP option kinds.
pub mod code {
    pub const END_OF_LIST: u8 = 0;
    pub const NOP: u8 = 1;
    pub const MSS: u8 = 2;
    pub const WINDOW_SCALE: u8 = 3;
    pub const SACK_PERMITTED: u8 = 4;
    pub const SACK: u8 = 5;
    pub const ECHO: u8 = 6;
    pub const ECHO_REPLY: u8 = 7;
    pub const TIMESTAMP: u8 = 8;
    pub const CC: u8 = 11;
    pub const CC_NEW: u8 = 12;
    pub const CC_ECHO: u8 = 13;
    pub const MD5: u8 = 19;
    pub const USER_TIMEOUT: u8 = 28;
}

/// Build the TCP options table.
pub fn table() -> OptionTable {
    OptionTable::new(vec![
        OptionDescriptor::no_length(code::END_OF_LIST, "End of Option List (EOL)"),
        OptionDescriptor::no_length(code::NOP, "No-Operation (NOP)"),
        OptionDescriptor::fixed(code::MSS, "Maximum segment size", 4)
            .with_decoder(UnsignedValue::u16("mss")),
        OptionDescriptor::fixed(code::WINDOW_SCALE, "Window scale", 3)
            .with_decoder(window_scale),
        OptionDescriptor::fixed(code::SACK_PERMITTED, "SACK permitted", 2),
        OptionDescriptor::variable(code::SACK, "SACK", 2).with_decoder(SackBlocks),
        OptionDescriptor::fixed(code::ECHO, "Echo", 6).with_decoder(UnsignedValue::u32("value")),
        OptionDescriptor::fixed(code::ECHO_REPLY, "Echo reply", 6)
            .with_decoder(UnsignedValue::u32("value")),
        OptionDescriptor::fixed(code::TIMESTAMP, "Timestamps", 10).with_decoder(U32Pair {
            first: "ts_val",
            second: "ts_ecr",
        }),
        OptionDescriptor::fixed(code::CC, "CC", 6).with_decoder(UnsignedValue::u32("count")),
        OptionDescriptor::fixed(code::CC_NEW, "CC.NEW", 6)
            .with_decoder(UnsignedValue::u32("count")),
        OptionDescriptor::fixed(code::CC_ECHO, "CC.ECHO", 6)
            .with_decoder(UnsignedValue::u32("count")),
        OptionDescriptor::fixed(code::MD5, "TCP MD5 signature", 18)
            .with_decoder(RawPayload { field: "digest" }),
        OptionDescriptor::fixed(code::USER_TIMEOUT, "User Timeout", 4).with_decoder(user_timeout),
    ])
    .with_end_code(code::END_OF_LIST)
    .with_nop_code(code::NOP)
}

/// Shift counts above this are clamped by receivers.
const MAX_WINDOW_SHIFT: u8 = 14;

fn window_scale<'a>(
    buf: &PacketBuffer<'a>,
    offset: usize,
    _len: usize,
) -> Result<DecodedOption<'a>, Diagnostic> {
    let shift = buf.u8_at(offset + 2)?;
    let multiplier = 1u32 << shift.min(MAX_WINDOW_SHIFT);
    Ok(DecodedOption::new()
        .with_field("shift", FieldValue::UInt8(shift))
        .with_field("multiplier", FieldValue::UInt32(multiplier)))
}

/// High bit selects minutes instead of seconds.
fn user_timeout<'a>(
    buf: &PacketBuffer<'a>,
    offset: usize,
    _len: usize,
) -> Result<DecodedOption<'a>, Diagnostic> {
    let raw = buf.u16_at(offset + 2)?;
    Ok(DecodedOption::new()
        .with_field("granularity_minutes", FieldValue::Bool(raw & 0x8000 != 0))
        .with_field("timeout", FieldValue::UInt16(raw & 0x7fff)))
}
