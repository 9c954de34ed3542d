//! Reusable option decoders.

use compact_str::format_compact;

use super::{DecodedOption, Diagnostic, OptionDecoder};
use crate::buffer::PacketBuffer;
use crate::field::FieldValue;

/// Width of an unsigned integer payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Width {
    U8,
    U16,
    U32,
}

/// Decodes a single big-endian unsigned integer right after the length byte.
#[derive(Debug, Clone, Copy)]
pub struct UnsignedValue {
    field: &'static str,
    width: Width,
}

impl UnsignedValue {
    pub const fn u8(field: &'static str) -> Self {
        Self {
            field,
            width: Width::U8,
        }
    }

    pub const fn u16(field: &'static str) -> Self {
        Self {
            field,
            width: Width::U16,
        }
    }

    pub const fn u32(field: &'static str) -> Self {
        Self {
            field,
            width: Width::U32,
        }
    }
}

impl OptionDecoder for UnsignedValue {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        _len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        let at = offset + 2;
        let value = match self.width {
            Width::U8 => FieldValue::UInt8(buf.u8_at(at)?),
            Width::U16 => FieldValue::UInt16(buf.u16_at(at)?),
            Width::U32 => FieldValue::UInt32(buf.u32_at(at)?),
        };
        Ok(DecodedOption::new().with_field(self.field, value))
    }
}

/// Two consecutive big-endian u32 values (e.g. TSval / TSecr).
#[derive(Debug, Clone, Copy)]
pub struct U32Pair {
    pub first: &'static str,
    pub second: &'static str,
}

impl OptionDecoder for U32Pair {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        _len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        Ok(DecodedOption::new()
            .with_field(self.first, FieldValue::UInt32(buf.u32_at(offset + 2)?))
            .with_field(self.second, FieldValue::UInt32(buf.u32_at(offset + 6)?)))
    }
}

/// Exposes the payload after the length byte as raw bytes.
#[derive(Debug, Clone, Copy)]
pub struct RawPayload {
    pub field: &'static str,
}

impl OptionDecoder for RawPayload {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        let payload = buf.bytes_at(offset + 2, len.saturating_sub(2))?;
        Ok(DecodedOption::new().with_field(self.field, FieldValue::Bytes(payload)))
    }
}

/// Selective acknowledgement blocks: pairs of (left edge, right edge).
///
/// Emits parallel `left_edges` / `right_edges` lists.
#[derive(Debug, Clone, Copy, Default)]
pub struct SackBlocks;

impl OptionDecoder for SackBlocks {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        let payload = buf.bytes_at(offset + 2, len.saturating_sub(2))?;
        if payload.len() % 8 != 0 {
            return Err(Diagnostic::InvalidPayload {
                reason: format_compact!(
                    "SACK data length {} is not a multiple of 8",
                    payload.len()
                ),
            });
        }

        let (left, right): (Vec<_>, Vec<_>) = payload
            .chunks_exact(8)
            .map(|block| {
                let l = u32::from_be_bytes([block[0], block[1], block[2], block[3]]);
                let r = u32::from_be_bytes([block[4], block[5], block[6], block[7]]);
                (FieldValue::UInt32(l), FieldValue::UInt32(r))
            })
            .unzip();

        Ok(DecodedOption::new()
            .with_field("left_edges", FieldValue::List(left))
            .with_field("right_edges", FieldValue::List(right)))
    }
}
