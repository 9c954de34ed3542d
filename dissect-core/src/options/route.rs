//! Route options: a pointer byte followed by 4-byte address slots.
//!
//! Layout (offsets relative to the option's code byte):
//!
//! ```text
//! 0      1      2        3 ...
//! +------+------+--------+-----------+-----------+--
//! | code | len  | ptr    | address 1 | address 2 | ...
//! +------+------+--------+-----------+-----------+--
//! ```
//!
//! The pointer is 1-based from the code byte, so the first slot is at
//! pointer 4 and each following slot adds 4. A pointer past the last slot
//! means the route list is full.

use compact_str::format_compact;

use super::{DecodedOption, Diagnostic, OptionDecoder};
use crate::buffer::PacketBuffer;
use crate::field::FieldValue;

/// Bytes per address slot.
pub const SLOT_SIZE: usize = 4;

/// Pointer value of the first slot.
pub const FIRST_SLOT_POINTER: u8 = 4;

/// Decoder for Record Route, Loose and Strict Source Route.
///
/// Produces `pointer`, the list of `addresses` and, while the route is not
/// full, the index of the `current` slot.
#[derive(Debug, Clone, Copy, Default)]
pub struct RouteDecoder;

impl OptionDecoder for RouteDecoder {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        let pointer = buf.u8_at(offset + 2)?;
        if pointer < FIRST_SLOT_POINTER || pointer % 4 != 0 {
            return Err(Diagnostic::PointerOutOfRange {
                pointer,
                len: len as u8,
            });
        }

        let payload = buf.bytes_at(offset + 3, len.saturating_sub(3))?;
        if payload.len() % SLOT_SIZE != 0 {
            return Err(Diagnostic::InvalidPayload {
                reason: format_compact!(
                    "route data length {} is not a multiple of {SLOT_SIZE}",
                    payload.len()
                ),
            });
        }

        let addresses: Vec<FieldValue<'a>> = payload
            .chunks_exact(SLOT_SIZE)
            .map(FieldValue::ipv4)
            .collect();
        let current = usize::from(pointer - FIRST_SLOT_POINTER) / SLOT_SIZE;

        let mut decoded = DecodedOption::new().with_field("pointer", FieldValue::UInt8(pointer));
        if current < addresses.len() {
            decoded.push("current", FieldValue::UInt8(current as u8));
        }
        decoded.push("addresses", FieldValue::List(addresses));
        Ok(decoded)
    }
}

/// Absolute offset of the slot a route option's pointer designates.
///
/// `None` when the pointer is before the first slot, not on a slot
/// boundary, or past the last complete slot.
pub(crate) fn designated_slot(buf: &PacketBuffer<'_>, offset: usize, len: usize) -> Option<usize> {
    if len < 3 {
        return None;
    }
    let pointer = buf.u8_at(offset + 2).ok()?;
    if pointer < FIRST_SLOT_POINTER || pointer % 4 != 0 {
        return None;
    }
    let slot = usize::from(pointer) - 1;
    if slot + SLOT_SIZE > len {
        return None;
    }
    Some(offset + slot)
}
