//! Option descriptors and option tables.

use compact_str::{format_compact, CompactString};

use super::{Diagnostic, WalkResult};
use crate::buffer::PacketBuffer;
use crate::field::{FieldEntry, FieldValue, OptionFields};

/// How the length of an option is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthPolicy {
    /// Single code byte, no length byte (EOL, NOP).
    NoLength,
    /// Code + length byte, where the length must equal this value.
    Fixed(u8),
    /// Code + length byte, where the length must be at least `min`.
    Variable { min: u8 },
}

impl LengthPolicy {
    /// Policy applied to codes missing from the table.
    pub const UNKNOWN: LengthPolicy = LengthPolicy::Variable { min: 2 };

    pub fn has_length_byte(&self) -> bool {
        !matches!(self, LengthPolicy::NoLength)
    }
}

/// Fields produced by a successful option decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedOption<'a> {
    pub fields: OptionFields<'a>,
}

impl<'a> DecodedOption<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &'static str, value: FieldValue<'a>) -> Self {
        self.fields.push((name, value));
        self
    }

    pub fn push(&mut self, name: &'static str, value: FieldValue<'a>) {
        self.fields.push((name, value));
    }

    /// Get the first field with the given name.
    pub fn get(&self, name: &str) -> Option<&FieldValue<'a>> {
        self.fields.iter().find(|(k, _)| *k == name).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldEntry<'a>> {
        self.fields.iter()
    }
}

/// Decodes the payload of one option.
///
/// `offset` is the absolute offset of the option's code byte in `buf` and
/// `len` its total length including code and length bytes (1 for options
/// without a length byte). The walker has already verified that all `len`
/// bytes are captured and satisfy the descriptor's length policy.
///
/// Returning `Err` marks the option as malformed; since its length was
/// valid the walker keeps going with the next option.
pub trait OptionDecoder: Send + Sync {
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic>;
}

impl<F> OptionDecoder for F
where
    F: for<'a> Fn(&PacketBuffer<'a>, usize, usize) -> Result<DecodedOption<'a>, Diagnostic>
        + Send
        + Sync,
{
    fn decode<'a>(
        &self,
        buf: &PacketBuffer<'a>,
        offset: usize,
        len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        self(buf, offset, len)
    }
}

/// Static description of one option kind.
pub struct OptionDescriptor {
    code: u8,
    name: &'static str,
    policy: LengthPolicy,
    decoder: Option<Box<dyn OptionDecoder>>,
    source_route: bool,
}

impl OptionDescriptor {
    pub fn new(code: u8, name: &'static str, policy: LengthPolicy) -> Self {
        Self {
            code,
            name,
            policy,
            decoder: None,
            source_route: false,
        }
    }

    pub fn no_length(code: u8, name: &'static str) -> Self {
        Self::new(code, name, LengthPolicy::NoLength)
    }

    pub fn fixed(code: u8, name: &'static str, len: u8) -> Self {
        Self::new(code, name, LengthPolicy::Fixed(len))
    }

    pub fn variable(code: u8, name: &'static str, min: u8) -> Self {
        Self::new(code, name, LengthPolicy::Variable { min })
    }

    pub fn with_decoder(mut self, decoder: impl OptionDecoder + 'static) -> Self {
        self.decoder = Some(Box::new(decoder));
        self
    }

    /// Mark this option as a source route: a pointer byte followed by
    /// 4-byte address slots, where the pointer selects the effective
    /// destination.
    pub fn source_route(mut self) -> Self {
        self.source_route = true;
        self
    }

    pub fn code(&self) -> u8 {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn policy(&self) -> LengthPolicy {
        self.policy
    }

    pub fn decoder(&self) -> Option<&dyn OptionDecoder> {
        self.decoder.as_deref()
    }

    pub fn is_source_route(&self) -> bool {
        self.source_route
    }
}

impl std::fmt::Debug for OptionDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionDescriptor")
            .field("code", &self.code)
            .field("name", &self.name)
            .field("policy", &self.policy)
            .field("has_decoder", &self.decoder.is_some())
            .field("source_route", &self.source_route)
            .finish()
    }
}

/// Display name for a code missing from the table.
pub(crate) fn unknown_name(code: u8) -> CompactString {
    format_compact!("Unknown (0x{code:02x})")
}

/// An immutable set of option descriptors for one options region type.
///
/// Lookups go through a 256-entry index built at construction, so the walk
/// loop never scans the descriptor list. When two descriptors share a code
/// the first one wins.
pub struct OptionTable {
    descriptors: Vec<OptionDescriptor>,
    index: [Option<u16>; 256],
    end_code: Option<u8>,
    nop_code: Option<u8>,
}

impl OptionTable {
    pub fn new(descriptors: Vec<OptionDescriptor>) -> Self {
        let mut index = [None; 256];
        for (i, descriptor) in descriptors.iter().enumerate() {
            let slot = &mut index[descriptor.code as usize];
            if slot.is_none() {
                *slot = Some(i as u16);
            }
        }
        Self {
            descriptors,
            index,
            end_code: None,
            nop_code: None,
        }
    }

    /// Code that terminates the option list.
    pub fn with_end_code(mut self, code: u8) -> Self {
        self.end_code = Some(code);
        self
    }

    /// Code of the one-byte padding option tracked for NOP runs.
    pub fn with_nop_code(mut self, code: u8) -> Self {
        self.nop_code = Some(code);
        self
    }

    pub fn get(&self, code: u8) -> Option<&OptionDescriptor> {
        self.index[code as usize].map(|i| &self.descriptors[i as usize])
    }

    pub fn end_code(&self) -> Option<u8> {
        self.end_code
    }

    pub fn nop_code(&self) -> Option<u8> {
        self.nop_code
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionDescriptor> {
        self.descriptors.iter()
    }

    /// Walk an options region using this table's own end code.
    pub fn walk<'a>(
        &self,
        buffer: impl Into<PacketBuffer<'a>>,
        start: usize,
        region_len: usize,
    ) -> WalkResult<'a> {
        super::walk(buffer, start, region_len, self, self.end_code)
    }

    /// Locate the effective-destination slot using this table's own end code.
    pub fn find_trailing_offset<'a>(
        &self,
        buffer: impl Into<PacketBuffer<'a>>,
        start: usize,
        region_len: usize,
    ) -> Option<usize> {
        super::find_trailing_offset(buffer, start, region_len, self, self.end_code)
    }
}

impl std::fmt::Debug for OptionTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OptionTable")
            .field("descriptors", &self.descriptors)
            .field("end_code", &self.end_code)
            .field("nop_code", &self.nop_code)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_byte<'a>(
        buf: &PacketBuffer<'a>,
        offset: usize,
        _len: usize,
    ) -> Result<DecodedOption<'a>, Diagnostic> {
        let value = buf.u8_at(offset + 2)?;
        Ok(DecodedOption::new().with_field("value", FieldValue::UInt8(value)))
    }

    #[test]
    fn test_index_lookup() {
        let table = OptionTable::new(vec![
            OptionDescriptor::no_length(0, "EOL"),
            OptionDescriptor::fixed(2, "MSS", 4),
        ]);

        assert_eq!(table.get(2).map(|d| d.name()), Some("MSS"));
        assert_eq!(table.get(0).map(|d| d.policy()), Some(LengthPolicy::NoLength));
        assert!(table.get(3).is_none());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn test_first_duplicate_wins() {
        let table = OptionTable::new(vec![
            OptionDescriptor::fixed(9, "first", 4),
            OptionDescriptor::fixed(9, "second", 6),
        ]);

        assert_eq!(table.get(9).map(|d| d.name()), Some("first"));
    }

    #[test]
    fn test_empty_table() {
        let table = OptionTable::new(Vec::new());
        assert!(table.is_empty());
        assert!(table.end_code().is_none());
        assert!(table.get(0).is_none());
    }

    #[test]
    fn test_fn_item_decoder() {
        let descriptor = OptionDescriptor::variable(30, "Test", 3).with_decoder(first_byte);
        let data = [30u8, 3, 0x2a];
        let buf = PacketBuffer::new(&data);

        let decoded = descriptor.decoder().unwrap().decode(&buf, 0, 3).unwrap();
        assert_eq!(decoded.get("value"), Some(&FieldValue::UInt8(0x2a)));
    }

    #[test]
    fn test_unknown_name() {
        assert_eq!(unknown_name(0x9f), "Unknown (0x9f)");
    }
}
