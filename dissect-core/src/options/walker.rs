//! The options region walker.

use compact_str::CompactString;
use smallvec::SmallVec;
use thiserror::Error;
use tracing::{debug, trace};

use super::descriptor::{unknown_name, DecodedOption, LengthPolicy, OptionDescriptor, OptionTable};
use crate::buffer::PacketBuffer;
use crate::error::BufferError;

/// A malformed-input condition found while walking an options region.
///
/// The `Display` text is the inline note a renderer shows next to the
/// option name, e.g. `"MSS (with option length = 3 bytes; should be 4)"`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// The option needs a length byte but the region ends after its code
    #[error("option length byte past end of options")]
    LengthPastEnd,

    /// Length byte smaller than the code + length bytes themselves
    #[error("with too-short option length = {len} byte{}", plural(.len))]
    TooShort { len: u8 },

    /// Length byte claims more bytes than remain in the region
    #[error("option length = {len} byte{} says option goes past end of options", plural(.len))]
    PastEnd { len: u8 },

    /// Fixed-length option with the wrong length
    #[error("with option length = {len} byte{}; should be {expected}", plural(.len))]
    WrongFixedLength { len: u8, expected: u8 },

    /// Variable-length option below its minimum length
    #[error("with option length = {len} byte{}; should be >= {min}", plural(.len))]
    BelowMinimum { len: u8, min: u8 },

    /// Route or timestamp pointer outside the option's slot list
    #[error("pointer {pointer} is out of range for option length {len}")]
    PointerOutOfRange { pointer: u8, len: u8 },

    /// Option payload that is internally inconsistent
    #[error("{reason}")]
    InvalidPayload { reason: CompactString },

    /// Four or more NOPs in a row starting on a 32-bit boundary
    #[error("{count} NOPs in a row starting at offset {offset}; a router may have removed some options")]
    ConsecutiveNops { offset: usize, count: usize },

    /// Region extends past the captured bytes
    #[error("{0}")]
    Captured(#[from] BufferError),
}

fn plural(n: &u8) -> &'static str {
    if *n == 1 {
        ""
    } else {
        "s"
    }
}

/// What the walker made of one option.
#[derive(Debug, Clone, PartialEq)]
pub enum OptionOutcome<'a> {
    /// Known option, decoded by its table decoder
    Decoded(DecodedOption<'a>),
    /// Known option without a decoder: the whole option span
    Opaque(&'a [u8]),
    /// Code absent from the table, skipped via its length byte
    Unknown(&'a [u8]),
    /// Malformed option
    Malformed(Diagnostic),
}

/// One visited option.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionRecord<'a> {
    /// Absolute offset of the option's code byte.
    pub offset: usize,
    /// Bytes of this option accounted for (the bytes actually confirmed
    /// for a malformed option that stopped the walk).
    pub length: usize,
    pub code: u8,
    pub name: CompactString,
    pub outcome: OptionOutcome<'a>,
}

impl<'a> OptionRecord<'a> {
    pub fn decoded(&self) -> Option<&DecodedOption<'a>> {
        match &self.outcome {
            OptionOutcome::Decoded(d) => Some(d),
            _ => None,
        }
    }

    pub fn diagnostic(&self) -> Option<&Diagnostic> {
        match &self.outcome {
            OptionOutcome::Malformed(d) => Some(d),
            _ => None,
        }
    }
}

impl std::fmt::Display for OptionRecord<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.outcome {
            OptionOutcome::Decoded(decoded) => {
                f.write_str(&self.name)?;
                for (i, (name, value)) in decoded.iter().enumerate() {
                    f.write_str(if i == 0 { ": " } else { ", " })?;
                    write!(f, "{name}={value}")?;
                }
                Ok(())
            }
            OptionOutcome::Opaque(span) | OptionOutcome::Unknown(span) => {
                write!(f, "{} ({} byte{})", self.name, span.len(), if span.len() == 1 { "" } else { "s" })
            }
            OptionOutcome::Malformed(diagnostic) => write!(f, "{} ({diagnostic})", self.name),
        }
    }
}

/// Why a walk finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkEnd {
    /// The whole region was consumed
    Exhausted,
    /// The end-of-list option was reached
    EndOfList,
    /// A malformed option made the rest of the region unreliable
    Aborted,
}

/// Result of walking one options region.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkResult<'a> {
    /// Options in the order visited. Offsets strictly increase.
    pub records: SmallVec<[OptionRecord<'a>; 8]>,
    /// Bytes from the region start confirmed consumed. Never exceeds the
    /// region length.
    pub consumed: usize,
    /// Non-fatal anomalies that did not stop the walk.
    pub warnings: SmallVec<[Diagnostic; 1]>,
    pub end: WalkEnd,
}

impl<'a> WalkResult<'a> {
    fn new() -> Self {
        Self {
            records: SmallVec::new(),
            consumed: 0,
            warnings: SmallVec::new(),
            end: WalkEnd::Exhausted,
        }
    }

    /// True unless a malformed option aborted the walk.
    pub fn is_complete(&self) -> bool {
        self.end != WalkEnd::Aborted
    }

    /// The diagnostic that aborted the walk, if any.
    pub fn stop(&self) -> Option<&Diagnostic> {
        match self.end {
            WalkEnd::Aborted => self.records.last().and_then(|r| r.diagnostic()),
            _ => None,
        }
    }

    /// First record with the given code.
    pub fn find(&self, code: u8) -> Option<&OptionRecord<'a>> {
        self.records.iter().find(|r| r.code == code)
    }

    pub fn iter(&self) -> impl Iterator<Item = &OptionRecord<'a>> {
        self.records.iter()
    }

    /// Bytes of the region left undissected.
    pub fn undissected(&self, region_len: usize) -> usize {
        region_len.saturating_sub(self.consumed)
    }
}

/// Descriptor lookup result: table entry or a synthesized unknown.
#[derive(Clone, Copy)]
enum Resolved<'t> {
    Known(&'t OptionDescriptor),
    Unknown,
}

impl Resolved<'_> {
    fn policy(&self) -> LengthPolicy {
        match self {
            Resolved::Known(d) => d.policy(),
            Resolved::Unknown => LengthPolicy::UNKNOWN,
        }
    }

    fn name(&self, code: u8) -> CompactString {
        match self {
            Resolved::Known(d) => CompactString::const_new(d.name()),
            Resolved::Unknown => unknown_name(code),
        }
    }
}

/// One step of the shared walking engine.
enum Step<'t> {
    /// An option whose length checks passed and whose bytes are captured.
    Valid {
        offset: usize,
        len: usize,
        code: u8,
        descriptor: Resolved<'t>,
    },
    /// A malformed option; nothing after it is trusted.
    Stop {
        offset: usize,
        confirmed: usize,
        code: Option<u8>,
        descriptor: Resolved<'t>,
        diagnostic: Diagnostic,
    },
}

/// Iterates the options of a region, enforcing length policies and region
/// bounds. Both `walk` and `find_trailing_offset` are built on it.
struct OptionCursor<'a, 't> {
    buf: PacketBuffer<'a>,
    table: &'t OptionTable,
    offset: usize,
    remaining: usize,
    end_code: Option<u8>,
    done: bool,
}

impl<'a, 't> OptionCursor<'a, 't> {
    fn new(
        buf: PacketBuffer<'a>,
        table: &'t OptionTable,
        start: usize,
        region_len: usize,
        end_code: Option<u8>,
    ) -> Self {
        Self {
            buf,
            table,
            offset: start,
            remaining: region_len,
            end_code,
            done: false,
        }
    }

    fn stop(
        &mut self,
        offset: usize,
        confirmed: usize,
        code: Option<u8>,
        descriptor: Resolved<'t>,
        diagnostic: Diagnostic,
    ) -> Option<Step<'t>> {
        self.done = true;
        Some(Step::Stop {
            offset,
            confirmed,
            code,
            descriptor,
            diagnostic,
        })
    }
}

impl<'a, 't> Iterator for OptionCursor<'a, 't> {
    type Item = Step<'t>;

    fn next(&mut self) -> Option<Step<'t>> {
        if self.done || self.remaining == 0 {
            return None;
        }

        let offset = self.offset;
        let code = match self.buf.u8_at(offset) {
            Ok(code) => code,
            Err(e) => return self.stop(offset, 0, None, Resolved::Unknown, e.into()),
        };
        let descriptor = match self.table.get(code) {
            Some(d) => Resolved::Known(d),
            None => Resolved::Unknown,
        };
        self.remaining -= 1;

        let policy = descriptor.policy();
        let len = if policy.has_length_byte() {
            if self.remaining == 0 {
                return self.stop(offset, 1, Some(code), descriptor, Diagnostic::LengthPastEnd);
            }
            let len = match self.buf.u8_at(offset + 1) {
                Ok(len) => len,
                Err(e) => return self.stop(offset, 1, Some(code), descriptor, e.into()),
            };
            self.remaining -= 1;

            let violation = if len < 2 {
                Some(Diagnostic::TooShort { len })
            } else if usize::from(len - 2) > self.remaining {
                Some(Diagnostic::PastEnd { len })
            } else {
                match policy {
                    LengthPolicy::Fixed(expected) if len != expected => {
                        Some(Diagnostic::WrongFixedLength { len, expected })
                    }
                    LengthPolicy::Variable { min } if len < min => {
                        Some(Diagnostic::BelowMinimum { len, min })
                    }
                    _ => None,
                }
            };
            if let Some(diagnostic) = violation {
                return self.stop(offset, 2, Some(code), descriptor, diagnostic);
            }
            if let Err(e) = self.buf.bytes_at(offset, usize::from(len)) {
                return self.stop(offset, 2, Some(code), descriptor, e.into());
            }

            self.remaining -= usize::from(len - 2);
            usize::from(len)
        } else {
            1
        };

        self.offset += len;
        if Some(code) == self.end_code {
            self.done = true;
        }
        Some(Step::Valid {
            offset,
            len,
            code,
            descriptor,
        })
    }
}

/// Walk a TLV options region, decoding each option with `table`.
///
/// `start` is the absolute offset of the region in `buffer` and
/// `region_len` its length as declared by the enclosing header. The walk
/// stops at the first malformed option, on `end_code`, or when the region
/// is exhausted; in every case `consumed` tells the caller where reliable
/// data ends.
pub fn walk<'a>(
    buffer: impl Into<PacketBuffer<'a>>,
    start: usize,
    region_len: usize,
    table: &OptionTable,
    end_code: Option<u8>,
) -> WalkResult<'a> {
    let buf = buffer.into();
    let mut result = WalkResult::new();
    let mut nop_run = 0usize;
    let mut nop_run_start = start;
    let mut nop_warning: Option<usize> = None;

    for step in OptionCursor::new(buf, table, start, region_len, end_code) {
        match step {
            Step::Valid {
                offset,
                len,
                code,
                descriptor,
            } => {
                trace!(code, offset, len, "option");

                if Some(code) == table.nop_code() {
                    if nop_run == 0 {
                        nop_run_start = offset;
                        nop_warning = None;
                    }
                    nop_run += 1;
                    if let Some(i) = nop_warning {
                        if let Diagnostic::ConsecutiveNops { count, .. } = &mut result.warnings[i] {
                            *count = nop_run;
                        }
                    } else if nop_run == 4 && (nop_run_start - start) % 4 == 0 {
                        debug!(offset = nop_run_start, "consecutive NOP options");
                        nop_warning = Some(result.warnings.len());
                        result.warnings.push(Diagnostic::ConsecutiveNops {
                            offset: nop_run_start,
                            count: nop_run,
                        });
                    }
                } else {
                    nop_run = 0;
                }

                // The cursor verified these bytes are captured.
                let span = buf.as_slice().get(offset..offset + len).unwrap_or_default();
                let outcome = match descriptor {
                    Resolved::Known(d) => match d.decoder() {
                        Some(decoder) => match decoder.decode(&buf, offset, len) {
                            Ok(decoded) => OptionOutcome::Decoded(decoded),
                            Err(diagnostic) => {
                                debug!(code, offset, %diagnostic, "malformed option payload");
                                OptionOutcome::Malformed(diagnostic)
                            }
                        },
                        None => OptionOutcome::Opaque(span),
                    },
                    Resolved::Unknown => OptionOutcome::Unknown(span),
                };

                result.consumed = offset + len - start;
                result.records.push(OptionRecord {
                    offset,
                    length: len,
                    code,
                    name: descriptor.name(code),
                    outcome,
                });
                if Some(code) == end_code {
                    result.end = WalkEnd::EndOfList;
                }
            }
            Step::Stop {
                offset,
                confirmed,
                code,
                descriptor,
                diagnostic,
            } => {
                debug!(offset, %diagnostic, "stopping option walk");
                result.consumed = offset + confirmed - start;
                result.end = WalkEnd::Aborted;
                if let Some(code) = code {
                    result.records.push(OptionRecord {
                        offset,
                        length: confirmed,
                        code,
                        name: descriptor.name(code),
                        outcome: OptionOutcome::Malformed(diagnostic),
                    });
                } else {
                    // Not even the code byte was captured: nothing to name.
                    result.records.push(OptionRecord {
                        offset,
                        length: 0,
                        code: 0,
                        name: CompactString::const_new("Truncated option"),
                        outcome: OptionOutcome::Malformed(diagnostic),
                    });
                }
            }
        }
    }

    result
}

/// Find the effective destination slot of a source-route option.
///
/// Walks the region exactly as [`walk`] does, but only looks for options
/// flagged [`source_route`](OptionDescriptor::source_route). For the first
/// one found, returns the absolute offset of the address slot its pointer
/// designates. Returns `None` when there is no such option, the walk
/// aborts first, or the pointer does not designate a complete slot.
pub fn find_trailing_offset<'a>(
    buffer: impl Into<PacketBuffer<'a>>,
    start: usize,
    region_len: usize,
    table: &OptionTable,
    end_code: Option<u8>,
) -> Option<usize> {
    let buf = buffer.into();
    for step in OptionCursor::new(buf, table, start, region_len, end_code) {
        match step {
            Step::Valid {
                offset,
                len,
                descriptor: Resolved::Known(d),
                ..
            } if d.is_source_route() => {
                return super::route::designated_slot(&buf, offset, len);
            }
            Step::Valid { .. } => {}
            Step::Stop { .. } => return None,
        }
    }
    None
}
