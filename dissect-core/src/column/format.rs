//! Column format kinds.
//!
//! A [`ColumnFormat`] names what a column displays. Each kind has a classic
//! `%`-style specifier (`%m`, `%s`, `%i`, ...) used in column preferences.

use std::fmt;
use std::str::FromStr;

use super::config::TimestampFormat;
use crate::error::ConfigError;

/// What a column displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ColumnFormat {
    /// Frame number
    Number,
    /// Time in the configured display format
    ClsTime,
    AbsTime,
    AbsDateTime,
    RelTime,
    DeltaTime,
    DeltaTimeDisplayed,
    EpochTime,

    /// Source address, resolved when name resolution is enabled
    DefSrc,
    ResSrc,
    UnresSrc,
    DefDlSrc,
    ResDlSrc,
    UnresDlSrc,
    DefNetSrc,
    ResNetSrc,
    UnresNetSrc,

    /// Destination address, resolved when name resolution is enabled
    DefDst,
    ResDst,
    UnresDst,
    DefDlDst,
    ResDlDst,
    UnresDlDst,
    DefNetDst,
    ResNetDst,
    UnresNetDst,

    DefSrcPort,
    ResSrcPort,
    UnresSrcPort,
    DefDstPort,
    ResDstPort,
    UnresDstPort,

    /// Highest-layer protocol name
    Protocol,
    /// Summary line
    Info,
    /// Frame length on the wire
    PacketLength,
    /// Bytes seen so far including this frame
    CumulativeBytes,
    /// Frame relay DLCI, X.25 logical channel, ISDN channel
    CircuitId,
    /// Free-form text written by dissectors
    Custom,
}

/// (kind, specifier, default title)
const FORMATS: [(ColumnFormat, &str, &str); ColumnFormat::COUNT] = [
    (ColumnFormat::Number, "%m", "No."),
    (ColumnFormat::ClsTime, "%t", "Time"),
    (ColumnFormat::AbsTime, "%At", "Absolute time"),
    (ColumnFormat::AbsDateTime, "%Yt", "Absolute date and time"),
    (ColumnFormat::RelTime, "%Rt", "Relative time"),
    (ColumnFormat::DeltaTime, "%Tt", "Delta time"),
    (ColumnFormat::DeltaTimeDisplayed, "%Gt", "Delta time displayed"),
    (ColumnFormat::EpochTime, "%Et", "Epoch time"),
    (ColumnFormat::DefSrc, "%s", "Source"),
    (ColumnFormat::ResSrc, "%rs", "Source (resolved)"),
    (ColumnFormat::UnresSrc, "%us", "Source (unresolved)"),
    (ColumnFormat::DefDlSrc, "%hs", "Hardware src addr"),
    (ColumnFormat::ResDlSrc, "%rhs", "Hw src addr (resolved)"),
    (ColumnFormat::UnresDlSrc, "%uhs", "Hw src addr (unresolved)"),
    (ColumnFormat::DefNetSrc, "%ns", "Net src addr"),
    (ColumnFormat::ResNetSrc, "%rns", "Net src addr (resolved)"),
    (ColumnFormat::UnresNetSrc, "%uns", "Net src addr (unresolved)"),
    (ColumnFormat::DefDst, "%d", "Destination"),
    (ColumnFormat::ResDst, "%rd", "Dest addr (resolved)"),
    (ColumnFormat::UnresDst, "%ud", "Dest addr (unresolved)"),
    (ColumnFormat::DefDlDst, "%hd", "Hardware dest addr"),
    (ColumnFormat::ResDlDst, "%rhd", "Hw dest addr (resolved)"),
    (ColumnFormat::UnresDlDst, "%uhd", "Hw dest addr (unresolved)"),
    (ColumnFormat::DefNetDst, "%nd", "Net dest addr"),
    (ColumnFormat::ResNetDst, "%rnd", "Net dest addr (resolved)"),
    (ColumnFormat::UnresNetDst, "%und", "Net dest addr (unresolved)"),
    (ColumnFormat::DefSrcPort, "%S", "Source port"),
    (ColumnFormat::ResSrcPort, "%rS", "Src port (resolved)"),
    (ColumnFormat::UnresSrcPort, "%uS", "Src port (unresolved)"),
    (ColumnFormat::DefDstPort, "%D", "Destination port"),
    (ColumnFormat::ResDstPort, "%rD", "Dest port (resolved)"),
    (ColumnFormat::UnresDstPort, "%uD", "Dest port (unresolved)"),
    (ColumnFormat::Protocol, "%p", "Protocol"),
    (ColumnFormat::Info, "%i", "Info"),
    (ColumnFormat::PacketLength, "%L", "Length"),
    (ColumnFormat::CumulativeBytes, "%B", "Cumulative Bytes"),
    (ColumnFormat::CircuitId, "%c", "Circuit ID"),
    (ColumnFormat::Custom, "%Cus", "Custom"),
];

impl ColumnFormat {
    /// Number of column kinds.
    pub const COUNT: usize = 38;

    /// Every kind, in declaration order.
    pub fn all() -> impl Iterator<Item = ColumnFormat> {
        FORMATS.iter().map(|(kind, _, _)| *kind)
    }

    /// Dense index of this kind, `0..COUNT`.
    pub fn index(self) -> usize {
        self as usize
    }

    /// The `%`-style specifier.
    pub fn specifier(self) -> &'static str {
        FORMATS[self.index()].1
    }

    /// Title shown in a column header when none is configured.
    pub fn default_title(self) -> &'static str {
        FORMATS[self.index()].2
    }

    /// Whether this is the summary column, which gets the larger capacity.
    pub fn is_info(self) -> bool {
        self == ColumnFormat::Info
    }

    /// The concrete time kind a [`ClsTime`](ColumnFormat::ClsTime) column
    /// shows under `format`.
    pub fn for_timestamp_format(format: TimestampFormat) -> ColumnFormat {
        match format {
            TimestampFormat::Absolute => ColumnFormat::AbsTime,
            TimestampFormat::AbsoluteWithDate => ColumnFormat::AbsDateTime,
            TimestampFormat::Relative => ColumnFormat::RelTime,
            TimestampFormat::Delta => ColumnFormat::DeltaTime,
            TimestampFormat::DeltaDisplayed => ColumnFormat::DeltaTimeDisplayed,
            TimestampFormat::Epoch => ColumnFormat::EpochTime,
        }
    }

    /// Kinds a column configured as `self` answers to.
    ///
    /// A column always answers to its own kind. Generic address and port
    /// columns also answer to the resolved variants dissectors write, and
    /// the time column answers to the kind of the active time format.
    pub fn matches(self, timestamp_format: TimestampFormat) -> KindSet {
        use ColumnFormat::*;

        let mut set = KindSet::single(self);
        let extra: &[ColumnFormat] = match self {
            DefSrc | ResSrc => &[ResDlSrc, ResNetSrc],
            UnresSrc => &[UnresDlSrc, UnresNetSrc],
            DefDst | ResDst => &[ResDlDst, ResNetDst],
            UnresDst => &[UnresDlDst, UnresNetDst],
            DefDlSrc => &[ResDlSrc],
            DefDlDst => &[ResDlDst],
            DefNetSrc => &[ResNetSrc],
            DefNetDst => &[ResNetDst],
            DefSrcPort => &[ResSrcPort],
            DefDstPort => &[ResDstPort],
            _ => &[],
        };
        for kind in extra {
            set.insert(*kind);
        }
        if self == ClsTime {
            set.insert(ColumnFormat::for_timestamp_format(timestamp_format));
        }
        set
    }
}

impl fmt::Display for ColumnFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.specifier())
    }
}

impl FromStr for ColumnFormat {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let spec = s.trim();
        FORMATS
            .iter()
            .find(|(_, specifier, _)| *specifier == spec)
            .map(|(kind, _, _)| *kind)
            .ok_or_else(|| ConfigError::UnknownColumnFormat {
                spec: spec.to_string(),
            })
    }
}

/// A set of column kinds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KindSet(u64);

impl KindSet {
    pub fn single(kind: ColumnFormat) -> Self {
        Self(1 << kind.index())
    }

    pub fn insert(&mut self, kind: ColumnFormat) {
        self.0 |= 1 << kind.index();
    }

    pub fn contains(&self, kind: ColumnFormat) -> bool {
        self.0 & (1 << kind.index()) != 0
    }

    pub fn iter(&self) -> impl Iterator<Item = ColumnFormat> + '_ {
        ColumnFormat::all().filter(|kind| self.contains(*kind))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_order_matches_discriminants() {
        for (i, (kind, _, _)) in FORMATS.iter().enumerate() {
            assert_eq!(kind.index(), i, "{kind:?}");
        }
        assert_eq!(ColumnFormat::all().count(), ColumnFormat::COUNT);
    }

    #[test]
    fn test_parse_specifiers() {
        assert_eq!("%m".parse::<ColumnFormat>(), Ok(ColumnFormat::Number));
        assert_eq!("%rd".parse::<ColumnFormat>(), Ok(ColumnFormat::ResDst));
        assert_eq!(" %i ".parse::<ColumnFormat>(), Ok(ColumnFormat::Info));
        assert_eq!("%S".parse::<ColumnFormat>(), Ok(ColumnFormat::DefSrcPort));
        assert_eq!("%s".parse::<ColumnFormat>(), Ok(ColumnFormat::DefSrc));
    }

    #[test]
    fn test_parse_unknown_specifier() {
        assert_eq!(
            "%q".parse::<ColumnFormat>(),
            Err(ConfigError::UnknownColumnFormat {
                spec: "%q".to_string()
            })
        );
    }

    #[test]
    fn test_specifier_roundtrip() {
        for kind in ColumnFormat::all() {
            assert_eq!(kind.to_string().parse::<ColumnFormat>(), Ok(kind));
        }
    }

    #[test]
    fn test_source_column_matches() {
        let set = ColumnFormat::DefSrc.matches(TimestampFormat::Relative);
        assert!(set.contains(ColumnFormat::DefSrc));
        assert!(set.contains(ColumnFormat::ResNetSrc));
        assert!(set.contains(ColumnFormat::ResDlSrc));
        assert!(!set.contains(ColumnFormat::UnresNetSrc));
        assert_eq!(set.iter().count(), 3);
    }

    #[test]
    fn test_time_column_follows_format() {
        let set = ColumnFormat::ClsTime.matches(TimestampFormat::Delta);
        assert!(set.contains(ColumnFormat::DeltaTime));
        assert!(!set.contains(ColumnFormat::RelTime));

        let plain = ColumnFormat::Info.matches(TimestampFormat::Delta);
        assert_eq!(plain, KindSet::single(ColumnFormat::Info));
    }
}
