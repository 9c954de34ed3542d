//! Column display configuration.

use std::str::FromStr;

use crate::error::ConfigError;

/// How the time column shows packet timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// Time of day, `HH:MM:SS.fraction`
    Absolute,
    /// `YYYY-MM-DD HH:MM:SS.fraction`
    AbsoluteWithDate,
    /// Seconds since the first packet
    #[default]
    Relative,
    /// Seconds since the previous captured packet
    Delta,
    /// Seconds since the previous displayed packet
    DeltaDisplayed,
    /// Seconds since 1970-01-01 00:00:00 UTC
    Epoch,
}

impl FromStr for TimestampFormat {
    type Err = ConfigError;

    /// Accepts the short command-line letters (`a`, `ad`, `r`, `d`, `dd`,
    /// `e`) and the long names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" | "absolute" => Ok(TimestampFormat::Absolute),
            "ad" | "absolute_with_date" => Ok(TimestampFormat::AbsoluteWithDate),
            "r" | "relative" => Ok(TimestampFormat::Relative),
            "d" | "delta" => Ok(TimestampFormat::Delta),
            "dd" | "delta_displayed" => Ok(TimestampFormat::DeltaDisplayed),
            "e" | "epoch" => Ok(TimestampFormat::Epoch),
            _ => Err(ConfigError::UnknownTimestampFormat {
                name: s.to_string(),
            }),
        }
    }
}

/// Number of fractional digits shown for timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum TimestampPrecision {
    Seconds,
    Deciseconds,
    Centiseconds,
    Milliseconds,
    #[default]
    Microseconds,
    Nanoseconds,
}

impl TimestampPrecision {
    pub fn digits(self) -> u32 {
        match self {
            TimestampPrecision::Seconds => 0,
            TimestampPrecision::Deciseconds => 1,
            TimestampPrecision::Centiseconds => 2,
            TimestampPrecision::Milliseconds => 3,
            TimestampPrecision::Microseconds => 6,
            TimestampPrecision::Nanoseconds => 9,
        }
    }
}

impl FromStr for TimestampPrecision {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s" | "sec" => Ok(TimestampPrecision::Seconds),
            "ds" | "dsec" => Ok(TimestampPrecision::Deciseconds),
            "cs" | "csec" => Ok(TimestampPrecision::Centiseconds),
            "ms" | "msec" => Ok(TimestampPrecision::Milliseconds),
            "us" | "usec" => Ok(TimestampPrecision::Microseconds),
            "ns" | "nsec" => Ok(TimestampPrecision::Nanoseconds),
            _ => Err(ConfigError::UnknownTimestampPrecision {
                name: s.to_string(),
            }),
        }
    }
}

/// Configuration for a [`ColumnSet`](super::ColumnSet).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnConfig {
    /// Capacity in bytes of every column except Info.
    pub max_len: usize,
    /// Capacity in bytes of the Info column.
    pub max_info_len: usize,
    pub timestamp_format: TimestampFormat,
    pub timestamp_precision: TimestampPrecision,
    /// Resolve names in the default (`%s`, `%d`, `%S`, ...) columns.
    pub resolve_names: bool,
}

impl Default for ColumnConfig {
    fn default() -> Self {
        Self {
            max_len: 256,
            max_info_len: 4096,
            timestamp_format: TimestampFormat::default(),
            timestamp_precision: TimestampPrecision::default(),
            resolve_names: false,
        }
    }
}

impl ColumnConfig {
    pub fn with_max_len(mut self, max_len: usize) -> Self {
        self.max_len = max_len;
        self
    }

    pub fn with_max_info_len(mut self, max_info_len: usize) -> Self {
        self.max_info_len = max_info_len;
        self
    }

    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    pub fn with_timestamp_precision(mut self, precision: TimestampPrecision) -> Self {
        self.timestamp_precision = precision;
        self
    }

    pub fn with_resolve_names(mut self, resolve: bool) -> Self {
        self.resolve_names = resolve;
        self
    }

    /// Reject capacities that could never hold any text.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_len == 0 {
            return Err(ConfigError::ZeroCapacity { what: "columns" });
        }
        if self.max_info_len == 0 {
            return Err(ConfigError::ZeroCapacity { what: "the info column" });
        }
        Ok(())
    }

    /// Capacity of a column showing `format`.
    pub(crate) fn capacity_for(&self, format: super::ColumnFormat) -> usize {
        if format.is_info() {
            self.max_info_len
        } else {
            self.max_len
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ColumnConfig::default();
        assert_eq!(config.max_len, 256);
        assert_eq!(config.max_info_len, 4096);
        assert_eq!(config.timestamp_format, TimestampFormat::Relative);
        assert_eq!(config.timestamp_precision, TimestampPrecision::Microseconds);
        assert!(!config.resolve_names);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = ColumnConfig::default()
            .with_max_len(32)
            .with_timestamp_format(TimestampFormat::Epoch)
            .with_resolve_names(true);

        assert_eq!(config.max_len, 32);
        assert_eq!(config.timestamp_format, TimestampFormat::Epoch);
        assert!(config.resolve_names);
    }

    #[test]
    fn test_zero_capacity_rejected() {
        let config = ColumnConfig::default().with_max_info_len(0);
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroCapacity { what: "the info column" })
        );
    }

    #[test]
    fn test_parse_timestamp_format() {
        assert_eq!("ad".parse::<TimestampFormat>(), Ok(TimestampFormat::AbsoluteWithDate));
        assert_eq!("Delta_Displayed".parse::<TimestampFormat>(), Ok(TimestampFormat::DeltaDisplayed));
        assert!("u".parse::<TimestampFormat>().is_err());
    }

    #[test]
    fn test_parse_precision() {
        assert_eq!("MSEC".parse::<TimestampPrecision>(), Ok(TimestampPrecision::Milliseconds));
        assert_eq!("ns".parse::<TimestampPrecision>().map(|p| p.digits()), Ok(9));
        assert_eq!(
            "ps".parse::<TimestampPrecision>(),
            Err(ConfigError::UnknownTimestampPrecision {
                name: "ps".to_string()
            })
        );
    }
}
