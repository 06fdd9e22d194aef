//! Link configuration
//!
//! Everything that fixes the wire timing is set once, before the link is
//! built, and never changes afterwards.
//!
//! # Deriving the calibration values
//!
//! 1. Flash a trim sweep (see [`crate::calibration`]) and watch its output
//!    on a terminal at the target baud rate.
//! 2. Note the lowest and highest trim values that print the probe text
//!    cleanly and use the middle of that window as `osc_trim`.
//! 3. With the trim applied, echo a long line through the receiver and
//!    adjust `sample_offset` until every byte comes back intact at both
//!    ends of the window.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::rx::SampleOffset;
use crate::timing::BitDuration;

/// Lowest supported baud rate
pub const MIN_BAUD: u32 = 300;

/// Highest supported baud rate
pub const MAX_BAUD: u32 = 115_200;

/// Default baud rate
pub const DEFAULT_BAUD: u32 = 9600;

/// Default timer frequency: 9.6 MHz core clock through a /8 prescaler
pub const DEFAULT_TIMER_HZ: u32 = 1_200_000;

/// Default per-bit loop overhead in timer ticks
pub const DEFAULT_BIT_OVERHEAD_TICKS: u32 = 1;

/// Trim value found for the reference board at 9600 baud
pub const DEFAULT_OSC_TRIM: u8 = 0x73;

/// Configuration errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Baud rate outside `MIN_BAUD..=MAX_BAUD`
    BaudOutOfRange,
    /// Timer frequency is zero or too high to derive a tick count
    InvalidTimerFrequency,
    /// Bit duration collapses to zero ticks after overhead correction
    BitDurationTooShort,
    /// First sample would not land inside data bit 0
    SampleOffsetOutOfRange,
}

/// Software serial link configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SerialConfig {
    /// Baud rate in bits per second
    pub baud: u32,
    /// Frequency of the timer pacing the bits, in Hz
    pub timer_hz: u32,
    /// Ticks subtracted from each bit for pin write and loop overhead
    pub bit_overhead_ticks: u32,
    /// Oscillator trim applied at start-up; `None` keeps the factory value
    ///
    /// Serialized as an integer, or as the string `"factory"` for `None`.
    #[cfg_attr(feature = "serde", serde(with = "osc_trim_serde"))]
    pub osc_trim: Option<u8>,
    /// Delay from start edge to first data sample
    pub sample_offset: SampleOffset,
    /// Wait into the stop bit before a read returns
    pub settle_stop_bit: bool,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl SerialConfig {
    /// Reference configuration: 9600 baud on a 1.2 MHz timer
    pub const fn new() -> Self {
        Self {
            baud: DEFAULT_BAUD,
            timer_hz: DEFAULT_TIMER_HZ,
            bit_overhead_ticks: DEFAULT_BIT_OVERHEAD_TICKS,
            osc_trim: Some(DEFAULT_OSC_TRIM),
            sample_offset: SampleOffset::OneAndHalfBits,
            settle_stop_bit: true,
        }
    }

    /// Set the baud rate
    pub const fn with_baud(mut self, baud: u32) -> Self {
        self.baud = baud;
        self
    }

    /// Set the timer frequency and per-bit overhead
    pub const fn with_timer(mut self, timer_hz: u32, bit_overhead_ticks: u32) -> Self {
        self.timer_hz = timer_hz;
        self.bit_overhead_ticks = bit_overhead_ticks;
        self
    }

    /// Set the sampling offset
    pub const fn with_sample_offset(mut self, sample_offset: SampleOffset) -> Self {
        self.sample_offset = sample_offset;
        self
    }

    /// Set or clear the oscillator trim
    pub const fn with_osc_trim(mut self, osc_trim: Option<u8>) -> Self {
        self.osc_trim = osc_trim;
        self
    }

    /// Enable or disable waiting into the stop bit after each byte
    pub const fn with_settle_stop_bit(mut self, settle_stop_bit: bool) -> Self {
        self.settle_stop_bit = settle_stop_bit;
        self
    }

    /// Check the configuration and derive the bit duration
    pub fn validate(&self) -> Result<BitDuration, ConfigError> {
        if !(MIN_BAUD..=MAX_BAUD).contains(&self.baud) {
            return Err(ConfigError::BaudOutOfRange);
        }

        let bit = BitDuration::from_baud(self.timer_hz, self.baud, self.bit_overhead_ticks)?;
        self.sample_offset.validate(bit)?;

        Ok(bit)
    }
}

/// Trim value as an integer or `"factory"`
#[cfg(feature = "serde")]
mod osc_trim_serde {
    use core::fmt;

    use serde::de::{self, Deserializer, Unexpected, Visitor};
    use serde::Serializer;

    /// Keeps the oscillator at its factory trim
    pub const FACTORY: &str = "factory";

    pub fn serialize<S: Serializer>(trim: &Option<u8>, serializer: S) -> Result<S::Ok, S::Error> {
        match trim {
            Some(value) => serializer.serialize_u8(*value),
            None => serializer.serialize_str(FACTORY),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u8>, D::Error> {
        deserializer.deserialize_any(TrimVisitor)
    }

    struct TrimVisitor;

    impl<'de> Visitor<'de> for TrimVisitor {
        type Value = Option<u8>;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a trim value 0-255 or \"factory\"")
        }

        fn visit_u64<E: de::Error>(self, value: u64) -> Result<Self::Value, E> {
            u8::try_from(value)
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Unsigned(value), &self))
        }

        fn visit_i64<E: de::Error>(self, value: i64) -> Result<Self::Value, E> {
            u8::try_from(value)
                .map(Some)
                .map_err(|_| E::invalid_value(Unexpected::Signed(value), &self))
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            if value == FACTORY {
                Ok(None)
            } else {
                Err(E::invalid_value(Unexpected::Str(value), &self))
            }
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = SerialConfig::default();
        let bit = config.validate().unwrap();
        assert_eq!(bit.ticks(), 124);
        assert_eq!(config.osc_trim, Some(0x73));
        assert!(config.settle_stop_bit);
    }

    #[test]
    fn test_baud_range() {
        let config = SerialConfig::new().with_baud(299);
        assert_eq!(config.validate(), Err(ConfigError::BaudOutOfRange));

        let config = SerialConfig::new().with_baud(MAX_BAUD + 1);
        assert_eq!(config.validate(), Err(ConfigError::BaudOutOfRange));

        let config = SerialConfig::new().with_baud(1200);
        assert_eq!(config.validate().unwrap().ticks(), 999);
    }

    #[test]
    fn test_timer_too_slow_for_baud() {
        // 115200 baud on a 100 kHz timer rounds to one tick, minus overhead
        let config = SerialConfig::new()
            .with_baud(115_200)
            .with_timer(100_000, 1);
        assert_eq!(config.validate(), Err(ConfigError::BitDurationTooShort));
    }

    #[test]
    fn test_zero_timer_frequency() {
        let config = SerialConfig::new().with_timer(0, 0);
        assert_eq!(config.validate(), Err(ConfigError::InvalidTimerFrequency));
    }

    #[test]
    fn test_bad_sample_offset() {
        let config = SerialConfig::new().with_sample_offset(SampleOffset::Ticks(10));
        assert_eq!(config.validate(), Err(ConfigError::SampleOffsetOutOfRange));

        let config = SerialConfig::new()
            .with_sample_offset(SampleOffset::Compensated { overhead_ticks: 12 });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builders_are_const() {
        const CONFIG: SerialConfig = SerialConfig::new()
            .with_baud(4800)
            .with_osc_trim(None)
            .with_settle_stop_bit(false);

        assert_eq!(CONFIG.baud, 4800);
        assert_eq!(CONFIG.osc_trim, None);
        assert!(!CONFIG.settle_stop_bit);
        assert_eq!(CONFIG.validate().unwrap().ticks(), 249);
    }

    #[test]
    fn test_microsecond_timer() {
        // 1 MHz tick source, no overhead correction
        let config = SerialConfig::new().with_timer(1_000_000, 0);
        assert_eq!(config.validate().unwrap().ticks(), 104);
    }
}
