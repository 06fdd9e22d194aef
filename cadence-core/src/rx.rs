//! Receiver
//!
//! Busy-polls the RX line for a start bit, then samples each data bit
//! near its center. The whole frame is timed off the detected edge, so
//! the sampling offset decides how much clock error the link tolerates.
//!
//! ```text
//!          edge
//!           ↓
//!  ‾‾‾‾‾‾‾‾‾|_____|‾‾‾‾‾|_____|  ...  |‾‾‾‾‾‾‾‾
//!           start   b0     b1           stop
//!           |-- offset --|
//!                        ↑ sample b0, then one bit-time per sample
//! ```

use cadence_hal::{BitTimer, InputPin};

use crate::config::ConfigError;
use crate::frame::DATA_BITS;
use crate::timing::BitDuration;

/// Delay from the detected start edge to the first data sample
///
/// The delay must land the first sample in the middle of data bit 0, not
/// the start bit. The right value depends on how long the poll loop takes
/// to notice the edge and how long each sample takes on the target, so it
/// is tuned empirically per clock speed and never carried over blindly
/// between targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SampleOffset {
    /// One and a half bit-times
    #[default]
    OneAndHalfBits,
    /// One and a half bit-times minus a fixed edge-detection overhead
    Compensated {
        /// Ticks spent between the edge and the end of the poll loop
        overhead_ticks: u32,
    },
    /// Fixed tick count measured on the target
    Ticks(u32),
}

impl SampleOffset {
    /// Offset in ticks for a given bit duration
    pub const fn ticks(self, bit: BitDuration) -> u32 {
        let one_and_half = bit.ticks() + bit.half();
        match self {
            SampleOffset::OneAndHalfBits => one_and_half,
            SampleOffset::Compensated { overhead_ticks } => {
                one_and_half.saturating_sub(overhead_ticks)
            }
            SampleOffset::Ticks(ticks) => ticks,
        }
    }

    /// Check that the first sample falls inside data bit 0
    pub fn validate(self, bit: BitDuration) -> Result<u32, ConfigError> {
        let ticks = self.ticks(bit);
        if ticks > bit.ticks() && ticks < bit.ticks().saturating_mul(2) {
            Ok(ticks)
        } else {
            Err(ConfigError::SampleOffsetOutOfRange)
        }
    }
}

/// Bit-banged serial receiver
pub struct Receiver<P, T> {
    pin: P,
    timer: T,
    bit: BitDuration,
    offset_ticks: u32,
    settle_stop_bit: bool,
}

impl<P: InputPin, T: BitTimer> Receiver<P, T> {
    /// Create a receiver
    ///
    /// With `settle_stop_bit` set, each read returns only after moving
    /// into the stop bit, so the next call cannot mistake a low data bit
    /// 7 for a start bit. Clearing it saves a bit-time per byte when the
    /// caller spends at least that long before the next read.
    pub fn new(
        pin: P,
        timer: T,
        bit: BitDuration,
        offset: SampleOffset,
        settle_stop_bit: bool,
    ) -> Self {
        Self {
            pin,
            timer,
            bit,
            offset_ticks: offset.ticks(bit),
            settle_stop_bit,
        }
    }

    /// Bit duration used for sampling
    pub fn bit_duration(&self) -> BitDuration {
        self.bit
    }

    /// Ticks between start edge and first sample
    pub fn offset_ticks(&self) -> u32 {
        self.offset_ticks
    }

    /// Release the pin and timer
    pub fn free(self) -> (P, T) {
        (self.pin, self.timer)
    }

    /// Block until a high-to-low transition on RX
    ///
    /// A line that is already low (mid-frame or a break) is waited out
    /// first. Never times out.
    pub fn wait_for_start_bit(&mut self) {
        while self.pin.is_low() {}
        while self.pin.is_high() {}
    }

    /// Receive one byte
    ///
    /// Blocks until a start bit arrives. Framing is not checked: a
    /// clock mismatch yields a wrong byte, never an error.
    pub fn read_byte(&mut self) -> u8 {
        self.wait_for_start_bit();
        self.timer.wait(self.offset_ticks);

        let mut data = 0u8;
        for i in 0..DATA_BITS {
            if self.pin.is_high() {
                data |= 1 << i;
            }
            // The wait after the last data bit is folded into the stop bit
            if i + 1 < DATA_BITS {
                self.timer.wait(self.bit.ticks());
            }
        }

        if self.settle_stop_bit {
            self.timer.wait(self.bit.ticks());
        }

        data
    }
}
