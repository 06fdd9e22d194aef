//! Bit timing
//!
//! One bit-time is expressed in ticks of whatever timer paces the link.
//! It is derived once from the nominal timer frequency and the baud rate,
//! on a clock already trimmed by the calibration constant, and stays fixed
//! for the session.
//!
//! Two pacing strategies are provided:
//!
//! - [`SpinTimer`]: counted busy loop, calibrated per target
//! - [`CounterTimer`]: polls a free-running counter until enough ticks
//!   have elapsed

use core::num::NonZeroU32;

use cadence_hal::{BitTimer, TickSource};

use crate::config::ConfigError;
use crate::frame::FRAME_BITS;

/// Duration of one serial bit in timer ticks
///
/// Always non-zero. Transmitter and receiver of one link must share the
/// same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitDuration(NonZeroU32);

impl BitDuration {
    /// Create a bit duration from a raw tick count
    ///
    /// Returns `None` for zero.
    pub const fn new(ticks: u32) -> Option<Self> {
        match NonZeroU32::new(ticks) {
            Some(ticks) => Some(Self(ticks)),
            None => None,
        }
    }

    /// Derive the bit duration for `baud` on a timer running at `timer_hz`
    ///
    /// The nominal tick count is rounded to the nearest tick, then
    /// `overhead_ticks` is subtracted to account for the per-bit cost of
    /// the pin write and loop around each wait.
    pub fn from_baud(timer_hz: u32, baud: u32, overhead_ticks: u32) -> Result<Self, ConfigError> {
        if timer_hz == 0 {
            return Err(ConfigError::InvalidTimerFrequency);
        }
        if baud == 0 {
            return Err(ConfigError::BaudOutOfRange);
        }

        let nominal = (timer_hz as u64 + baud as u64 / 2) / baud as u64;
        let nominal = u32::try_from(nominal).map_err(|_| ConfigError::InvalidTimerFrequency)?;

        nominal
            .checked_sub(overhead_ticks)
            .and_then(Self::new)
            .ok_or(ConfigError::BitDurationTooShort)
    }

    /// Tick count of one bit
    pub const fn ticks(self) -> u32 {
        self.0.get()
    }

    /// Tick count of half a bit (rounded down)
    pub const fn half(self) -> u32 {
        self.0.get() / 2
    }

    /// Tick count of a whole 10-bit frame
    pub const fn frame_ticks(self) -> u32 {
        self.0.get().saturating_mul(FRAME_BITS as u32)
    }

    /// Baud rate this duration actually produces on a `timer_hz` timer
    pub const fn effective_baud(self, timer_hz: u32) -> u32 {
        let ticks = self.0.get();
        timer_hz.saturating_add(ticks / 2) / ticks
    }

    /// Deviation from `baud` in parts per thousand
    ///
    /// Positive means the link runs fast. Asynchronous serial tolerates
    /// roughly ±20‰ in total between both ends.
    pub fn error_per_mille(self, timer_hz: u32, baud: u32) -> i32 {
        if baud == 0 {
            return 0;
        }
        let actual = timer_hz as i64 * 1000 / self.0.get() as i64;
        let target = baud as i64 * 1000;
        ((actual - target) * 1000 / target) as i32
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for BitDuration {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "{} ticks/bit", self.ticks());
    }
}

/// Busy-wait timer
///
/// Spins `loops_per_tick` iterations per tick. The loop count is a
/// per-target constant measured offline, e.g. by toggling a pin with a
/// known tick count and timing it on a logic analyzer. It only holds for
/// the clock speed and trim it was measured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SpinTimer {
    loops_per_tick: u32,
}

impl SpinTimer {
    /// Create a spin timer
    pub const fn new(loops_per_tick: u32) -> Self {
        Self { loops_per_tick }
    }

    /// Loop iterations spent for a wait of `ticks`
    pub const fn loops_for(&self, ticks: u32) -> u32 {
        ticks.saturating_mul(self.loops_per_tick)
    }
}

impl BitTimer for SpinTimer {
    fn wait(&mut self, ticks: u32) {
        for _ in 0..self.loops_for(ticks) {
            core::hint::spin_loop();
        }
    }
}

/// Counter-polling timer
///
/// Reads a free-running counter and spins until `ticks` have elapsed.
/// Waits longer than half the counter period are split into chunks so a
/// narrow counter never wraps past the start point unnoticed.
#[derive(Debug, Clone)]
pub struct CounterTimer<S> {
    source: S,
}

impl<S: TickSource> CounterTimer<S> {
    /// Create a timer over a tick source
    pub const fn new(source: S) -> Self {
        Self { source }
    }

    /// The underlying tick source
    pub fn source(&self) -> &S {
        &self.source
    }

    /// Largest wait done against a single start value
    fn max_chunk(&self) -> u32 {
        (self.source.mask() >> 1).max(1)
    }
}

impl<S: TickSource> BitTimer for CounterTimer<S> {
    fn wait(&mut self, ticks: u32) {
        let max_chunk = self.max_chunk();
        let mut remaining = ticks;

        while remaining > 0 {
            let chunk = remaining.min(max_chunk);
            let start = self.source.now();
            while self.source.elapsed_since(start) < chunk {
                core::hint::spin_loop();
            }
            remaining -= chunk;
        }
    }
}
