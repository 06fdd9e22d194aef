//! Oscillator calibration
//!
//! Chips running from an internal RC oscillator expose a trim register
//! (OSCCAL on AVR) that shifts the core frequency by a fraction of a
//! percent per step. A software serial link needs the clock within about
//! 2% of nominal, so the trim value is found offline and applied once at
//! start-up. It is never changed while the link is running.

/// Oscillator trim register
pub trait OscillatorTrim {
    /// Read the current trim value
    fn trim(&self) -> u8;

    /// Write a new trim value
    fn set_trim(&mut self, value: u8);
}

/// Clock source without a trim register
///
/// Crystal-driven targets accept any trim value and ignore it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FixedClock {
    requested: u8,
}

impl FixedClock {
    /// Create a fixed clock
    pub const fn new() -> Self {
        Self { requested: 0 }
    }
}

impl OscillatorTrim for FixedClock {
    fn trim(&self) -> u8 {
        self.requested
    }

    fn set_trim(&mut self, value: u8) {
        self.requested = value;
    }
}
