//! Oscillator trim calibration helpers
//!
//! Finding the trim value is an offline job: a sweep firmware steps
//! through trim values and prints a probe line at each one, and a person
//! watching a terminal at the target baud rate notes which values come
//! through readable. The middle of that window goes into the link
//! configuration. Nothing here runs while the link is in use.

use cadence_hal::{BitTimer, OutputPin};

use crate::text::{TextId, TextTable};
use crate::tx::Transmitter;

/// Farthest a sweep moves away from the factory value in either direction
pub const SWEEP_SPAN: u8 = 127;

/// Probe line pieces
pub const PROBE_TEXT: TextTable<'static> = TextTable::new(&["OSCCAL=", ": ", "ABC123\r\n"]);

const PROBE_LABEL: TextId = TextId(0);
const PROBE_SEPARATOR: TextId = TextId(1);
const PROBE_PATTERN: TextId = TextId(2);

/// Trim values to try, in order
///
/// Starts at the factory value and walks up to `0xFF` (at most
/// [`SWEEP_SPAN`] steps), then walks down from one below the factory
/// value towards `0x00`.
#[derive(Debug, Clone)]
pub struct TrimSweep {
    factory: u8,
    step: u8,
    ascending: bool,
}

impl TrimSweep {
    /// Sweep around a factory trim value
    pub const fn new(factory: u8) -> Self {
        Self {
            factory,
            step: 0,
            ascending: true,
        }
    }
}

impl Iterator for TrimSweep {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.ascending {
            if self.step <= SWEEP_SPAN {
                if let Some(value) = self.factory.checked_add(self.step) {
                    self.step += 1;
                    return Some(value);
                }
            }
            self.ascending = false;
            self.step = 1;
        }

        if self.step <= SWEEP_SPAN {
            if let Some(value) = self.factory.checked_sub(self.step) {
                self.step += 1;
                return Some(value);
            }
        }
        None
    }
}

/// Send the probe line for one trim value: `OSCCAL=XX: ABC123\r\n`
///
/// Returns the number of bytes sent.
pub fn write_trim_probe<P, T>(tx: &mut Transmitter<P, T>, trim: u8) -> usize
where
    P: OutputPin,
    T: BitTimer,
{
    tx.write_constant_text(&PROBE_TEXT, PROBE_LABEL)
        + tx.write_hex_u8(trim)
        + tx.write_constant_text(&PROBE_TEXT, PROBE_SEPARATOR)
        + tx.write_constant_text(&PROBE_TEXT, PROBE_PATTERN)
}

/// Middle of a window of readable trim values
pub const fn window_center(lowest: u8, highest: u8) -> u8 {
    let (low, high) = if lowest <= highest {
        (lowest, highest)
    } else {
        (highest, lowest)
    };
    low + (high - low) / 2
}
