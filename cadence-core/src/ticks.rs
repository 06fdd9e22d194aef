//! Interrupt-driven tick counter
//!
//! A periodic timer interrupt calls [`TickCounter::increment`]; the main
//! context reads it through [`TickCounter::now`]. The count is wider than
//! a single load on small cores, so every access goes through a critical
//! section to avoid reading a half-updated value.

use core::cell::Cell;

use cadence_hal::TickSource;
use critical_section::Mutex;

/// Tick counter shared between an interrupt handler and the main context
///
/// Meant to live in a `static`:
///
/// ```
/// use cadence_core::TickCounter;
///
/// static TICKS: TickCounter = TickCounter::new();
///
/// // In the timer interrupt
/// TICKS.increment();
///
/// // In the main loop
/// let start = TICKS.now();
/// assert_eq!(TICKS.elapsed_since(start), 0);
/// ```
pub struct TickCounter {
    count: Mutex<Cell<u32>>,
}

impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}

impl TickCounter {
    /// Create a counter starting at zero
    pub const fn new() -> Self {
        Self {
            count: Mutex::new(Cell::new(0)),
        }
    }

    /// Advance by one tick; wraps at `u32::MAX`
    pub fn increment(&self) {
        critical_section::with(|cs| {
            let count = self.count.borrow(cs);
            count.set(count.get().wrapping_add(1));
        });
    }

    /// Current tick count
    pub fn now(&self) -> u32 {
        critical_section::with(|cs| self.count.borrow(cs).get())
    }

    /// Reset to zero, returning the count before the reset
    pub fn reset(&self) -> u32 {
        critical_section::with(|cs| self.count.borrow(cs).replace(0))
    }

    /// Ticks elapsed since `start`, across a wrap
    pub fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start)
    }
}

impl TickSource for TickCounter {
    fn now(&self) -> u32 {
        TickCounter::now(self)
    }
}
