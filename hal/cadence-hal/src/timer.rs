//! Timing abstractions
//!
//! Bit pacing is the only synchronization mechanism a software serial
//! link has. Both directions of one link must use the same timer and the
//! same tick count per bit, otherwise the ends drift apart within a frame.

/// Blocking delay primitive
///
/// `wait` blocks the calling context for approximately `ticks` timer
/// ticks. There is no cancellation and no error return: clock drift only
/// shows up as wrongly decoded bytes downstream.
pub trait BitTimer {
    /// Block for `ticks` timer ticks
    fn wait(&mut self, ticks: u32);
}

impl<T: BitTimer + ?Sized> BitTimer for &mut T {
    fn wait(&mut self, ticks: u32) {
        (**self).wait(ticks)
    }
}

/// Free-running hardware counter
///
/// The counter counts up and wraps. Counters narrower than 32 bits report
/// their width through [`TickSource::mask`] so elapsed time can be computed
/// across a wrap.
pub trait TickSource {
    /// Current counter value
    ///
    /// Must be a single untorn read. Counters updated from an interrupt
    /// have to be read inside a critical section.
    fn now(&self) -> u32;

    /// Bit mask of the counter width (`0xFF` for an 8-bit timer)
    fn mask(&self) -> u32 {
        u32::MAX
    }

    /// Ticks elapsed since `start`, modulo the counter width
    fn elapsed_since(&self, start: u32) -> u32 {
        self.now().wrapping_sub(start) & self.mask()
    }
}

impl<S: TickSource + ?Sized> TickSource for &S {
    fn now(&self) -> u32 {
        (**self).now()
    }

    fn mask(&self) -> u32 {
        (**self).mask()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;

    struct Counter8 {
        value: Cell<u32>,
    }

    impl TickSource for Counter8 {
        fn now(&self) -> u32 {
            self.value.get()
        }

        fn mask(&self) -> u32 {
            0xFF
        }
    }

    #[test]
    fn test_elapsed_across_wrap() {
        let counter = Counter8 {
            value: Cell::new(0x03),
        };
        // Started at 0xFA, wrapped to 0x03: 9 ticks
        assert_eq!(counter.elapsed_since(0xFA), 9);
    }

    #[test]
    fn test_elapsed_full_width() {
        struct Counter32(u32);
        impl TickSource for Counter32 {
            fn now(&self) -> u32 {
                self.0
            }
        }

        let counter = Counter32(5);
        assert_eq!(counter.elapsed_since(u32::MAX - 4), 10);
    }
}
