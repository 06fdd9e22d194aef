//! Bit timing sources
//!
//! The RP2040 has no prescaled 8-bit timer to tie the bit rate to, so
//! the link paces itself off the 1 MHz embassy time driver instead.
//! Both sources here block the core for the whole wait.

use cadence_hal::{BitTimer, TickSource};
use embassy_time::Instant;

/// Tick rate of the embassy time driver, in Hz
pub const TIMER_HZ: u32 = embassy_time::TICK_HZ as u32;

/// Free-running tick source on the embassy time driver
///
/// The 64-bit driver count is truncated to its low 32 bits; waits never
/// come close to the 71 minute wrap period at 1 MHz.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTicks;

impl TickSource for EmbassyTicks {
    fn now(&self) -> u32 {
        Instant::now().as_ticks() as u32
    }
}

/// Cycle-counted delay for builds without a time driver
///
/// Converts ticks to core cycles with a fixed ratio. The ratio holds only
/// for the system clock it was computed for.
#[derive(Debug, Clone, Copy)]
pub struct SpinDelay {
    cycles_per_tick: u32,
}

impl SpinDelay {
    /// Create a delay for a system clock and tick rate
    ///
    /// A zero tick rate or a tick rate above the system clock falls back
    /// to one cycle per tick.
    pub const fn new(sys_clk_hz: u32, tick_hz: u32) -> Self {
        let cycles_per_tick = if tick_hz == 0 { 1 } else { sys_clk_hz / tick_hz };
        Self {
            cycles_per_tick: if cycles_per_tick == 0 { 1 } else { cycles_per_tick },
        }
    }

    /// Core cycles spent per tick
    pub const fn cycles_per_tick(&self) -> u32 {
        self.cycles_per_tick
    }

    /// Core cycles spent for a wait of `ticks`
    pub const fn cycles_for(&self, ticks: u32) -> u32 {
        ticks.saturating_mul(self.cycles_per_tick)
    }
}

impl BitTimer for SpinDelay {
    fn wait(&mut self, ticks: u32) {
        cortex_m::asm::delay(self.cycles_for(ticks));
    }
}
