//! Host-side line simulation for tests
//!
//! A shared virtual clock drives a timer, a TX pin that records every
//! level it is driven to, and an RX pin that plays a recorded waveform
//! back. Each RX read costs `poll_ticks` of virtual time so busy-poll
//! loops terminate and loop overhead shows up the way it does on
//! hardware.

use std::cell::Cell;
use std::rc::Rc;
use std::vec::Vec;

use cadence_hal::{BitTimer, InputPin, OutputPin, TickSource};

use crate::timing::BitDuration;
use crate::tx::Transmitter;

/// Virtual time in ticks
#[derive(Debug, Clone, Default)]
pub struct SimClock(Rc<Cell<u32>>);

impl SimClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now(&self) -> u32 {
        self.0.get()
    }

    pub fn advance(&self, ticks: u32) {
        self.0.set(self.0.get() + ticks);
    }

    pub fn timer(&self) -> SimTimer {
        SimTimer {
            clock: self.clone(),
        }
    }

    /// Free-running counter; every read costs one tick
    pub fn counter(&self, mask: u32) -> SimCounter {
        SimCounter {
            clock: self.clone(),
            mask,
        }
    }
}

/// Timer that advances the virtual clock by exactly the requested ticks
#[derive(Debug, Clone)]
pub struct SimTimer {
    clock: SimClock,
}

impl BitTimer for SimTimer {
    fn wait(&mut self, ticks: u32) {
        self.clock.advance(ticks);
    }
}

#[derive(Debug, Clone)]
pub struct SimCounter {
    clock: SimClock,
    mask: u32,
}

impl TickSource for SimCounter {
    fn now(&self) -> u32 {
        let now = self.clock.now();
        self.clock.advance(1);
        now & self.mask
    }

    fn mask(&self) -> u32 {
        self.mask
    }
}

/// Recorded line levels as `(time, level)` transitions
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Waveform {
    edges: Vec<(u32, bool)>,
}

impl Waveform {
    pub fn from_edges(edges: Vec<(u32, bool)>) -> Self {
        Self { edges }
    }

    /// Level at `time`; idle-high before the first edge
    pub fn level_at(&self, time: u32) -> bool {
        self.edges
            .iter()
            .rev()
            .find(|(at, _)| *at <= time)
            .map(|(_, level)| *level)
            .unwrap_or(true)
    }

    pub fn edges(&self) -> &[(u32, bool)] {
        &self.edges
    }
}

/// TX pin recording every level it is driven to
#[derive(Debug)]
pub struct RecordingPin {
    clock: SimClock,
    high: bool,
    waveform: Waveform,
}

impl RecordingPin {
    pub fn new(clock: &SimClock) -> Self {
        Self {
            clock: clock.clone(),
            high: true,
            waveform: Waveform::default(),
        }
    }

    pub fn waveform(&self) -> &Waveform {
        &self.waveform
    }

    pub fn into_waveform(self) -> Waveform {
        self.waveform
    }
}

impl OutputPin for RecordingPin {
    fn set_high(&mut self) {
        self.high = true;
        self.waveform.edges.push((self.clock.now(), true));
    }

    fn set_low(&mut self) {
        self.high = false;
        self.waveform.edges.push((self.clock.now(), false));
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// RX pin replaying a waveform against the virtual clock
#[derive(Debug)]
pub struct PlaybackPin {
    clock: SimClock,
    waveform: Waveform,
    poll_ticks: u32,
}

impl PlaybackPin {
    pub fn new(clock: &SimClock, waveform: Waveform, poll_ticks: u32) -> Self {
        Self {
            clock: clock.clone(),
            waveform,
            poll_ticks,
        }
    }
}

impl InputPin for PlaybackPin {
    fn is_high(&mut self) -> bool {
        let level = self.waveform.level_at(self.clock.now());
        self.clock.advance(self.poll_ticks);
        level
    }
}

/// Transmit `bytes` back to back after `lead` idle ticks and return the
/// resulting line waveform
pub fn transmit(bytes: &[u8], bit: BitDuration, lead: u32) -> Waveform {
    let clock = SimClock::new();
    let mut tx = Transmitter::new(RecordingPin::new(&clock), clock.timer(), bit);
    clock.advance(lead);
    for &byte in bytes {
        tx.write_byte(byte);
    }
    let (pin, _timer) = tx.free();
    pin.into_waveform()
}
