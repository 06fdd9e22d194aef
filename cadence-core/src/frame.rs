//! 8N1 frame layout
//!
//! ```text
//!  idle  start  b0  b1  b2  b3  b4  b5  b6  b7  stop  idle
//!  ‾‾‾‾‾|_____|‾‾‾|___|___|___|___|___|‾‾‾|___|‾‾‾‾‾‾‾‾‾‾‾   0x41
//! ```
//!
//! One start bit (low), eight data bits least significant first, one stop
//! bit (high). No parity. The line idles high between frames.

/// Number of bit-times in one frame
pub const FRAME_BITS: usize = 10;

/// Number of data bits in one frame
pub const DATA_BITS: usize = 8;

/// One byte on the wire
///
/// Frames are built per byte and thrown away; nothing keeps them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frame {
    data: u8,
}

impl Frame {
    /// Frame a data byte
    pub const fn new(data: u8) -> Self {
        Self { data }
    }

    /// The framed data byte
    pub const fn data(&self) -> u8 {
        self.data
    }

    /// Line level during bit-time `index` (0 = start bit, 9 = stop bit)
    ///
    /// Indices past the stop bit report the idle level.
    pub const fn level(&self, index: usize) -> bool {
        match index {
            0 => false,
            1..=DATA_BITS => (self.data >> (index - 1)) & 1 == 1,
            _ => true,
        }
    }

    /// Line levels for all ten bit-times, in transmit order
    pub fn levels(&self) -> impl Iterator<Item = bool> {
        let frame = *self;
        (0..FRAME_BITS).map(move |index| frame.level(index))
    }
}

impl From<u8> for Frame {
    fn from(data: u8) -> Self {
        Self::new(data)
    }
}
