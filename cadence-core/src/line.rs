//! Line reception
//!
//! Reads bytes until a carriage return or until the buffer is full. There
//! is no line editing and no error path: a line longer than the buffer is
//! cut at capacity.
//!
//! Bytes past capacity are left on the wire. They are neither stored nor
//! drained by the call that hit the limit; the next read picks them up if
//! it starts polling before they have gone by.

use cadence_hal::{BitTimer, InputPin};
use heapless::Vec;

use crate::rx::Receiver;

/// Carriage return, the line terminator
pub const CR: u8 = 13;

/// Line feed
pub const LF: u8 = 10;

/// Space
pub const BLANK: u8 = 32;

impl<P: InputPin, T: BitTimer> Receiver<P, T> {
    /// Receive a line into `buffer`
    ///
    /// Stops when CR arrives (CR is not stored) or when `buffer.len()`
    /// bytes are stored. A CR is always treated as the terminator, never
    /// as data. Returns the number of bytes stored. A zero-length buffer
    /// returns immediately without reading.
    pub fn read_line(&mut self, buffer: &mut [u8]) -> usize {
        let mut count = 0;
        while count < buffer.len() {
            let byte = self.read_byte();
            if byte == CR {
                break;
            }
            buffer[count] = byte;
            count += 1;
        }
        count
    }
}

/// Caller-owned line buffer of capacity `N`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineBuffer<const N: usize> {
    bytes: Vec<u8, N>,
}

impl<const N: usize> LineBuffer<N> {
    /// Create an empty line buffer
    pub const fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Replace the contents with the next line from `rx`, storing at most
    /// `capacity` bytes (clamped to `N`)
    ///
    /// The receiver writes straight into this buffer.
    ///
    /// Returns the number of bytes stored.
    pub fn read_from<P, T>(&mut self, rx: &mut Receiver<P, T>, capacity: usize) -> usize
    where
        P: InputPin,
        T: BitTimer,
    {
        let capacity = capacity.min(N);

        self.bytes.clear();
        // capacity <= N, cannot overflow
        let resized = self.bytes.resize_default(capacity);
        debug_assert!(resized.is_ok());

        let count = rx.read_line(&mut self.bytes);
        self.bytes.truncate(count);
        count
    }

    /// Stored bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Stored bytes as text, if they are valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        core::str::from_utf8(&self.bytes).ok()
    }

    /// Number of stored bytes
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Check if nothing is stored
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Maximum number of bytes this buffer can hold
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Discard the stored bytes
    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}
