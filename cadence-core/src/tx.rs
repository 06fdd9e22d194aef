//! Transmitter
//!
//! Drives the TX line through one [`Frame`] per byte, holding each level
//! for one bit-time. Transmission cannot fail once the pin exists.

use cadence_hal::{BitTimer, OutputPin};

use crate::frame::Frame;
use crate::line::{BLANK, CR, LF};
use crate::number::{format_hex_u8, format_i16, format_u16};
use crate::text::{TextId, TextTable};
use crate::timing::BitDuration;

/// String terminator; never transmitted
pub const NUL: u8 = 0;

/// Bit-banged serial transmitter
pub struct Transmitter<P, T> {
    pin: P,
    timer: T,
    bit: BitDuration,
}

impl<P: OutputPin, T: BitTimer> Transmitter<P, T> {
    /// Create a transmitter and put the line into its idle (high) state
    pub fn new(pin: P, timer: T, bit: BitDuration) -> Self {
        let mut tx = Self { pin, timer, bit };
        tx.pin.set_high();
        tx
    }

    /// Bit duration used for every level
    pub fn bit_duration(&self) -> BitDuration {
        self.bit
    }

    /// Release the pin and timer
    pub fn free(self) -> (P, T) {
        (self.pin, self.timer)
    }

    /// Send one byte as start bit, eight data bits LSB first, stop bit
    ///
    /// Returns after the stop bit with the line idle-high.
    pub fn write_byte(&mut self, byte: u8) {
        let ticks = self.bit.ticks();
        for level in Frame::new(byte).levels() {
            self.pin.set_state(level);
            self.timer.wait(ticks);
        }
    }

    /// Send bytes from `buffer` until a NUL byte, the end of the buffer,
    /// or `max_len` bytes sent, whichever comes first
    ///
    /// `max_len` is an exclusive bound: at most `max_len` bytes go out.
    /// Returns the number of bytes sent. The terminator is never sent.
    pub fn write_bytes(&mut self, buffer: &[u8], max_len: usize) -> usize {
        let mut count = 0;
        for &byte in buffer.iter().take(max_len) {
            if byte == NUL {
                break;
            }
            self.write_byte(byte);
            count += 1;
        }
        count
    }

    /// Send a string up to its end or an embedded NUL
    ///
    /// Returns the number of bytes sent. Formatting through
    /// [`core::fmt::Write`] sends every byte instead, NUL included.
    pub fn write_text(&mut self, text: &str) -> usize {
        self.write_bytes(text.as_bytes(), text.len())
    }

    /// Send entry `id` of a constant text table byte by byte
    ///
    /// Unknown ids send nothing. Returns the number of bytes sent.
    pub fn write_constant_text(&mut self, table: &TextTable<'_>, id: TextId) -> usize {
        let Some(text) = table.get(id) else {
            return 0;
        };
        for &byte in text {
            self.write_byte(byte);
        }
        text.len()
    }

    /// Send a signed value in decimal
    pub fn write_i16(&mut self, value: i16) -> usize {
        self.write_text(&format_i16(value))
    }

    /// Send an unsigned value in decimal
    pub fn write_u16(&mut self, value: u16) -> usize {
        self.write_text(&format_u16(value))
    }

    /// Send a byte as two upper-case hex digits
    pub fn write_hex_u8(&mut self, value: u8) -> usize {
        let digits = format_hex_u8(value);
        self.write_bytes(&digits, digits.len())
    }

    /// Send CR LF
    pub fn write_newline(&mut self) {
        self.write_byte(CR);
        self.write_byte(LF);
    }

    /// Send a single space
    pub fn write_blank(&mut self) {
        self.write_byte(BLANK);
    }
}

impl<P: OutputPin, T: BitTimer> core::fmt::Write for Transmitter<P, T> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        for &byte in s.as_bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{RecordingPin, SimClock, SimTimer};

    const BIT: u32 = 124;

    fn transmitter(clock: &SimClock) -> Transmitter<RecordingPin, SimTimer> {
        Transmitter::new(
            RecordingPin::new(clock),
            clock.timer(),
            BitDuration::new(BIT).unwrap(),
        )
    }

    /// Decode the bytes of a back-to-back recording, one frame per ten
    /// recorded levels after the idle edge
    fn sent_bytes(tx: &Transmitter<RecordingPin, SimTimer>) -> Vec<u8> {
        let edges = &tx.pin.waveform().edges()[1..];
        edges
            .chunks(10)
            .map(|frame| {
                frame[1..9]
                    .iter()
                    .enumerate()
                    .fold(0u8, |acc, (i, (_, level))| acc | ((*level as u8) << i))
            })
            .collect()
    }

    #[test]
    fn test_idle_high_after_new() {
        let clock = SimClock::new();
        let tx = transmitter(&clock);
        assert!(tx.pin.is_set_high());
        assert_eq!(tx.pin.waveform().edges(), &[(0, true)]);
    }

    #[test]
    fn test_write_byte_0x41_waveform() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);
        clock.advance(1000);

        tx.write_byte(0x41);

        let expected_levels = [
            false, // start
            true, false, false, false, false, false, true, false, // 0x41 LSB first
            true,  // stop
        ];
        let edges = &tx.pin.waveform().edges()[1..];
        assert_eq!(edges.len(), 10);
        for (i, (&(at, level), &want)) in edges.iter().zip(expected_levels.iter()).enumerate() {
            assert_eq!(at, 1000 + i as u32 * BIT, "bit {} timing", i);
            assert_eq!(level, want, "bit {} level", i);
        }

        // Stop bit held for a full bit-time, line left high
        assert_eq!(clock.now(), 1000 + 10 * BIT);
        assert!(tx.pin.is_set_high());
    }

    #[test]
    fn test_write_bytes_stops_at_terminator() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        let sent = tx.write_bytes(b"HELLO\0WORLD", 32);
        assert_eq!(sent, 5);
        assert_eq!(sent_bytes(&tx), b"HELLO");
        assert_eq!(clock.now(), 5 * 10 * BIT);
    }

    #[test]
    fn test_write_bytes_max_len_is_exclusive() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        assert_eq!(tx.write_bytes(b"ABCDEF\0", 3), 3);
        assert_eq!(sent_bytes(&tx), b"ABC");
    }

    #[test]
    fn test_write_bytes_zero_max_len() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        assert_eq!(tx.write_bytes(b"ABC", 0), 0);
        assert_eq!(clock.now(), 0);
    }

    #[test]
    fn test_write_bytes_unterminated_buffer() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        assert_eq!(tx.write_bytes(b"OK", 10), 2);
        assert_eq!(sent_bytes(&tx), b"OK");
    }

    #[test]
    fn test_write_constant_text() {
        const TABLE: TextTable<'static> = TextTable::new(&["hi\r\n", "> "]);
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        assert_eq!(tx.write_constant_text(&TABLE, TextId(1)), 2);
        assert_eq!(tx.write_constant_text(&TABLE, TextId(9)), 0);
        assert_eq!(sent_bytes(&tx), b"> ");
    }

    #[test]
    fn test_write_numbers() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        assert_eq!(tx.write_i16(-32768), 6);
        tx.write_blank();
        assert_eq!(tx.write_u16(42), 2);
        tx.write_blank();
        assert_eq!(tx.write_hex_u8(0x7F), 2);
        tx.write_newline();

        assert_eq!(sent_bytes(&tx), b"-32768 42 7F\r\n");
    }

    #[test]
    fn test_write_text_stops_at_terminator() {
        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        assert_eq!(tx.write_text("AB\0CD"), 2);
        assert_eq!(sent_bytes(&tx), b"AB");
    }

    #[test]
    fn test_fmt_write_sends_every_byte() {
        use core::fmt::Write;

        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        tx.write_str("A\0B").unwrap();
        assert_eq!(sent_bytes(&tx), b"A\0B");
    }

    #[test]
    fn test_fmt_write() {
        use core::fmt::Write;

        let clock = SimClock::new();
        let mut tx = transmitter(&clock);

        write!(tx, "t={}", 15).unwrap();
        assert_eq!(sent_bytes(&tx), b"t=15");
    }
}
