//! Software serial port
//!
//! Owns both directions of one link. Every operation takes `&mut self`,
//! so transmit and receive can never overlap on the same port; the link
//! is strictly half-duplex.

use core::convert::Infallible;

use cadence_hal::{BitTimer, InputPin, OscillatorTrim, OutputPin};

use crate::config::{ConfigError, SerialConfig};
use crate::rx::Receiver;
use crate::timing::BitDuration;
use crate::tx::Transmitter;

/// Bit-banged half-duplex serial port
pub struct SoftSerial<TX, RX, T> {
    tx: Transmitter<TX, T>,
    rx: Receiver<RX, T>,
    bit: BitDuration,
}

impl<TX, RX, T> SoftSerial<TX, RX, T>
where
    TX: OutputPin,
    RX: InputPin,
    T: BitTimer + Clone,
{
    /// Bring up the link
    ///
    /// Validates `config`, applies the oscillator trim (once, before any
    /// timing happens), derives the bit duration and drives TX idle-high.
    /// Both directions get a copy of the same timer and the same bit
    /// duration.
    pub fn new<O: OscillatorTrim>(
        tx_pin: TX,
        rx_pin: RX,
        timer: T,
        config: &SerialConfig,
        oscillator: &mut O,
    ) -> Result<Self, ConfigError> {
        let bit = config.validate()?;

        if let Some(trim) = config.osc_trim {
            oscillator.set_trim(trim);
        }

        let rx = Receiver::new(
            rx_pin,
            timer.clone(),
            bit,
            config.sample_offset,
            config.settle_stop_bit,
        );
        let tx = Transmitter::new(tx_pin, timer, bit);

        Ok(Self { tx, rx, bit })
    }

    /// Bit duration shared by both directions
    pub fn bit_duration(&self) -> BitDuration {
        self.bit
    }

    /// Transmit side
    pub fn transmitter(&mut self) -> &mut Transmitter<TX, T> {
        &mut self.tx
    }

    /// Receive side
    pub fn receiver(&mut self) -> &mut Receiver<RX, T> {
        &mut self.rx
    }

    /// Split into independent halves
    ///
    /// The halves no longer exclude each other; the caller takes over
    /// keeping them from running at the same time.
    pub fn split(self) -> (Transmitter<TX, T>, Receiver<RX, T>) {
        (self.tx, self.rx)
    }

    /// Send one byte
    pub fn write_byte(&mut self, byte: u8) {
        self.tx.write_byte(byte);
    }

    /// Receive one byte, blocking until a start bit arrives
    pub fn read_byte(&mut self) -> u8 {
        self.rx.read_byte()
    }

    /// Receive a line into `buffer`; see [`Receiver::read_line`]
    pub fn read_line(&mut self, buffer: &mut [u8]) -> usize {
        self.rx.read_line(buffer)
    }
}

impl<TX, RX, T> core::fmt::Write for SoftSerial<TX, RX, T>
where
    TX: OutputPin,
    RX: InputPin,
    T: BitTimer + Clone,
{
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        core::fmt::Write::write_str(&mut self.tx, s)
    }
}

impl<TX, RX, T> embedded_io::ErrorType for SoftSerial<TX, RX, T> {
    type Error = Infallible;
}

impl<TX, RX, T> embedded_io::Write for SoftSerial<TX, RX, T>
where
    TX: OutputPin,
    RX: InputPin,
    T: BitTimer + Clone,
{
    fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
        for &byte in buf {
            self.tx.write_byte(byte);
        }
        Ok(buf.len())
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        // Bytes are on the wire when write returns
        Ok(())
    }
}

impl<TX, RX, T> embedded_io::Read for SoftSerial<TX, RX, T>
where
    TX: OutputPin,
    RX: InputPin,
    T: BitTimer + Clone,
{
    /// Blocks for one byte; never returns more than one
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
        match buf.first_mut() {
            Some(slot) => {
                *slot = self.rx.read_byte();
                Ok(1)
            }
            None => Ok(0),
        }
    }
}
