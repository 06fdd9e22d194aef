//! Serial applications
//!
//! Both loops own the core for good: every wire operation busy-waits, so
//! nothing else on the executor gets to run.

use defmt::*;

use cadence_core::SoftSerial;
use cadence_hal::{BitTimer, InputPin, OutputPin};

#[cfg(feature = "trim-sweep")]
use cadence_core::calibration::{write_trim_probe, TrimSweep};
#[cfg(feature = "trim-sweep")]
use cadence_hal::OscillatorTrim;
#[cfg(not(feature = "trim-sweep"))]
use cadence_core::{LineBuffer, TextId, TextTable};

#[cfg(not(feature = "trim-sweep"))]
/// Longest echoed line; one slot of the buffer stays unused
const LINE_CAPACITY: usize = 9;

#[cfg(not(feature = "trim-sweep"))]
const BANNER: TextTable<'static> = TextTable::new(&[
    "\r\nCadence soft serial\r\n",
    "Type a line and press Enter\r\n",
]);

#[cfg(not(feature = "trim-sweep"))]
const GREETING: TextId = TextId(0);
#[cfg(not(feature = "trim-sweep"))]
const PROMPT: TextId = TextId(1);

/// Echo received lines back as `<count> <text>\r\n`
#[cfg(not(feature = "trim-sweep"))]
pub fn echo<TX, RX, T>(serial: &mut SoftSerial<TX, RX, T>) -> !
where
    TX: OutputPin,
    RX: InputPin,
    T: BitTimer + Clone,
{
    let tx = serial.transmitter();
    tx.write_constant_text(&BANNER, GREETING);
    tx.write_constant_text(&BANNER, PROMPT);

    let mut line: LineBuffer<10> = LineBuffer::new();
    loop {
        let count = line.read_from(serial.receiver(), LINE_CAPACITY);
        debug!("Received {} bytes: {=[u8]}", count, line.as_bytes());

        let tx = serial.transmitter();
        tx.write_u16(count as u16);
        tx.write_blank();
        tx.write_bytes(line.as_bytes(), count);
        tx.write_newline();
    }
}

/// Print a probe line at every trim value around the factory setting
///
/// Watch the output on a terminal at the configured baud rate and note
/// the lowest and highest trim values that come through readable.
#[cfg(feature = "trim-sweep")]
pub fn trim_sweep<TX, RX, T, O>(serial: &mut SoftSerial<TX, RX, T>, oscillator: &mut O) -> !
where
    TX: OutputPin,
    RX: InputPin,
    T: BitTimer + Clone,
    O: OscillatorTrim,
{
    let factory = oscillator.trim();
    info!("Trim sweep from factory value {=u8:#x}", factory);

    for trim in TrimSweep::new(factory) {
        oscillator.set_trim(trim);
        write_trim_probe(serial.transmitter(), trim);
    }

    oscillator.set_trim(factory);
    info!("Trim sweep done, factory value restored");

    loop {
        cortex_m::asm::wfi();
    }
}
