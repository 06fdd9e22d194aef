//! Serial line GPIO setup
//!
//! TX is a push-pull output that starts high so the far end never sees a
//! spurious start bit at power-up. RX is an input with the internal
//! pull-up enabled so a disconnected line reads idle.

use cadence_hal::{EhInput, EhOutput};
use embassy_rp::gpio::{Input, Level, Output, Pin, Pull};
use embassy_rp::Peri;

use crate::pins::PinError;

/// Maximum number of GPIO pins on RP2040
pub const GPIO_COUNT: u8 = 30;

/// TX line driver
pub type TxLine<'d> = EhOutput<Output<'d>>;

/// RX line reader
pub type RxLine<'d> = EhInput<Input<'d>>;

/// Configure a pin as the TX line, idle-high
pub fn tx_pin<'d>(pin: Peri<'d, impl Pin>) -> TxLine<'d> {
    EhOutput::new(Output::new(pin, Level::High))
}

/// Configure a pin as the RX line, pulled up
pub fn rx_pin<'d>(pin: Peri<'d, impl Pin>) -> RxLine<'d> {
    EhInput(Input::new(pin, Pull::Up))
}

/// Check a TX/RX pin assignment before any pin is taken
///
/// Pin names in `serial.toml` are parsed by the firmware build script;
/// this repeats the range and overlap checks on the numbers it produced.
pub fn check_serial_pins(tx: u8, rx: u8) -> Result<(), PinError> {
    if tx >= GPIO_COUNT || rx >= GPIO_COUNT {
        return Err(PinError::InvalidPin);
    }
    if tx == rx {
        return Err(PinError::AlreadyTaken);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_serial_pins() {
        assert!(check_serial_pins(4, 5).is_ok());
        assert!(matches!(check_serial_pins(4, 4), Err(PinError::AlreadyTaken)));
        assert!(matches!(check_serial_pins(30, 5), Err(PinError::InvalidPin)));
    }
}
