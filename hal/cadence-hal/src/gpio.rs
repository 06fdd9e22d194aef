//! GPIO line abstractions
//!
//! The serial link sees its pins as an abstract set-level / read-level
//! pair. Register binding lives in the chip crates.

use core::convert::Infallible;

/// Digital output pin (the TX line)
///
/// Implementations should handle the actual hardware register manipulation
/// for the specific chip.
pub trait OutputPin {
    /// Drive the line high (logic 1, idle/mark)
    fn set_high(&mut self);

    /// Drive the line low (logic 0, space)
    fn set_low(&mut self);

    /// Drive the line to a specific level
    fn set_state(&mut self, high: bool) {
        if high {
            self.set_high();
        } else {
            self.set_low();
        }
    }

    /// Check if the line is currently driven high
    fn is_set_high(&self) -> bool;
}

/// Digital input pin (the RX line)
///
/// Implementations should handle the actual hardware register reading
/// for the specific chip. RX is expected to have a pull-up so a
/// disconnected line reads idle-high.
///
/// Reads take `&mut self` to match embedded-hal 1.0, where sampling a
/// pin may touch driver state.
pub trait InputPin {
    /// Check if the line reads high (logic 1)
    fn is_high(&mut self) -> bool;

    /// Check if the line reads low (logic 0)
    fn is_low(&mut self) -> bool {
        !self.is_high()
    }
}

/// Output adapter for embedded-hal 1.0 digital pins
///
/// Wraps any `embedded_hal::digital::OutputPin` whose error type is
/// [`Infallible`], which covers the GPIO drivers of most chip HALs.
/// The driven level is tracked here so `is_set_high` stays `&self`.
#[derive(Debug)]
pub struct EhOutput<P> {
    pin: P,
    high: bool,
}

impl<P> EhOutput<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    /// Wrap a pin and drive it to the idle (high) level
    pub fn new(pin: P) -> Self {
        let mut out = Self { pin, high: false };
        out.set_high();
        out
    }

    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.pin
    }
}

impl<P> OutputPin for EhOutput<P>
where
    P: embedded_hal::digital::OutputPin<Error = Infallible>,
{
    fn set_high(&mut self) {
        let Ok(()) = self.pin.set_high();
        self.high = true;
    }

    fn set_low(&mut self) {
        let Ok(()) = self.pin.set_low();
        self.high = false;
    }

    fn is_set_high(&self) -> bool {
        self.high
    }
}

/// Input adapter for embedded-hal 1.0 digital pins
#[derive(Debug)]
pub struct EhInput<P>(pub P);

impl<P> EhInput<P> {
    /// Release the wrapped pin
    pub fn into_inner(self) -> P {
        self.0
    }
}

impl<P> InputPin for EhInput<P>
where
    P: embedded_hal::digital::InputPin<Error = Infallible>,
{
    fn is_high(&mut self) -> bool {
        let Ok(high) = self.0.is_high();
        high
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal::digital::ErrorType;

    /// Mock embedded-hal pin for testing
    struct MockPin {
        high: bool,
    }

    impl ErrorType for MockPin {
        type Error = Infallible;
    }

    impl embedded_hal::digital::OutputPin for MockPin {
        fn set_low(&mut self) -> Result<(), Infallible> {
            self.high = false;
            Ok(())
        }

        fn set_high(&mut self) -> Result<(), Infallible> {
            self.high = true;
            Ok(())
        }
    }

    impl embedded_hal::digital::InputPin for MockPin {
        fn is_high(&mut self) -> Result<bool, Infallible> {
            Ok(self.high)
        }

        fn is_low(&mut self) -> Result<bool, Infallible> {
            Ok(!self.high)
        }
    }

    #[test]
    fn test_output_adapter_starts_idle_high() {
        let out = EhOutput::new(MockPin { high: false });
        assert!(out.is_set_high());
        assert!(out.into_inner().high);
    }

    #[test]
    fn test_output_adapter_set_state() {
        let mut out = EhOutput::new(MockPin { high: false });

        out.set_state(false);
        assert!(!out.is_set_high());

        out.set_state(true);
        assert!(out.is_set_high());
    }

    #[test]
    fn test_input_adapter() {
        let mut input = EhInput(MockPin { high: true });
        assert!(input.is_high());
        assert!(!input.is_low());

        input.0.high = false;
        assert!(input.is_low());
    }
}
