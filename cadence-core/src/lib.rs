//! Board-agnostic core logic for the Cadence software serial link
//!
//! A half-duplex asynchronous serial port built from two GPIO lines and a
//! delay, with no UART peripheral involved:
//!
//! - Bit timing derived from a calibrated clock ([`timing`])
//! - 8N1 framing ([`frame`]), transmitter ([`tx`]) and receiver ([`rx`])
//! - Line reception into caller-owned buffers ([`line`])
//! - Decimal/hex formatting and constant text tables for output
//! - Interrupt tick counter and oscillator trim helpers
//!
//! Everything blocks. A receive call that never sees a start bit never
//! returns; there is no timeout anywhere on the wire path.

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod calibration;
pub mod config;
pub mod frame;
pub mod line;
pub mod number;
pub mod rx;
pub mod serial;
pub mod text;
pub mod ticks;
pub mod timing;
pub mod tx;

#[cfg(test)]
mod sim;

pub use config::{ConfigError, SerialConfig};
pub use frame::Frame;
pub use line::LineBuffer;
pub use rx::{Receiver, SampleOffset};
pub use serial::SoftSerial;
pub use text::{TextId, TextTable};
pub use ticks::TickCounter;
pub use timing::{BitDuration, CounterTimer, SpinTimer};
pub use tx::Transmitter;
