//! RP2040-specific HAL for the software serial link
//!
//! This crate binds the `cadence-hal` traits to RP2040 peripherals:
//!
//! - TX/RX GPIO lines through the embassy-rp drivers
//! - Pin selection by number for config-driven setup
//! - A tick source on the embassy time driver
//! - A cycle-counted spin timer for builds without a time driver

#![no_std]

pub mod gpio;
pub mod pins;
pub mod timer;

pub use gpio::{rx_pin, tx_pin, RxLine, TxLine};
pub use pins::PinError;
pub use timer::{EmbassyTicks, SpinDelay, TIMER_HZ};
