//! Cadence Hardware Abstraction Layer
//!
//! This crate defines the hardware traits a software-timed serial link
//! needs from a chip: two single-bit GPIO lines, a blocking delay, an
//! optional free-running counter and an optional oscillator trim.
//! Chip-specific crates implement them; `cadence-core` consumes them.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Application (cadence-firmware, etc.)   │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-core (soft UART logic)         │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//! ┌─────────────────────────────────────────┐
//! │  cadence-hal (this crate - traits)      │
//! └─────────────────────────────────────────┘
//!                     │
//!                     ▼
//!            ┌─────────────────┐
//!            │ cadence-hal-    │
//!            │    rp2040       │
//!            └─────────────────┘
//! ```
//!
//! # Traits
//!
//! - [`gpio::OutputPin`], [`gpio::InputPin`] - TX and RX lines
//! - [`timer::BitTimer`] - Blocking bit pacing
//! - [`timer::TickSource`] - Free-running hardware counter
//! - [`clock::OscillatorTrim`] - Oscillator calibration register

#![no_std]
#![deny(unsafe_code)]

pub mod clock;
pub mod gpio;
pub mod timer;

// Re-export key traits at crate root for convenience
pub use clock::{FixedClock, OscillatorTrim};
pub use gpio::{EhInput, EhOutput, InputPin, OutputPin};
pub use timer::{BitTimer, TickSource};
