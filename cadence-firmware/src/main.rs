//! Cadence - Software Serial Echo Firmware
//!
//! Brings up a bit-banged serial link on two GPIOs, prints a banner and
//! then echoes every received line back with its length in front:
//!
//! ```text
//! > HELLO\r
//! < 5 HELLO\r\n
//! ```
//!
//! Built with the `trim-sweep` feature it prints a trim calibration sweep
//! instead. The `spin-timer` feature paces bits with a cycle-counted delay
//! rather than the embassy time driver.

#![no_std]
#![no_main]

use defmt::*;
use embassy_executor::Spawner;
use {defmt_rtt as _, panic_probe as _};

use cadence_core::{SampleOffset, SerialConfig, SoftSerial};
use cadence_hal::FixedClock;
use cadence_hal_rp2040::{rx_pin, tx_pin};

#[cfg(not(feature = "spin-timer"))]
use cadence_core::CounterTimer;
#[cfg(not(feature = "spin-timer"))]
use cadence_hal_rp2040::{EmbassyTicks, TIMER_HZ};
#[cfg(feature = "spin-timer")]
use cadence_hal_rp2040::SpinDelay;

mod app;

include!(concat!(env!("OUT_DIR"), "/serial_config.rs"));

/// Main entry point
#[embassy_executor::main]
async fn main(_spawner: Spawner) {
    info!("Cadence firmware starting...");

    let p = embassy_rp::init(Default::default());
    info!("Peripherals initialized");

    if let Err(e) = cadence_hal_rp2040::gpio::check_serial_pins(TX_GPIO, RX_GPIO) {
        error!("Bad serial pins tx=gpio{} rx=gpio{}: {}", TX_GPIO, RX_GPIO, e);
        halt();
    }

    #[cfg(not(feature = "spin-timer"))]
    let timer = {
        if SERIAL_CONFIG.timer_hz != TIMER_HZ {
            warn!(
                "serial.toml timer_hz={} but time driver runs at {} Hz",
                SERIAL_CONFIG.timer_hz, TIMER_HZ
            );
        }
        CounterTimer::new(EmbassyTicks)
    };

    #[cfg(feature = "spin-timer")]
    let timer = {
        let delay = SpinDelay::new(embassy_rp::clocks::clk_sys_freq(), SERIAL_CONFIG.timer_hz);
        info!("Spin timer: {} cycles per tick", delay.cycles_per_tick());
        delay
    };

    let (tx, rx) = take_serial_pins!(p);
    let mut oscillator = FixedClock::new();

    let mut serial = match SoftSerial::new(
        tx_pin(tx),
        rx_pin(rx),
        timer,
        &SERIAL_CONFIG,
        &mut oscillator,
    ) {
        Ok(serial) => serial,
        Err(e) => {
            error!("Serial config rejected: {}", e);
            halt();
        }
    };

    info!(
        "Soft serial up: {} baud on tx=gpio{} rx=gpio{}, {}",
        SERIAL_CONFIG.baud,
        TX_GPIO,
        RX_GPIO,
        serial.bit_duration()
    );

    #[cfg(feature = "trim-sweep")]
    app::trim_sweep(&mut serial, &mut oscillator);

    #[cfg(not(feature = "trim-sweep"))]
    app::echo(&mut serial);
}

/// Park the core after a fatal setup error
fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}
