//! Build script for cadence-firmware
//!
//! - Sets up linker search paths and scripts for memory.x
//! - Validates serial.toml at compile time
//! - Generates the link configuration constant and pin macro

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use cadence_core::SerialConfig;

/// Number of GPIO pins on RP2040
const GPIO_COUNT: u8 = 30;

fn main() {
    setup_linker();
    let (config, tx, rx) = validate_config();
    generate_config(&config, tx, rx);
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    // Copy memory.x to the output directory
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    // Tell rustc where to find memory.x
    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rustc-link-arg-bins=--nmagic");
    println!("cargo:rustc-link-arg-bins=-Tlink.x");
    println!("cargo:rustc-link-arg-bins=-Tlink-rp.x");
    println!("cargo:rustc-link-arg-bins=-Tdefmt.x");

    // Re-run if memory.x changes
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate serial.toml at compile time
fn validate_config() -> (SerialConfig, u8, u8) {
    // Re-run if serial.toml changes
    println!("cargo:rerun-if-changed=serial.toml");

    let config_path = Path::new("serial.toml");

    // Check if config file exists
    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: serial.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a serial.toml configuration file.         ║\n\
            ║  Please create one in the cadence-firmware directory.            ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    // Read the config file
    let config_content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read serial.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    // Parse and validate TOML syntax
    let config: toml::Value = match toml::from_str(&config_content) {
        Ok(value) => value,
        Err(e) => {
            let error_msg = e.to_string();
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid TOML syntax in serial.toml                       ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&error_msg)
            );
        }
    };

    validate_required_sections(&config);

    let serial = validate_serial(&config);
    let (tx, rx) = validate_pins(&config);

    println!("cargo:warning=serial.toml validated successfully");
    (serial, tx, rx)
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Abort the build with a list of problems in one section
fn fail(title: &str, errors: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        errors
            .iter()
            .map(|e| format!("║  • {:<62} ║", e))
            .collect::<Vec<_>>()
            .join("\n")
    );
}

/// Validate that required sections exist
fn validate_required_sections(config: &toml::Value) {
    let mut errors = Vec::new();

    if config.get("serial").is_none() {
        errors.push("Missing [serial] section".to_string());
    }

    if config.get("pins").is_none() {
        errors.push("Missing [pins] section".to_string());
    }

    if !errors.is_empty() {
        fail("Missing required sections in serial.toml", &errors);
    }
}

/// Deserialize [serial] and check it derives a usable bit duration
fn validate_serial(config: &toml::Value) -> SerialConfig {
    let serial = match config.get("serial") {
        Some(value) => value.clone(),
        None => fail("Missing required sections in serial.toml", &[]),
    };

    let parsed: SerialConfig = match serial.try_into() {
        Ok(parsed) => parsed,
        Err(e) => fail("Invalid [serial] configuration", &[e.to_string()]),
    };

    match parsed.validate() {
        Ok(bit) => {
            println!(
                "cargo:warning=serial link: {} baud, {} ticks/bit, {} per mille error",
                parsed.baud,
                bit.ticks(),
                bit.error_per_mille(parsed.timer_hz, parsed.baud)
            );
            parsed
        }
        Err(e) => fail("Invalid [serial] configuration", &[format!("{:?}", e)]),
    }
}

/// Parse a "gpioN" pin name
fn parse_pin(name: &str) -> Option<u8> {
    let pin: u8 = name.trim().strip_prefix("gpio")?.parse().ok()?;
    (pin < GPIO_COUNT).then_some(pin)
}

/// Validate [pins]: tx and rx must be distinct RP2040 GPIOs
fn validate_pins(config: &toml::Value) -> (u8, u8) {
    let mut errors = Vec::new();
    let mut pin = |key: &str| -> Option<u8> {
        match config.get("pins").and_then(|p| p.get(key)) {
            Some(toml::Value::String(name)) => {
                let parsed = parse_pin(name);
                if parsed.is_none() {
                    errors.push(format!("[pins] {} '{}' is not gpio0-gpio29", key, name));
                }
                parsed
            }
            Some(_) => {
                errors.push(format!("[pins] {} must be a string like \"gpio4\"", key));
                None
            }
            None => {
                errors.push(format!("[pins] missing '{}'", key));
                None
            }
        }
    };

    let tx = pin("tx");
    let rx = pin("rx");

    match (tx, rx) {
        (Some(tx), Some(rx)) if tx == rx => {
            errors.push(format!("[pins] tx and rx both use gpio{}", tx));
            fail("Invalid pin configuration", &errors);
        }
        (Some(tx), Some(rx)) if errors.is_empty() => (tx, rx),
        _ => fail("Invalid pin configuration", &errors),
    }
}

/// Write `$OUT_DIR/serial_config.rs`
fn generate_config(config: &SerialConfig, tx: u8, rx: u8) {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let source = format!(
        "/// Link configuration from serial.toml\n\
        pub const SERIAL_CONFIG: SerialConfig = SerialConfig::new()\n\
        \x20   .with_baud({baud})\n\
        \x20   .with_timer({timer_hz}, {overhead})\n\
        \x20   .with_osc_trim({trim:?})\n\
        \x20   .with_sample_offset(SampleOffset::{offset:?})\n\
        \x20   .with_settle_stop_bit({settle});\n\
        \n\
        /// TX GPIO number\n\
        pub const TX_GPIO: u8 = {tx};\n\
        \n\
        /// RX GPIO number\n\
        pub const RX_GPIO: u8 = {rx};\n\
        \n\
        /// Take the configured TX and RX pins from the peripherals\n\
        macro_rules! take_serial_pins {{\n\
        \x20   ($p:expr) => {{\n\
        \x20       (\n\
        \x20           cadence_hal_rp2040::take_pin!($p, {tx}),\n\
        \x20           cadence_hal_rp2040::take_pin!($p, {rx}),\n\
        \x20       )\n\
        \x20   }};\n\
        }}\n",
        baud = config.baud,
        timer_hz = config.timer_hz,
        overhead = config.bit_overhead_ticks,
        trim = config.osc_trim,
        offset = config.sample_offset,
        settle = config.settle_stop_bit,
        tx = tx,
        rx = rx,
    );

    fs::write(out_dir.join("serial_config.rs"), source).unwrap();
}
