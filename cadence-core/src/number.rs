//! Integer to ASCII conversion
//!
//! Output goes straight to the wire, so everything here works on fixed
//! stack buffers and never allocates.

use heapless::String;

/// Longest decimal `i16` text: `-32768`
pub const I16_MAX_LEN: usize = 6;

/// Longest decimal `u16` text: `65535`
pub const U16_MAX_LEN: usize = 5;

/// Decimal text of an `i16`
pub type I16String = String<I16_MAX_LEN>;

/// Decimal text of a `u16`
pub type U16String = String<U16_MAX_LEN>;

/// Emit the decimal digits of `magnitude` into `scratch`, least
/// significant first. Returns the digit count.
fn digits_reversed(mut magnitude: u16, scratch: &mut [u8; U16_MAX_LEN]) -> usize {
    let mut len = 0;
    loop {
        scratch[len] = b'0' + (magnitude % 10) as u8;
        len += 1;
        magnitude /= 10;
        if magnitude == 0 {
            return len;
        }
    }
}

/// Format a signed 16-bit value as decimal, most significant digit first
///
/// The magnitude is taken in the unsigned domain so `i16::MIN`, which has
/// no positive `i16` counterpart, formats correctly.
pub fn format_i16(value: i16) -> I16String {
    let mut scratch = [0u8; U16_MAX_LEN];
    let len = digits_reversed(value.unsigned_abs(), &mut scratch);

    let mut out = String::new();
    // Capacity covers sign plus five digits, pushes cannot fail
    if value < 0 {
        let _ = out.push('-');
    }
    for &digit in scratch[..len].iter().rev() {
        let _ = out.push(digit as char);
    }
    out
}

/// Format an unsigned 16-bit value as decimal
pub fn format_u16(value: u16) -> U16String {
    let mut scratch = [0u8; U16_MAX_LEN];
    let len = digits_reversed(value, &mut scratch);

    let mut out = String::new();
    for &digit in scratch[..len].iter().rev() {
        let _ = out.push(digit as char);
    }
    out
}

/// Two upper-case hex digits of a byte, high nibble first
pub const fn format_hex_u8(value: u8) -> [u8; 2] {
    [hex_digit(value >> 4), hex_digit(value & 0x0F)]
}

const fn hex_digit(nibble: u8) -> u8 {
    if nibble < 10 {
        b'0' + nibble
    } else {
        b'A' + nibble - 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_i16_examples() {
        assert_eq!(format_i16(0).as_str(), "0");
        assert_eq!(format_i16(7).as_str(), "7");
        assert_eq!(format_i16(-7).as_str(), "-7");
        assert_eq!(format_i16(1200).as_str(), "1200");
        assert_eq!(format_i16(i16::MAX).as_str(), "32767");
        assert_eq!(format_i16(i16::MIN).as_str(), "-32768");
    }

    #[test]
    fn test_format_i16_roundtrip_all_values() {
        for value in i16::MIN..=i16::MAX {
            let text = format_i16(value);
            assert_eq!(text.parse::<i16>(), Ok(value));
        }
    }

    #[test]
    fn test_format_u16_examples() {
        assert_eq!(format_u16(0).as_str(), "0");
        assert_eq!(format_u16(10).as_str(), "10");
        assert_eq!(format_u16(u16::MAX).as_str(), "65535");
    }

    #[test]
    fn test_format_hex_u8() {
        assert_eq!(&format_hex_u8(0x00), b"00");
        assert_eq!(&format_hex_u8(0x73), b"73");
        assert_eq!(&format_hex_u8(0xAF), b"AF");
        assert_eq!(&format_hex_u8(0xFF), b"FF");
    }

    proptest! {
        #[test]
        fn prop_format_u16_roundtrip(value in any::<u16>()) {
            let text = format_u16(value);
            prop_assert_eq!(text.parse::<u16>(), Ok(value));
        }

        #[test]
        fn prop_no_leading_zeros(value in any::<i16>()) {
            let text = format_i16(value);
            let digits = text.trim_start_matches('-');
            prop_assert!(digits == "0" || !digits.starts_with('0'));
        }
    }
}
