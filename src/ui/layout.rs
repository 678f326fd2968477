//! Display geometry: digit counts, text lengths and centring.
//!
//! Pure integer arithmetic so screen layouts are reproducible on the host.

use core::fmt::Write;

use heapless::String;

/// Number of decimal digits in `n`, plus one if `count_terminator`.
///
/// Zero has no digits here: counting is by repeated division.
pub fn digit_count(mut n: u32, count_terminator: bool) -> u32 {
    let mut digits = 0;
    while n > 0 {
        n /= 10;
        digits += 1;
    }
    digits + u32::from(count_terminator)
}

/// Characters in `s`, plus one if `count_terminator`.
pub fn text_length(s: &str, count_terminator: bool) -> u32 {
    s.chars().count() as u32 + u32::from(count_terminator)
}

/// Left x coordinate that centres `text` between `left` and `right`.
///
/// Floor division: an odd leftover pixel goes to the left side.
pub fn center_x(text: &str, left: i32, right: i32, char_width: i32) -> i32 {
    let width = text_length(text, false) as i32 * char_width;
    (right - width + left).div_euclid(2)
}

/// Pixel width of `text` in a font advancing `char_width` per glyph.
pub fn text_width(text: &str, char_width: i32) -> i32 {
    text_length(text, false) as i32 * char_width
}

/// Measurement readout text, e.g. `"123.05lx"`. `None` renders dashes.
pub fn format_measure(lux: Option<f32>) -> String<16> {
    let mut out = String::new();
    match lux {
        Some(value) if value.is_finite() && value >= 0.0 => {
            let integer = value as u32;
            let fraction = ((value - integer as f32) * 100.0) as u32;
            let _ = write!(out, "{}.{:02}lx", integer, fraction.min(99));
        }
        _ => {
            let _ = out.push_str("--.--lx");
        }
    }
    out
}

/// Decimal text of `value` into a buffer of `N` characters.
///
/// Fails when the value does not fit.
pub fn format_value<const N: usize>(value: u32) -> Result<String<N>, core::fmt::Error> {
    let mut out = String::new();
    write!(out, "{}", value)?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digit_count_matches_division_semantics() {
        assert_eq!(digit_count(0, false), 0);
        assert_eq!(digit_count(0, true), 1);
        assert_eq!(digit_count(7, true), 2);
        assert_eq!(digit_count(12345, false), 5);
        assert_eq!(digit_count(54612, false), 5);
        assert_eq!(digit_count(u32::MAX, false), 10);
    }

    #[test]
    fn text_length_counts_terminator() {
        assert_eq!(text_length("", false), 0);
        assert_eq!(text_length("Sample", false), 6);
        assert_eq!(text_length("Sample", true), 7);
    }

    #[test]
    fn center_x_matches_reference_vector() {
        assert_eq!(center_x("OK", 0, 128, 7), 57);
        assert_eq!(center_x("", 0, 128, 7), 64);
    }

    #[test]
    fn center_x_gives_odd_pixel_to_the_left() {
        // 128 - 3 * 7 = 107 -> 53
        assert_eq!(center_x("abc", 0, 128, 7), 53);
    }

    #[test]
    fn center_x_respects_left_bound() {
        // Centred between 40 and 128: (128 - 14 + 40) / 2 = 77
        assert_eq!(center_x("OK", 40, 128, 7), 77);
    }

    #[test]
    fn center_x_floors_when_text_overflows() {
        // 128 - 23 * 11 = -125 -> floor(-62.5) = -63
        assert_eq!(center_x("Fatal Error, code: 0xAF", 0, 128, 11), -63);
    }

    #[test]
    fn measure_text() {
        assert_eq!(format_measure(Some(123.25)).as_str(), "123.25lx");
        assert_eq!(format_measure(Some(7.5)).as_str(), "7.50lx");
        assert_eq!(format_measure(Some(0.0)).as_str(), "0.00lx");
        assert_eq!(format_measure(None).as_str(), "--.--lx");
        assert_eq!(format_measure(Some(f32::NAN)).as_str(), "--.--lx");
    }

    #[test]
    fn value_text_respects_capacity() {
        assert_eq!(format_value::<5>(54612).unwrap().as_str(), "54612");
        assert!(format_value::<5>(100_000).is_err());
    }
}
