//! Button decoding and edge detection.
//!
//! Five buttons (active-low with pull-ups) are sampled together as one
//! 5-bit field. Exactly one low bit is a valid press:
//!   - UP     - 0b11110
//!   - DOWN   - 0b11101
//!   - RIGHT  - 0b11011
//!   - LEFT   - 0b10111
//!   - OK     - 0b01111
//!
//! Anything else (no button, chords, glitches) decodes to `None`.

use crate::config::BUTTON_MASK;
use crate::hal::Keypad;

/// Decoded button port sample.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonReading {
    Up,
    Down,
    Left,
    Right,
    Ok,
    None,
}

impl ButtonReading {
    /// Decode a raw port sample.
    pub fn decode(raw: u8) -> Self {
        match raw & BUTTON_MASK {
            0b11110 => ButtonReading::Up,
            0b11101 => ButtonReading::Down,
            0b11011 => ButtonReading::Right,
            0b10111 => ButtonReading::Left,
            0b01111 => ButtonReading::Ok,
            _ => ButtonReading::None,
        }
    }

    pub fn is_pressed(self) -> bool {
        self != ButtonReading::None
    }
}

/// Reports a reading only when it differs from the previous sample.
///
/// A fresh detector treats its first sample as an edge, so a screen that
/// starts polling always renders once.
#[derive(Clone, Copy, Debug, Default)]
pub struct EdgeDetector {
    previous: Option<ButtonReading>,
}

impl EdgeDetector {
    pub const fn new() -> Self {
        Self { previous: None }
    }

    /// Sample the keypad; `Some` on an edge.
    pub fn poll(&mut self, keypad: &mut impl Keypad) -> Option<ButtonReading> {
        self.update(ButtonReading::decode(keypad.sample()))
    }

    /// Feed an already decoded reading; `Some` on an edge.
    pub fn update(&mut self, reading: ButtonReading) -> Option<ButtonReading> {
        let edge = self.previous != Some(reading);
        self.previous = Some(reading);
        edge.then_some(reading)
    }

    /// Forget the previous sample.
    pub fn rearm(&mut self) {
        self.previous = None;
    }
}
