//! User interface subsystem - OLED rendering + physical buttons.
//!
//! ## Components
//!
//! - **Display**: 128×64 monochrome frame buffer (SSD1306 on target)
//! - **Buttons**: 5 tactile switches sampled as one port (UP, DOWN, RIGHT, LEFT, OK)
//! - **Layout**: integer text geometry shared by every screen

pub mod buttons;
pub mod display;
pub mod input_logic;
pub mod layout;

use embedded_graphics::mono_font::ascii::{FONT_10X20, FONT_6X10};
use embedded_graphics::mono_font::MonoFont;

/// Text sizes used by the screens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FontSize {
    /// Labels, prompts and legends.
    Small,
    /// Readouts and menu entries.
    Medium,
    /// Full-screen titles.
    Large,
}

impl FontSize {
    pub fn font(self) -> &'static MonoFont<'static> {
        match self {
            FontSize::Small => &FONT_6X10,
            FontSize::Medium => &FONT_10X20,
            FontSize::Large => &profont::PROFONT_24_POINT,
        }
    }

    /// Horizontal advance per character, in pixels.
    pub fn advance(self) -> i32 {
        let font = self.font();
        (font.character_size.width + font.character_spacing) as i32
    }

    /// Glyph cell height, in pixels.
    pub fn height(self) -> i32 {
        self.font().character_size.height as i32
    }
}
