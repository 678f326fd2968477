//! Screen rendering on any [`Screen`].
//!
//! Drawing results are ignored: a failed draw into the frame buffer only
//! affects pixels, and a failed flush is logged and retried by the next
//! `present`.

use core::fmt::Write;

use embedded_graphics::mono_font::{MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::{Line, PrimitiveStyle, Rectangle, Triangle};
use embedded_graphics::text::{Baseline, Text};

use super::layout::{center_x, format_measure};
use super::FontSize;
use crate::config::{MENU_LABEL_Y, MODE_LABEL_Y, READOUT_Y, SCREEN_HEIGHT, SCREEN_WIDTH, TITLE_Y};
use crate::error::Fault;
use crate::hal::Screen;
use crate::mode::Mode;

fn text_style(size: FontSize) -> MonoTextStyle<'static, BinaryColor> {
    MonoTextStyleBuilder::new()
        .font(size.font())
        .text_color(BinaryColor::On)
        .background_color(BinaryColor::Off)
        .build()
}

fn color(on: bool) -> BinaryColor {
    if on {
        BinaryColor::On
    } else {
        BinaryColor::Off
    }
}

pub fn clear<D: Screen>(display: &mut D) {
    let _ = display.clear(BinaryColor::Off);
}

/// Push the frame buffer to the panel.
pub fn present<D: Screen>(display: &mut D) {
    if let Err(e) = display.present() {
        warn!("Display: flush failed: {}", e);
    }
}

/// Draw `s` with its top-left corner at (`x`, `y`).
pub fn text<D: Screen>(display: &mut D, s: &str, x: i32, y: i32, size: FontSize) {
    let _ = Text::with_baseline(s, Point::new(x, y), text_style(size), Baseline::Top).draw(display);
}

/// Draw `s` centred across the full screen width.
pub fn centered_text<D: Screen>(display: &mut D, s: &str, y: i32, size: FontSize) {
    let x = center_x(s, 0, SCREEN_WIDTH, size.advance());
    text(display, s, x, y, size);
}

/// Fill `area` with the background colour.
pub fn blank<D: Screen>(display: &mut D, area: Rectangle) {
    let _ = area
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::Off))
        .draw(display);
}

/// Blank one full-width text row of `size`.
pub fn blank_row<D: Screen>(display: &mut D, y: i32, size: FontSize) {
    blank_row_from(display, 0, y, size);
}

/// Blank a text row of `size` from `x` to the right edge.
pub fn blank_row_from<D: Screen>(display: &mut D, x: i32, y: i32, size: FontSize) {
    let width = (SCREEN_WIDTH - x).max(0) as u32;
    let area = Rectangle::new(Point::new(x, y), Size::new(width, size.height() as u32));
    blank(display, area);
}

/// Draw (`on`) or erase a one pixel outline around `area`.
pub fn outline<D: Screen>(display: &mut D, area: Rectangle, on: bool) {
    let _ = area
        .into_styled(PrimitiveStyle::with_stroke(color(on), 1))
        .draw(display);
}

pub fn line<D: Screen>(display: &mut D, from: Point, to: Point) {
    let _ = Line::new(from, to)
        .into_styled(PrimitiveStyle::with_stroke(BinaryColor::On, 1))
        .draw(display);
}

pub fn filled_triangle<D: Screen>(display: &mut D, a: Point, b: Point, c: Point) {
    let _ = Triangle::new(a, b, c)
        .into_styled(PrimitiveStyle::with_fill(BinaryColor::On))
        .draw(display);
}

pub fn pixel<D: Screen>(display: &mut D, at: Point) {
    let _ = Pixel(at, BinaryColor::On).draw(display);
}

/// Render the boot splash.
pub fn draw_splash<D: Screen>(display: &mut D, version: &str) {
    clear(display);
    centered_text(display, "Firmware Version", 14, FontSize::Small);
    centered_text(display, version, 30, FontSize::Medium);
    present(display);
}

/// Render a latched fault screen.
pub fn draw_fault<D: Screen>(display: &mut D, fault: Fault) {
    let (first, second) = match fault {
        Fault::ConfigStore => ("Fatal Error:", "Store"),
        Fault::SensorNotConnected => ("Sensor", "Not connected"),
        Fault::Recalibration => ("Fatal Error:", "Sensor"),
    };

    clear(display);
    centered_text(display, first, 8, FontSize::Small);
    centered_text(display, second, 20, FontSize::Small);
    centered_text(display, "Press OK to continue", 44, FontSize::Small);
    present(display);
}

/// Render the full-screen reset notice.
pub fn draw_reset<D: Screen>(display: &mut D) {
    clear(display);
    let y = (SCREEN_HEIGHT - FontSize::Large.height()) / 2;
    centered_text(display, "Reset", y, FontSize::Large);
    present(display);
}

/// Render the configurator's out-of-buffer screen.
pub fn draw_allocation_error<D: Screen>(display: &mut D, code: u8) {
    let mut line: heapless::String<12> = heapless::String::new();
    let _ = write!(line, "code: 0x{:02X}", code);

    clear(display);
    centered_text(display, "Fatal Error", 12, FontSize::Medium);
    centered_text(display, line.as_str(), 40, FontSize::Small);
    present(display);
}

/// Static chrome of the measurement screens.
pub fn draw_measure_chrome<D: Screen>(display: &mut D, mode: Mode) {
    clear(display);
    centered_text(display, "Light", TITLE_Y, FontSize::Medium);
    centered_text(display, mode.label(), MODE_LABEL_Y, FontSize::Small);
}

/// Overwrite the readout row with `lux`.
pub fn draw_readout<D: Screen>(display: &mut D, lux: Option<f32>) {
    let value = format_measure(lux);
    blank_row(display, READOUT_Y, FontSize::Medium);
    centered_text(display, value.as_str(), READOUT_Y, FontSize::Medium);
}

/// Menu background with its title.
pub fn draw_menu<D: Screen>(display: &mut D) {
    clear(display);
    centered_text(display, "Mode", 4, FontSize::Large);
}

pub fn draw_menu_label<D: Screen>(display: &mut D, mode: Mode) {
    blank_menu_label(display);
    centered_text(display, mode.label(), MENU_LABEL_Y, FontSize::Medium);
}

pub fn blank_menu_label<D: Screen>(display: &mut D) {
    blank_row(display, MENU_LABEL_Y, FontSize::Medium);
}

/// Confirmation shown after a sensor recalibration.
pub fn draw_sensor_reset<D: Screen>(display: &mut D) {
    clear(display);
    centered_text(display, "The sensor", 6, FontSize::Small);
    centered_text(display, "has been reset", 18, FontSize::Small);
    centered_text(display, "Press OK", 34, FontSize::Small);
    centered_text(display, "to continue", 46, FontSize::Small);
    present(display);
}
