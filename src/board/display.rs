//! SSD1306 OLED display wrapper.

use embassy_stm32::i2c::I2c;
use embassy_stm32::mode::Blocking;
use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use luxmeter::hal::Screen;
use luxmeter::Error;
use ssd1306::mode::BufferedGraphicsMode;
use ssd1306::prelude::*;
use ssd1306::I2CDisplayInterface;
use ssd1306::Ssd1306;

type Driver = Ssd1306<
    I2CInterface<I2c<'static, Blocking>>,
    DisplaySize128x64,
    BufferedGraphicsMode<DisplaySize128x64>,
>;

/// Buffered 128×64 panel; drawing goes to RAM until [`Screen::present`].
pub struct Oled(Driver);

/// Initialise the SSD1306 display and clear the screen.
pub fn init(i2c: I2c<'static, Blocking>) -> Oled {
    let interface = I2CDisplayInterface::new(i2c);
    let mut display = Ssd1306::new(interface, DisplaySize128x64, DisplayRotation::Rotate0)
        .into_buffered_graphics_mode();
    if display.init().is_err() {
        defmt::warn!("Display: init failed");
    }
    display.clear_buffer();
    let _ = display.flush();
    Oled(display)
}

impl OriginDimensions for Oled {
    fn size(&self) -> Size {
        self.0.size()
    }
}

impl DrawTarget for Oled {
    type Color = BinaryColor;
    type Error = <Driver as DrawTarget>::Error;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        self.0.draw_iter(pixels)
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.0.clear(color)
    }
}

impl Screen for Oled {
    fn present(&mut self) -> Result<(), Error> {
        self.0.flush().map_err(|_| Error::Display)
    }
}
