//! Hardware seams of the application core.
//!
//! The core never touches registers. The firmware binary implements these
//! traits on top of embassy-stm32 peripherals; the host tests implement
//! them with simulated parts.

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::DrawTarget;

use crate::error::Error;
use crate::settings::{SensorResolution, StoreSlot};

/// Hardware watchdog. Must be fed at least once per polling iteration.
pub trait Watchdog {
    fn feed(&mut self);
}

/// Free-running counter driving the delay engine.
///
/// Counts up at [`COUNTER_HZ`](crate::config::COUNTER_HZ) from the last
/// [`reset`](TickCounter::reset).
pub trait TickCounter {
    fn reset(&mut self);
    fn count(&mut self) -> u32;
}

/// Raw button port. Returns the masked 5-bit, active-low sample.
pub trait Keypad {
    fn sample(&mut self) -> u8;
}

/// Ambient light sensor.
pub trait LightSensor {
    fn init(&mut self, resolution: SensorResolution) -> Result<(), Error>;
    fn read_lux(&mut self) -> Result<f32, Error>;
    fn recalibrate(&mut self) -> Result<(), Error>;
}

/// Byte-addressable persistent settings.
pub trait ConfigStore {
    /// `Ok(None)` means the slot has never been written.
    fn read(&mut self, slot: StoreSlot) -> Result<Option<u8>, Error>;
    fn write(&mut self, slot: StoreSlot, value: u8) -> Result<(), Error>;
}

/// Monochrome frame buffer that is pushed to the panel on `present`.
pub trait Screen: DrawTarget<Color = BinaryColor> {
    fn present(&mut self) -> Result<(), Error>;
}

/// Core-level system control.
pub trait System {
    /// Full system restart. Never returns.
    fn restart(&mut self) -> !;

    /// Low-power wait until the next hardware interrupt.
    fn wait_for_interrupt(&mut self);
}

/// Concrete part selection for one board.
pub trait Board {
    type Display: Screen;
    type Sensor: LightSensor;
    type Store: ConfigStore;
    type Keypad: Keypad;
    type Counter: TickCounter;
    type Watchdog: Watchdog;
    type System: System;
}
