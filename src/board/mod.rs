//! STM32F103 "Blue Pill" implementation of the hardware traits.
//!
//! | Part       | Peripheral                      |
//! |------------|---------------------------------|
//! | OLED       | I2C1 (PB6 SCL, PB7 SDA)         |
//! | BH1750     | I2C2 (PB10 SCL, PB11 SDA)       |
//! | Keypad     | PA0..PA4, pull-up, active-low   |
//! | Settings   | internal flash, last two pages  |
//! | Watchdog   | IWDG                            |

pub mod bh1750;
pub mod display;
pub mod storage;

use embassy_stm32::gpio::Input;
use embassy_stm32::peripherals::IWDG;
use embassy_stm32::rcc::{
    AHBPrescaler, APBPrescaler, Hse, HseMode, Pll, PllMul, PllPreDiv, PllSource, Sysclk,
};
use embassy_stm32::time::Hertz;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_time::Instant;
use luxmeter::config::COUNTER_HZ;
use luxmeter::hal::{Board, Keypad, System, TickCounter, Watchdog};

/// Part selection for the Blue Pill board.
pub struct BluePill;

impl Board for BluePill {
    type Display = display::Oled;
    type Sensor = bh1750::Bh1750<embassy_stm32::i2c::I2c<'static, embassy_stm32::mode::Blocking>>;
    type Store = storage::FlashStore;
    type Keypad = PortKeypad;
    type Counter = InstantCounter;
    type Watchdog = Iwdg;
    type System = CortexM;
}

/// 72 MHz system clock from the 8 MHz crystal.
pub fn clock_config() -> embassy_stm32::Config {
    let mut config = embassy_stm32::Config::default();
    config.rcc.hse = Some(Hse {
        freq: Hertz(8_000_000),
        mode: HseMode::Oscillator,
    });
    config.rcc.pll = Some(Pll {
        src: PllSource::HSE,
        prediv: PllPreDiv::DIV1,
        mul: PllMul::MUL9,
    });
    config.rcc.sys = Sysclk::PLL1_P;
    config.rcc.ahb_pre = AHBPrescaler::DIV1;
    config.rcc.apb1_pre = APBPrescaler::DIV2;
    config.rcc.apb2_pre = APBPrescaler::DIV1;
    config
}

/// Delay counter on top of the embassy time driver, scaled to
/// [`COUNTER_HZ`].
pub struct InstantCounter {
    start: Instant,
}

impl InstantCounter {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl TickCounter for InstantCounter {
    fn reset(&mut self) {
        self.start = Instant::now();
    }

    fn count(&mut self) -> u32 {
        let ticks = self.start.elapsed().as_micros() * u64::from(COUNTER_HZ) / 1_000_000;
        ticks.min(u64::from(u32::MAX)) as u32
    }
}

pub struct Iwdg(pub IndependentWatchdog<'static, IWDG>);

impl Watchdog for Iwdg {
    fn feed(&mut self) {
        self.0.pet();
    }
}

/// Five buttons read as one 5-bit sample, bit `i` = pin `i`.
pub struct PortKeypad {
    pins: [Input<'static>; 5],
}

impl PortKeypad {
    /// Pins in bit order: Up, Down, Right, Left, Ok.
    pub fn new(pins: [Input<'static>; 5]) -> Self {
        Self { pins }
    }
}

impl Keypad for PortKeypad {
    fn sample(&mut self) -> u8 {
        self.pins
            .iter()
            .enumerate()
            .fold(0, |raw, (bit, pin)| raw | (u8::from(pin.is_high()) << bit))
    }
}

pub struct CortexM;

impl System for CortexM {
    fn restart(&mut self) -> ! {
        cortex_m::peripheral::SCB::sys_reset()
    }

    fn wait_for_interrupt(&mut self) {
        cortex_m::asm::wfi();
    }
}
