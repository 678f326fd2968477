//! luxmeter firmware for the STM32F103 "Blue Pill".
//!
//! The measurement UI is a blocking loop in thread mode. Two interrupt
//! sources feed it, both served by an interrupt-priority executor so they
//! preempt the loop:
//!
//! - menu / reset buttons (EXTI0, EXTI1) → [`LATCH`]
//! - 10 ms ticker → [`YIELD_GATE`]

#![no_std]
#![no_main]

mod board;

use cortex_m_rt::entry;
use defmt::{error, info};
use defmt_rtt as _;
use embassy_executor::InterruptExecutor;
use embassy_stm32::exti::ExtiInput;
use embassy_stm32::flash::Flash;
use embassy_stm32::gpio::{Input, Pull};
use embassy_stm32::i2c::{self, I2c};
use embassy_stm32::interrupt;
use embassy_stm32::interrupt::{InterruptExt, Priority};
use embassy_stm32::time::Hertz;
use embassy_stm32::wdg::IndependentWatchdog;
use embassy_time::{Duration, Ticker, Timer};
use luxmeter::config::{BUTTON_DEBOUNCE_MS, LOOP_TICK_MS, VERSION, WATCHDOG_TIMEOUT_MS};
use luxmeter::timing::{DelayEngine, Pacing, YieldGate};
use luxmeter::{Hardware, InterruptLatch, ModeController, PendingEvent, Variant};
use panic_probe as _;

use board::BluePill;

static LATCH: InterruptLatch = InterruptLatch::new();
static YIELD_GATE: YieldGate = YieldGate::new();

static EXECUTOR_HIGH: InterruptExecutor = InterruptExecutor::new();

#[interrupt]
unsafe fn USART3() {
    EXECUTOR_HIGH.on_interrupt()
}

/// Raise `event` on every debounced press of `button`.
#[embassy_executor::task(pool_size = 2)]
async fn request_button(mut button: ExtiInput<'static>, event: PendingEvent) -> ! {
    loop {
        // Wait for falling edge (button press, active-low).
        button.wait_for_falling_edge().await;

        Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;

        if button.is_low() {
            info!("Button: {}", event);
            LATCH.raise(event);

            // Wait for release to avoid repeat triggers.
            button.wait_for_rising_edge().await;
            Timer::after(Duration::from_millis(BUTTON_DEBOUNCE_MS)).await;
        }
    }
}

/// Pace the main loop.
#[embassy_executor::task]
async fn loop_tick() -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(u64::from(LOOP_TICK_MS)));
    loop {
        ticker.next().await;
        YIELD_GATE.signal_tick();
    }
}

#[entry]
fn main() -> ! {
    let p = embassy_stm32::init(board::clock_config());
    info!("luxmeter {} ({})", VERSION, Variant::ACTIVE);

    let mut watchdog = IndependentWatchdog::new(p.IWDG, WATCHDOG_TIMEOUT_MS * 1000);
    watchdog.unleash();

    interrupt::USART3.set_priority(Priority::P6);
    let spawner = EXECUTOR_HIGH.start(interrupt::USART3);

    let menu = ExtiInput::new(p.PB0, p.EXTI0, Pull::Up);
    let reset = ExtiInput::new(p.PB1, p.EXTI1, Pull::Up);
    for spawned in [
        spawner.spawn(loop_tick()),
        spawner.spawn(request_button(menu, PendingEvent::MenuRequested)),
        spawner.spawn(request_button(reset, PendingEvent::ResetRequested)),
    ] {
        if let Err(e) = spawned {
            error!("Task spawn failed: {}", e);
        }
    }

    let oled_i2c = I2c::new_blocking(p.I2C1, p.PB6, p.PB7, Hertz(400_000), i2c::Config::default());
    let sensor_i2c = I2c::new_blocking(p.I2C2, p.PB10, p.PB11, Hertz(100_000), i2c::Config::default());

    let keypad = board::PortKeypad::new([
        Input::new(p.PA0, Pull::Up),
        Input::new(p.PA1, Pull::Up),
        Input::new(p.PA2, Pull::Up),
        Input::new(p.PA3, Pull::Up),
        Input::new(p.PA4, Pull::Up),
    ]);

    let hw: Hardware<'static, BluePill> = Hardware {
        display: board::display::init(oled_i2c),
        sensor: board::bh1750::Bh1750::new(sensor_i2c),
        store: board::storage::FlashStore::new(Flash::new_blocking(p.FLASH)),
        keypad,
        delay: DelayEngine::new(board::InstantCounter::new(), board::Iwdg(watchdog)),
        system: board::CortexM,
        latch: &LATCH,
    };

    ModeController::<BluePill>::new(hw, &YIELD_GATE, Variant::ACTIVE, Pacing::ACTIVE).run()
}
