//! Application core: context, hardware bundle and the mode handlers.
//!
//! ```text
//! ModeController ──► InterruptLatch / DelayEngine   (every iteration)
//!        │
//!        ├──► menu::run                             (MenuRequested)
//!        └──► ModeHandler for the current Mode
//!               ├── modes::{Continuous, Hold, ResetSensor, Placeholder}
//!               ├── plot::PlotView
//!               └── plot_config::PlotConfigurator
//! ```

pub mod controller;
pub mod faults;
pub mod menu;
pub mod modes;
pub mod plot;
pub mod plot_config;

use crate::config::QUANTUM_250MS_TICKS;
use crate::error::ErrorFlags;
use crate::hal::Board;
use crate::latch::InterruptLatch;
use crate::mode::{Mode, Variant};
use crate::settings::{PlotConfig, Settings};
use crate::timing::{DelayEngine, Wait};
use crate::ui::buttons::ButtonReading;

/// Everything the application mutates, owned by the controller.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AppContext {
    pub variant: Variant,
    pub mode: Mode,
    pub last_mode: Mode,
    /// One-shot: the next handler invocation redraws its chrome.
    pub forced_refresh: bool,
    pub settings: Settings,
    /// Active plot configuration.
    pub plot: PlotConfig,
    pub errors: ErrorFlags,
    /// Last good sensor reading, if any.
    pub measurement: Option<f32>,
    pub fault_screens_shown: u8,
}

impl AppContext {
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            mode: Settings::DEFAULT.mode,
            last_mode: Mode::Idle,
            forced_refresh: false,
            settings: Settings::DEFAULT,
            plot: PlotConfig::DEFAULT,
            errors: ErrorFlags::new(),
            measurement: None,
            fault_screens_shown: 0,
        }
    }

    /// Whether `mode` has to redraw its chrome this iteration. Consumes
    /// the forced-refresh flag; a handler may set it again for the next
    /// iteration.
    pub fn take_full_redraw(&mut self, mode: Mode) -> bool {
        let full = mode != self.last_mode || self.forced_refresh;
        self.forced_refresh = false;
        full
    }
}

/// The concrete parts of one board plus the interrupt latch.
pub struct Hardware<'a, B: Board> {
    pub display: B::Display,
    pub sensor: B::Sensor,
    pub store: B::Store,
    pub keypad: B::Keypad,
    pub delay: DelayEngine<B::Counter, B::Watchdog>,
    pub system: B::System,
    pub latch: &'a InterruptLatch,
}

impl<'a, B: Board> Hardware<'a, B> {
    /// Block until Ok is held or an interrupt event is pending.
    pub fn wait_for_ok(&mut self) -> Wait {
        self.delay
            .wait_for_press(&mut self.keypad, self.latch, ButtonReading::Ok)
    }

    /// `quanta` × 250 ms, cut short by a pending reset.
    pub fn pause_250ms(&mut self, quanta: u16) -> Wait {
        let latch = self.latch;
        self.delay
            .delay_unless(QUANTUM_250MS_TICKS, quanta, || latch.reset_pending())
    }

    /// `ticks` once, cut short by a pending reset.
    pub fn pause_ticks(&mut self, ticks: u32) -> Wait {
        let latch = self.latch;
        self.delay.delay_unless(ticks, 1, || latch.reset_pending())
    }
}

/// How a handler invocation ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Step {
    Completed,
    /// The mode could not run this iteration; it is retried on the next.
    Aborted,
}

/// Per-mode behaviour driven by the controller.
pub trait ModeHandler<B: Board> {
    /// Full redraw of the mode's chrome.
    fn on_enter(&mut self, _ctx: &mut AppContext, _hw: &mut Hardware<'_, B>) -> Step {
        Step::Completed
    }

    /// Dynamic content, once per loop iteration.
    fn on_tick(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step;
}
