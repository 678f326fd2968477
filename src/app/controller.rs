//! Top-level mode state machine.

use super::menu::{self, MenuExit};
use super::modes::{report_sensor_error, Continuous, Hold, Placeholder, ResetSensor};
use super::plot::PlotView;
use super::plot_config::PlotConfigurator;
use super::{faults, AppContext, Hardware, ModeHandler, Step};
use crate::config::{RESET_SCREEN_QUANTA, SPLASH_QUANTA, VERSION};
use crate::error::Fault;
use crate::hal::{Board, LightSensor, System};
use crate::latch::PendingEvent;
use crate::mode::{Mode, Variant};
use crate::settings::Settings;
use crate::timing::{Pacing, YieldGate};
use crate::ui::display;

/// One handler per mode.
#[derive(Default)]
struct Handlers {
    continuous: Continuous,
    hold: Hold,
    plot: PlotView,
    config_plot: PlotConfigurator,
    reset_sensor: ResetSensor,
    placeholder: Placeholder,
}

impl Handlers {
    fn get_mut<B: Board>(&mut self, mode: Mode) -> &mut dyn ModeHandler<B> {
        match mode {
            Mode::Continuous => &mut self.continuous,
            Mode::Hold => &mut self.hold,
            Mode::Plot => &mut self.plot,
            Mode::ConfigPlot => &mut self.config_plot,
            Mode::ResetSensor => &mut self.reset_sensor,
            Mode::SelectSensor | Mode::Idle | Mode::SelectDiode => &mut self.placeholder,
        }
    }
}

/// Owns the application context and drives one mode per loop iteration.
pub struct ModeController<'a, B: Board> {
    ctx: AppContext,
    hw: Hardware<'a, B>,
    gate: &'a YieldGate,
    pacing: Pacing,
    handlers: Handlers,
}

impl<'a, B: Board> ModeController<'a, B> {
    pub fn new(hw: Hardware<'a, B>, gate: &'a YieldGate, variant: Variant, pacing: Pacing) -> Self {
        Self {
            ctx: AppContext::new(variant),
            hw,
            gate,
            pacing,
            handlers: Handlers::default(),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut AppContext {
        &mut self.ctx
    }

    pub fn hardware(&self) -> &Hardware<'a, B> {
        &self.hw
    }

    pub fn hardware_mut(&mut self) -> &mut Hardware<'a, B> {
        &mut self.hw
    }

    pub fn plot_configurator(&self) -> &PlotConfigurator {
        &self.handlers.config_plot
    }

    /// Splash, settings restore and sensor bring-up.
    pub fn boot(&mut self) {
        self.hw.delay.feed();
        display::draw_splash(&mut self.hw.display, VERSION);
        info!("Boot: {} ({})", VERSION, self.ctx.variant);

        match Settings::load(&mut self.hw.store, self.ctx.variant) {
            Ok(settings) => {
                self.ctx.settings = settings;
                self.ctx.mode = settings.mode;
            }
            Err(e) => {
                error!("Boot: settings unreadable: {}", e);
                faults::report(&mut self.ctx, &mut self.hw, Fault::ConfigStore);
            }
        }
        self.hw.delay.feed();

        if let Err(e) = self.hw.sensor.init(self.ctx.settings.sensor_resolution) {
            error!("Boot: sensor init failed: {}", e);
            report_sensor_error(&mut self.ctx, &mut self.hw, e);
        }

        let _ = self.hw.pause_250ms(SPLASH_QUANTA);
        display::clear(&mut self.hw.display);
        display::present(&mut self.hw.display);
        info!("Boot: starting in {}", self.ctx.mode);
    }

    /// Boot, then run the loop forever.
    pub fn run(mut self) -> ! {
        self.boot();
        loop {
            self.run_iteration();
        }
    }

    /// One pass of the main loop.
    pub fn run_iteration(&mut self) {
        match self.hw.latch.consume() {
            PendingEvent::MenuRequested => {
                if menu::run(&mut self.ctx, &mut self.hw) == MenuExit::ResetPending {
                    debug!("Menu: left for a pending reset");
                }
                self.ctx.forced_refresh = true;
                if self.hw.latch.reset_pending() {
                    let _ = self.hw.latch.consume();
                    self.reset();
                }
            }
            PendingEvent::ResetRequested => self.reset(),
            PendingEvent::None => {}
        }

        self.dispatch();

        self.hw.delay.feed();
        self.gate
            .pace(self.pacing, &mut self.hw.delay, &mut self.hw.system);
    }

    fn dispatch(&mut self) {
        let mode = self.ctx.mode;
        let full = self.ctx.take_full_redraw(mode);
        let handler = self.handlers.get_mut::<B>(mode);

        let step = if full {
            match handler.on_enter(&mut self.ctx, &mut self.hw) {
                Step::Completed => handler.on_tick(&mut self.ctx, &mut self.hw),
                Step::Aborted => Step::Aborted,
            }
        } else {
            handler.on_tick(&mut self.ctx, &mut self.hw)
        };

        match step {
            Step::Completed => {
                if mode != self.ctx.last_mode {
                    debug!("Mode: {} -> {}", self.ctx.last_mode, mode);
                }
                self.ctx.last_mode = mode;
            }
            Step::Aborted => {
                warn!("Mode: {} aborted, retrying", mode);
                self.ctx.forced_refresh = true;
            }
        }
    }

    /// Show the reset notice and restart. Not cancellable.
    fn reset(&mut self) -> ! {
        warn!("Reset requested");
        display::draw_reset(&mut self.hw.display);
        self.hw.delay.delay_250ms(RESET_SCREEN_QUANTA);
        self.hw.system.restart()
    }
}
