//! Measurement, hold, sensor reset and placeholder modes.

use super::{faults, AppContext, Hardware, ModeHandler, Step};
use crate::error::{Error, Fault};
use crate::hal::{Board, LightSensor};
use crate::mode::Mode;
use crate::ui::display;

/// Read the sensor into `ctx.measurement`.
///
/// On failure the previous reading stays in place and the fault screen is
/// shown once.
pub(crate) fn sample_sensor<B: Board>(ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Option<f32> {
    match hw.sensor.read_lux() {
        Ok(lux) => {
            ctx.measurement = Some(lux);
            Some(lux)
        }
        Err(e) => {
            trace!("Sensor read failed: {}", e);
            report_sensor_error(ctx, hw, e);
            None
        }
    }
}

pub(crate) fn report_sensor_error<B: Board>(ctx: &mut AppContext, hw: &mut Hardware<'_, B>, e: Error) {
    if let Some(fault) = e.fault() {
        faults::report(ctx, hw, fault);
    }
}

/// Live readout, refreshed every iteration.
#[derive(Default)]
pub struct Continuous;

impl<B: Board> ModeHandler<B> for Continuous {
    fn on_enter(&mut self, _ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        display::draw_measure_chrome(&mut hw.display, Mode::Continuous);
        Step::Completed
    }

    fn on_tick(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        sample_sensor(ctx, hw);
        display::draw_readout(&mut hw.display, ctx.measurement);
        display::present(&mut hw.display);
        Step::Completed
    }
}

/// Readout that stays frozen until Ok is pressed.
#[derive(Default)]
pub struct Hold;

impl<B: Board> ModeHandler<B> for Hold {
    fn on_enter(&mut self, _ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        display::draw_measure_chrome(&mut hw.display, Mode::Hold);
        Step::Completed
    }

    fn on_tick(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        sample_sensor(ctx, hw);
        display::draw_readout(&mut hw.display, ctx.measurement);
        display::present(&mut hw.display);
        let _ = hw.wait_for_ok();
        Step::Completed
    }
}

/// One-shot action: recalibrate, confirm, then return to the mode that
/// was running before.
#[derive(Default)]
pub struct ResetSensor;

impl<B: Board> ModeHandler<B> for ResetSensor {
    fn on_tick(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        if let Err(e) = hw.sensor.recalibrate() {
            warn!("Sensor recalibration failed: {}", e);
            faults::report(ctx, hw, Fault::Recalibration);
        }

        display::draw_sensor_reset(&mut hw.display);
        let _ = hw.wait_for_ok();

        let previous = ctx.last_mode;
        ctx.mode = if previous != Mode::ResetSensor && ctx.variant.is_enabled(previous) {
            previous
        } else {
            Mode::Continuous
        };
        info!("Sensor reset, back to {}", ctx.mode);
        Step::Completed
    }
}

/// Reserved modes without behaviour yet.
#[derive(Default)]
pub struct Placeholder;

impl<B: Board> ModeHandler<B> for Placeholder {
    fn on_tick(&mut self, _ctx: &mut AppContext, _hw: &mut Hardware<'_, B>) -> Step {
        Step::Completed
    }
}
