//! Scrolling-free light plot: one pixel column per sample period.

use embedded_graphics::prelude::Point;

use super::modes::sample_sensor;
use super::{AppContext, Hardware, ModeHandler, Step};
use crate::config::{LOOP_TICK_MS, PLOT_LEGEND_TOP, PLOT_X_AXIS_Y, SCREEN_HEIGHT, SCREEN_WIDTH};
use crate::hal::Board;
use crate::settings::{AxisMode, PlotConfig};
use crate::timing::Wait;
use crate::ui::display;
use crate::ui::layout::{center_x, digit_count, format_value};
use crate::ui::FontSize;

const PROMPT: [&str; 3] = ["Press OK", "to start", "the plot"];
const PROMPT_LINE_SPACING: i32 = 11;

/// Pixel geometry of the rendered axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Frame {
    y_axis_x: i32,
    /// Last column the trace may use.
    last_column: i32,
    /// Row of the full-scale tick.
    full_scale_y: i32,
    /// Row of zero.
    zero_y: i32,
}

impl Frame {
    fn new(config: &PlotConfig) -> Self {
        let advance = FontSize::Small.advance();
        let y_axis_x = digit_count(config.resolution_count, false) as i32 * advance + 5;
        let last_column = match (config.axis_mode, config.print_legends) {
            (AxisMode::BothAxis, true) => SCREEN_WIDTH - 9,
            _ => SCREEN_WIDTH - 1,
        };
        let axis_top = if config.print_legends {
            PLOT_LEGEND_TOP
        } else {
            0
        };
        let zero_y = match config.axis_mode {
            AxisMode::BothAxis => PLOT_X_AXIS_Y,
            AxisMode::YAxisOnly => SCREEN_HEIGHT - 1,
        };
        Self {
            y_axis_x,
            last_column,
            full_scale_y: axis_top + 10,
            zero_y,
        }
    }

    /// Row for `lux`, clamped to the plotting area.
    fn row(&self, lux: f32, full_scale: u32) -> i32 {
        if full_scale == 0 {
            return self.zero_y;
        }
        let ratio = (lux / full_scale as f32).clamp(0.0, 1.0);
        let span = (self.zero_y - self.full_scale_y) as f32;
        self.zero_y - (ratio * span) as i32
    }
}

/// Plot mode.
#[derive(Default)]
pub struct PlotView {
    rendered: Option<PlotConfig>,
    frame: Option<Frame>,
    column: i32,
    ticks_since_sample: u32,
}

impl PlotView {
    fn needs_redraw(&self, config: &PlotConfig) -> bool {
        match self.frame {
            Some(frame) => self.rendered.as_ref() != Some(config) || self.column > frame.last_column,
            None => true,
        }
    }
}

/// Loop iterations per sample, at least one.
fn sample_period_ticks(config: &PlotConfig) -> u32 {
    config.sample_time_ms.div_ceil(LOOP_TICK_MS).max(1)
}

fn draw_axes<B: Board>(hw: &mut Hardware<'_, B>, config: &PlotConfig, frame: &Frame) {
    let d = &mut hw.display;
    let advance = FontSize::Small.advance();
    let x = frame.y_axis_x;

    display::clear(d);

    if config.axis_mode == AxisMode::BothAxis {
        let end = frame.last_column + 1;
        display::line(d, Point::new(0, PLOT_X_AXIS_Y), Point::new(end, PLOT_X_AXIS_Y));
        display::filled_triangle(
            d,
            Point::new(end - 5, PLOT_X_AXIS_Y - 3),
            Point::new(end - 5, PLOT_X_AXIS_Y + 3),
            Point::new(end, PLOT_X_AXIS_Y),
        );
        if config.print_legends {
            display::text(d, "t", end + 2, PLOT_X_AXIS_Y - 5, FontSize::Small);
        }
    }

    let axis_top = frame.full_scale_y - 10;
    if config.print_legends {
        display::text(d, "lx", x + 4, 0, FontSize::Small);
    }
    display::line(d, Point::new(x, frame.zero_y), Point::new(x, axis_top));
    display::filled_triangle(
        d,
        Point::new(x - 3, axis_top + 5),
        Point::new(x + 3, axis_top + 5),
        Point::new(x, axis_top),
    );

    // Tick labels: full scale and half with legends, quarters without.
    let quarters: &[u32] = if config.print_legends {
        &[4, 2]
    } else {
        &[4, 3, 2, 1]
    };
    let span = frame.zero_y - frame.full_scale_y;
    for &q in quarters {
        let value = config.resolution_count / 4 * q;
        let y = frame.zero_y - span * q as i32 / 4;
        if let Ok(label) = format_value::<10>(value) {
            display::text(d, label.as_str(), 0, y - 5, FontSize::Small);
            let label_end = digit_count(value, false) as i32 * advance + 1;
            display::line(d, Point::new(label_end, y), Point::new(x, y));
        }
    }

    display::present(d);
}

/// Centre of the prompt between the Y axis and the right edge.
fn prompt_origin(frame: &Frame) -> (i32, i32) {
    let x = center_x(PROMPT[0], frame.y_axis_x, SCREEN_WIDTH, FontSize::Small.advance());
    let block = PROMPT_LINE_SPACING * 2 + FontSize::Small.height();
    let y = (frame.zero_y - block) / 2;
    (x, y)
}

impl<B: Board> ModeHandler<B> for PlotView {
    fn on_enter(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        let config = ctx.plot;
        let frame = Frame::new(&config);
        debug!("Plot: axes for full scale {}", config.resolution_count);

        draw_axes(hw, &config, &frame);
        self.rendered = Some(config);
        self.frame = Some(frame);
        self.column = frame.y_axis_x + 1;
        self.ticks_since_sample = 0;

        let (x, y) = prompt_origin(&frame);
        for (i, line) in PROMPT.iter().enumerate() {
            let row = y + i as i32 * PROMPT_LINE_SPACING;
            display::text(&mut hw.display, line, x, row, FontSize::Small);
        }
        display::present(&mut hw.display);

        if hw.wait_for_ok() == Wait::Interrupted {
            return Step::Completed;
        }

        for i in 0..PROMPT.len() as i32 {
            let row = y + i * PROMPT_LINE_SPACING;
            display::blank_row_from(&mut hw.display, frame.y_axis_x + 1, row, FontSize::Small);
        }
        display::present(&mut hw.display);
        Step::Completed
    }

    fn on_tick(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        if self.needs_redraw(&ctx.plot) {
            return <Self as ModeHandler<B>>::on_enter(self, ctx, hw);
        }
        let Some(frame) = self.frame else {
            return Step::Completed;
        };

        self.ticks_since_sample += 1;
        if self.ticks_since_sample < sample_period_ticks(&ctx.plot) {
            return Step::Completed;
        }
        self.ticks_since_sample = 0;

        if let Some(lux) = sample_sensor(ctx, hw) {
            let y = frame.row(lux, ctx.plot.resolution_count);
            display::pixel(&mut hw.display, Point::new(self.column, y));
            display::present(&mut hw.display);
        }
        self.column += 1;
        Step::Completed
    }
}
