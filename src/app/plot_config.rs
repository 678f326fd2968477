//! Plot settings editor.
//!
//! Two levels: in `Selecting` a highlight box walks the three fields,
//! Ok/Right enters the highlighted field. Edits go to a staging copy of
//! the plot configuration; the active copy only changes when a
//! resolution edit is confirmed with Ok.
//!
//! Highlight boxes are drawn and erased individually. A full redraw only
//! happens on entry.

use embedded_graphics::prelude::{Point, Size};
use embedded_graphics::primitives::Rectangle;
use heapless::String;

use super::{AppContext, Hardware, ModeHandler, Step};
use crate::config::{
    CONFIG_LABEL_X, CONFIG_ROWS_Y, QUANTUM_50MS_TICKS, RESOLUTION_PRESETS, VALUE_TEXT_CAPACITY,
};
use crate::hal::{Board, Screen};
use crate::latch::PendingEvent;
use crate::settings::{AxisMode, PlotConfig};
use crate::ui::buttons::{ButtonReading, EdgeDetector};
use crate::ui::display;
use crate::ui::input_logic::{select_next, select_prev};
use crate::ui::layout::{format_value, text_width};
use crate::ui::FontSize;

/// Error code shown when the resolution text does not fit its buffer.
pub const RESOLUTION_TEXT_FAULT: u8 = 0xAF;
/// Error code shown when the sample time text does not fit its buffer.
pub const SAMPLE_TEXT_FAULT: u8 = 0xAA;

const FIELDS: [ConfigStage; 3] = [ConfigStage::Resolution, ConfigStage::SampleTime, ConfigStage::Graphic];
const LABELS: [&str; 3] = ["Res", "Sample", "Graphic"];
/// Values start after the longest label plus one space.
const VALUE_COLUMNS: i32 = 8;

/// Configurator sub-state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigStage {
    /// Not active.
    None,
    Selecting,
    Resolution,
    SampleTime,
    Graphic,
}

impl ConfigStage {
    fn field_index(self) -> Option<usize> {
        FIELDS.iter().position(|&f| f == self)
    }
}

type ValueText = String<VALUE_TEXT_CAPACITY>;

/// Number-to-text buffers for the editable values.
#[derive(Debug, PartialEq, Eq)]
struct ValueTexts {
    resolution: ValueText,
    sample_time: ValueText,
}

impl ValueTexts {
    /// Format `config`. On overflow returns the error code to display.
    fn new(config: &PlotConfig) -> Result<Self, u8> {
        let resolution = format_value::<VALUE_TEXT_CAPACITY>(config.resolution_count)
            .map_err(|_| RESOLUTION_TEXT_FAULT)?;
        let sample_time = format_value::<VALUE_TEXT_CAPACITY>(config.sample_time_ms)
            .map_err(|_| SAMPLE_TEXT_FAULT)?;
        Ok(Self {
            resolution,
            sample_time,
        })
    }
}

/// Next preset after `current` in direction `up` (towards larger full
/// scale). A value outside the table starts from the first preset.
fn step_preset(current: u32, up: bool) -> u32 {
    let index = RESOLUTION_PRESETS.iter().position(|&p| p == current);
    let next = match (index, up) {
        (Some(i), true) => select_prev(i),
        (Some(i), false) => select_next(i, RESOLUTION_PRESETS.len()),
        (None, _) => 0,
    };
    RESOLUTION_PRESETS[next]
}

fn row_y(field: usize) -> i32 {
    CONFIG_ROWS_Y[field]
}

fn value_x() -> i32 {
    CONFIG_LABEL_X + VALUE_COLUMNS * FontSize::Small.advance()
}

fn highlight_box(x: i32, y: i32, width: i32) -> Rectangle {
    let height = FontSize::Small.height() + 1;
    Rectangle::new(Point::new(x - 2, y - 1), Size::new((width + 3) as u32, height as u32))
}

fn label_box(field: usize) -> Rectangle {
    let width = text_width(LABELS[field], FontSize::Small.advance());
    highlight_box(CONFIG_LABEL_X, row_y(field), width)
}

fn value_box(field: usize) -> Rectangle {
    let width = VALUE_TEXT_CAPACITY as i32 * FontSize::Small.advance();
    highlight_box(value_x(), row_y(field), width)
}

fn graphic_text(config: &PlotConfig) -> &'static str {
    match config.axis_mode {
        AxisMode::BothAxis => "XY",
        AxisMode::YAxisOnly => "Y",
    }
}

/// ConfigPlot mode.
pub struct PlotConfigurator {
    stage: ConfigStage,
    cursor: ConfigStage,
    /// Highlight still to be erased after a cursor move.
    moved_from: Option<ConfigStage>,
    cursor_drawn: bool,
    value_selected: bool,
    entered_graphic: bool,
    staging: Option<PlotConfig>,
    texts: Option<ValueTexts>,
    edges: EdgeDetector,
}

impl Default for PlotConfigurator {
    fn default() -> Self {
        Self::new()
    }
}

impl PlotConfigurator {
    pub const fn new() -> Self {
        Self {
            stage: ConfigStage::None,
            cursor: ConfigStage::Resolution,
            moved_from: None,
            cursor_drawn: false,
            value_selected: false,
            entered_graphic: false,
            staging: None,
            texts: None,
            edges: EdgeDetector::new(),
        }
    }

    pub fn stage(&self) -> ConfigStage {
        self.stage
    }

    pub fn cursor(&self) -> ConfigStage {
        self.cursor
    }

    pub fn staging(&self) -> Option<&PlotConfig> {
        self.staging.as_ref()
    }

    /// Whether the graphic field has been entered since boot.
    pub fn entered_graphic(&self) -> bool {
        self.entered_graphic
    }

    /// Drop the staging copy and the text buffers.
    fn release(&mut self) {
        if self.staging.is_some() {
            debug!("Plot config: staging released");
        }
        self.staging = None;
        self.texts = None;
        self.stage = ConfigStage::None;
        self.moved_from = None;
        self.cursor_drawn = false;
        self.value_selected = false;
    }

    fn move_cursor(&mut self, to: ConfigStage) {
        if to == self.cursor {
            return;
        }
        if self.cursor_drawn {
            self.moved_from = Some(self.cursor);
        }
        self.cursor = to;
        self.cursor_drawn = false;
        trace!("Plot config: cursor at {}", to);
    }

    /// Erase a stale highlight or draw the current one. Returns `true` if
    /// anything changed.
    fn refresh_cursor<D: Screen>(&mut self, display: &mut D) -> bool {
        if let Some(previous) = self.moved_from.take() {
            if let Some(field) = previous.field_index() {
                display::outline(display, label_box(field), false);
            }
            return true;
        }
        if self.cursor_drawn {
            return false;
        }
        if let Some(field) = self.cursor.field_index() {
            display::outline(display, label_box(field), true);
        }
        self.cursor_drawn = true;
        true
    }

    /// Level 1: walk the fields until one is entered or an event is pending.
    fn select<B: Board>(&mut self, hw: &mut Hardware<'_, B>) {
        loop {
            hw.delay.feed();
            if hw.latch.is_pending() {
                return;
            }

            let mut entered = false;
            if let Some(reading) = self.edges.poll(&mut hw.keypad) {
                let at = self.cursor.field_index().unwrap_or(0);
                match reading {
                    ButtonReading::Up => self.move_cursor(FIELDS[select_prev(at)]),
                    ButtonReading::Down => self.move_cursor(FIELDS[select_next(at, FIELDS.len())]),
                    ButtonReading::Ok | ButtonReading::Right => {
                        self.stage = self.cursor;
                        if self.stage == ConfigStage::Graphic {
                            self.entered_graphic = true;
                        }
                        info!("Plot config: editing {}", self.stage);
                        entered = true;
                    }
                    _ => {}
                }
            }

            if self.refresh_cursor(&mut hw.display) {
                display::present(&mut hw.display);
                let _ = hw.pause_ticks(QUANTUM_50MS_TICKS);
            }
            if entered {
                return;
            }
        }
    }

    fn draw_value<D: Screen>(&self, display: &mut D, field: usize) {
        let (Some(staging), Some(texts)) = (self.staging.as_ref(), self.texts.as_ref()) else {
            return;
        };
        let text = match FIELDS[field] {
            ConfigStage::Resolution => texts.resolution.as_str(),
            ConfigStage::SampleTime => texts.sample_time.as_str(),
            _ => graphic_text(staging),
        };
        display::blank_row_from(display, value_x(), row_y(field), FontSize::Small);
        display::text(display, text, value_x(), row_y(field), FontSize::Small);
    }

    fn leave_value<B: Board>(&mut self, hw: &mut Hardware<'_, B>) {
        display::outline(&mut hw.display, value_box(0), false);
        display::outline(&mut hw.display, label_box(0), true);
        self.value_selected = false;
        self.stage = ConfigStage::Selecting;
        display::present(&mut hw.display);
    }

    /// Level 2 on the resolution value.
    fn edit_resolution<B: Board>(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        if !self.value_selected {
            display::outline(&mut hw.display, label_box(0), false);
            display::outline(&mut hw.display, value_box(0), true);
            display::present(&mut hw.display);
            self.value_selected = true;
        }

        let Some(reading) = self.edges.poll(&mut hw.keypad) else {
            return Step::Completed;
        };
        let Some(staging) = self.staging.as_mut() else {
            return Step::Completed;
        };

        match reading {
            ButtonReading::Up => staging.resolution_count = step_preset(staging.resolution_count, true),
            ButtonReading::Down => staging.resolution_count = step_preset(staging.resolution_count, false),
            ButtonReading::Ok => {
                ctx.plot = *staging;
                info!("Plot config: full scale {} lx", ctx.plot.resolution_count);
                self.leave_value(hw);
                return Step::Completed;
            }
            ButtonReading::Left => {
                *staging = ctx.plot;
                debug!("Plot config: resolution edit discarded");
            }
            _ => return Step::Completed,
        }

        match format_value::<VALUE_TEXT_CAPACITY>(staging.resolution_count) {
            Ok(text) => {
                if let Some(texts) = self.texts.as_mut() {
                    texts.resolution = text;
                }
            }
            Err(_) => {
                error!("Plot config: resolution text overflow");
                display::draw_allocation_error(&mut hw.display, RESOLUTION_TEXT_FAULT);
                self.release();
                return Step::Aborted;
            }
        }
        self.draw_value(&mut hw.display, 0);
        if reading == ButtonReading::Left {
            self.leave_value(hw);
        } else {
            display::outline(&mut hw.display, value_box(0), true);
            display::present(&mut hw.display);
        }
        Step::Completed
    }

    /// Level 2 on a field without edits: only Left leaves.
    fn hold_field<B: Board>(&mut self, hw: &mut Hardware<'_, B>) {
        if self.edges.poll(&mut hw.keypad) == Some(ButtonReading::Left) {
            debug!("Plot config: back from {}", self.stage);
            self.stage = ConfigStage::Selecting;
        }
    }
}

impl<B: Board> ModeHandler<B> for PlotConfigurator {
    fn on_enter(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        let staging = ctx.plot;
        let texts = match ValueTexts::new(&staging) {
            Ok(texts) => texts,
            Err(code) => {
                error!("Plot config: value text overflow, code {=u8:#x}", code);
                display::draw_allocation_error(&mut hw.display, code);
                self.release();
                return Step::Aborted;
            }
        };

        self.staging = Some(staging);
        self.texts = Some(texts);
        self.stage = ConfigStage::Selecting;
        self.moved_from = None;
        self.cursor_drawn = false;
        self.value_selected = false;
        self.edges.rearm();

        let d = &mut hw.display;
        display::clear(d);
        display::centered_text(d, "Plot Setup", 0, FontSize::Small);
        for (field, label) in LABELS.iter().enumerate() {
            display::text(d, label, CONFIG_LABEL_X, row_y(field), FontSize::Small);
        }
        for field in 0..FIELDS.len() {
            self.draw_value(&mut hw.display, field);
        }
        display::centered_text(&mut hw.display, "OK:edit LEFT:back", 52, FontSize::Small);
        display::present(&mut hw.display);
        Step::Completed
    }

    fn on_tick(&mut self, ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> Step {
        hw.delay.feed();
        let step = match self.stage {
            ConfigStage::Selecting => {
                self.select(hw);
                Step::Completed
            }
            ConfigStage::Resolution => self.edit_resolution(ctx, hw),
            ConfigStage::SampleTime | ConfigStage::Graphic => {
                self.hold_field(hw);
                Step::Completed
            }
            ConfigStage::None => Step::Completed,
        };

        if hw.latch.peek() == PendingEvent::MenuRequested {
            self.release();
        }
        step
    }
}
