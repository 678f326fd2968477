//! Latched user-facing fault screens.

use super::{AppContext, Hardware};
use crate::error::Fault;
use crate::hal::Board;
use crate::ui::display;

/// Show the screen for `fault` once per run.
///
/// The screen waits for Ok (or a pending interrupt event) and then sets
/// the fault's latch. Later reports of the same fault only log. Returns
/// `true` if the screen was shown.
pub fn report<B: Board>(ctx: &mut AppContext, hw: &mut Hardware<'_, B>, fault: Fault) -> bool {
    if ctx.errors.is_latched(fault) {
        debug!("Fault {} already reported", fault);
        return false;
    }

    error!("Fault: {}", fault);
    display::draw_fault(&mut hw.display, fault);
    let _ = hw.wait_for_ok();

    ctx.errors.latch(fault);
    ctx.fault_screens_shown = ctx.fault_screens_shown.saturating_add(1);
    // The fault screen replaced whatever the current mode had drawn.
    ctx.forced_refresh = true;
    true
}
