//! Full-screen mode selector.
//!
//! Right/Left walk the variant's enabled-mode list with wraparound, Ok
//! commits and persists the highlighted mode. A pending reset request
//! ends the menu at once and is left in the latch for the controller.

use super::{faults, AppContext, Hardware};
use crate::config::{SELECT_FLASH_COUNT, SELECT_FLASH_TICKS};
use crate::error::{Error, Fault};
use crate::hal::{Board, ConfigStore};
use crate::mode::Mode;
use crate::settings::StoreSlot;
use crate::timing::Wait;
use crate::ui::buttons::{ButtonReading, EdgeDetector};
use crate::ui::display;

/// How the menu was left.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MenuExit {
    Committed(Mode),
    /// A reset request is pending and must be handled by the caller.
    ResetPending,
}

/// Run the menu until a mode is committed or a reset is pending.
pub fn run<B: Board>(ctx: &mut AppContext, hw: &mut Hardware<'_, B>) -> MenuExit {
    // Let the menu button settle.
    if hw.pause_250ms(1) == Wait::Interrupted {
        return MenuExit::ResetPending;
    }

    let mut candidate = ctx.variant.menu_start(ctx.last_mode);
    debug!("Menu: open at {}", candidate);
    display::draw_menu(&mut hw.display);
    display::draw_menu_label(&mut hw.display, candidate);
    display::present(&mut hw.display);

    let mut edges = EdgeDetector::new();
    loop {
        hw.delay.feed();
        if hw.latch.reset_pending() {
            return MenuExit::ResetPending;
        }

        let Some(reading) = edges.poll(&mut hw.keypad) else {
            continue;
        };
        match reading {
            ButtonReading::Right => candidate = ctx.variant.next_mode(candidate),
            ButtonReading::Left => candidate = ctx.variant.prev_mode(candidate),
            ButtonReading::Ok => return commit(ctx, hw, candidate),
            _ => continue,
        }
        display::draw_menu_label(&mut hw.display, candidate);
        display::present(&mut hw.display);
    }
}

/// Persist `mode`. The first save also clears the factory flag so the
/// stored values are used at the next boot.
fn save_mode(ctx: &mut AppContext, store: &mut impl ConfigStore, mode: Mode) -> Result<(), Error> {
    store.write(StoreSlot::Mode, mode.ordinal())?;
    if ctx.settings.factory_values {
        store.write(StoreSlot::FactoryReset, 0)?;
        ctx.settings.factory_values = false;
        debug!("Menu: factory values replaced");
    }
    ctx.settings.mode = mode;
    Ok(())
}

fn commit<B: Board>(ctx: &mut AppContext, hw: &mut Hardware<'_, B>, mode: Mode) -> MenuExit {
    info!("Menu: {} selected", mode);
    ctx.mode = mode;

    if let Err(e) = save_mode(ctx, &mut hw.store, mode) {
        warn!("Menu: saving mode failed: {}", e);
        if faults::report(ctx, hw, Fault::ConfigStore) {
            display::draw_menu(&mut hw.display);
        }
    }

    for _ in 0..SELECT_FLASH_COUNT {
        display::draw_menu_label(&mut hw.display, mode);
        display::present(&mut hw.display);
        if hw.pause_ticks(SELECT_FLASH_TICKS) == Wait::Interrupted {
            return MenuExit::ResetPending;
        }
        display::blank_menu_label(&mut hw.display);
        display::present(&mut hw.display);
        if hw.pause_ticks(SELECT_FLASH_TICKS) == Wait::Interrupted {
            return MenuExit::ResetPending;
        }
    }

    // A bounce of the menu button while the menu was open must not
    // reopen it.
    hw.latch.discard_menu_request();
    MenuExit::Committed(mode)
}
