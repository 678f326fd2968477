//! Integration tests for the luxmeter application core on a simulated board.

mod common;

use common::*;
use luxmeter::app::menu::{self, MenuExit};
use luxmeter::app::modes;
use luxmeter::app::plot_config::{ConfigStage, PlotConfigurator};
use luxmeter::app::{ModeHandler, Step};
use luxmeter::config::{CONFIG_LABEL_X, CONFIG_ROWS_Y};
use luxmeter::{ErrorFlags, Fault, Mode, PendingEvent, Variant};

fn booted(board: SimBoard, variant: Variant) -> luxmeter::ModeController<'static, Sim> {
    let mut controller = board.controller(variant);
    controller.boot();
    controller
}

fn open_menu(controller: &mut luxmeter::ModeController<'static, Sim>) {
    controller.hardware().latch.raise(PendingEvent::MenuRequested);
    controller.run_iteration();
}

// ── Boot ─────────────────────────────────────────────────────────────

#[test]
fn blank_store_boots_into_continuous() {
    let mut controller = booted(SimBoard::default(), Variant::Full);

    let ctx = controller.context();
    assert_eq!(ctx.mode, Mode::Continuous);
    assert_eq!(ctx.last_mode, Mode::Idle);
    assert!(ctx.settings.factory_values);
    assert_eq!(ctx.fault_screens_shown, 0);

    controller.run_iteration();
    let ctx = controller.context();
    assert_eq!(ctx.last_mode, Mode::Continuous);
    assert_eq!(ctx.measurement, Some(321.5));
    assert!(controller.hardware().display.lit_pixels() > 0);
}

#[test]
fn saved_mode_is_restored_at_boot() {
    let board = SimBoard {
        store: MemoryStore::saved(Mode::Hold.ordinal(), 2),
        ..SimBoard::default()
    };
    let controller = booted(board, Variant::Full);

    assert_eq!(controller.context().mode, Mode::Hold);
    assert_eq!(
        controller.hardware().sensor.resolution,
        Some(luxmeter::settings::SensorResolution::High)
    );
}

#[test]
fn unreadable_store_shows_its_fault_once() {
    let board = SimBoard {
        store: MemoryStore {
            fail_reads: true,
            fail_writes: true,
            ..MemoryStore::default()
        },
        // Ok dismisses the boot fault screen, then commits in the menu.
        inputs: script([press(OK), press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);

    let ctx = controller.context();
    assert_eq!(ctx.mode, Mode::Continuous);
    assert!(ctx.errors.is_latched(Fault::ConfigStore));
    assert_eq!(ctx.fault_screens_shown, 1);

    controller.run_iteration();
    open_menu(&mut controller);

    // The failed save is logged but its screen is not shown again.
    assert_eq!(controller.hardware().store.writes, 1);
    assert_eq!(controller.context().fault_screens_shown, 1);
    assert_eq!(controller.context().mode, Mode::Continuous);
}

#[test]
fn missing_sensor_keeps_running_without_readings() {
    let board = SimBoard {
        sensor: FakeSensor {
            fail_init: true,
            fail_read: true,
            ..FakeSensor::default()
        },
        inputs: script([press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);
    assert_eq!(controller.context().fault_screens_shown, 1);

    for _ in 0..3 {
        controller.run_iteration();
    }

    let ctx = controller.context();
    assert!(ctx.errors.is_latched(Fault::SensorNotConnected));
    assert_eq!(ctx.measurement, None);
    assert_eq!(ctx.fault_screens_shown, 1);
    assert_eq!(ctx.last_mode, Mode::Continuous);
    assert_eq!(controller.hardware().sensor.reads, 3);
}

#[test]
fn watchdog_is_fed_every_iteration() {
    let mut controller = booted(SimBoard::default(), Variant::Full);

    let mut last = controller.hardware().delay.watchdog().feeds;
    assert!(last > 0);
    for _ in 0..5 {
        controller.run_iteration();
        let feeds = controller.hardware().delay.watchdog().feeds;
        assert!(feeds > last);
        last = feeds;
    }
    assert_eq!(controller.hardware().system.sleeps, 5);
}

// ── Mode controller ──────────────────────────────────────────────────

#[test]
fn chrome_is_redrawn_only_on_mode_change_or_refresh() {
    let board = SimBoard {
        inputs: script([press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);
    let base = controller.hardware().display.clears;

    // Idle -> Continuous.
    controller.run_iteration();
    assert_eq!(controller.hardware().display.clears, base + 1);

    controller.run_iteration();
    controller.run_iteration();
    assert_eq!(controller.hardware().display.clears, base + 1);

    // Reselecting the same mode: menu screen plus a forced redraw.
    open_menu(&mut controller);
    assert_eq!(controller.context().mode, Mode::Continuous);
    assert_eq!(controller.hardware().display.clears, base + 3);
    assert!(!controller.context().forced_refresh);

    controller.run_iteration();
    assert_eq!(controller.hardware().display.clears, base + 3);
}

#[test]
#[should_panic(expected = "system restart")]
fn reset_request_restarts_the_system() {
    let mut controller = booted(SimBoard::default(), Variant::Full);
    controller.run_iteration();

    controller.hardware().latch.raise(PendingEvent::ResetRequested);
    controller.run_iteration();
}

#[test]
#[should_panic(expected = "system restart")]
fn reset_during_menu_restarts_after_leaving_it() {
    let mut inputs = script([press(RIGHT)]);
    inputs.push(Input::Raise(PendingEvent::ResetRequested));
    let board = SimBoard {
        inputs,
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);
    controller.run_iteration();
    open_menu(&mut controller);
}

// ── Menu ─────────────────────────────────────────────────────────────

#[test]
fn menu_commits_two_steps_right_and_persists_it() {
    let board = SimBoard {
        // Right, Right, Ok; the last Ok dismisses the plot prompt.
        inputs: script([press(RIGHT), press(RIGHT), press(OK), press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);
    controller.run_iteration();
    open_menu(&mut controller);

    let ctx = controller.context();
    assert_eq!(ctx.mode, Mode::Plot);
    assert_eq!(ctx.last_mode, Mode::Plot);
    assert_eq!(controller.hardware().store.slots[1], Some(Mode::Plot.ordinal()));
    assert_eq!(controller.hardware().latch.peek(), PendingEvent::None);
}

#[test]
fn committed_mode_is_restored_after_a_restart() {
    let board = SimBoard {
        // Right, Ok picks Hold; the last Ok releases the frozen reading.
        inputs: script([press(RIGHT), press(OK), press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);
    controller.run_iteration();
    open_menu(&mut controller);
    assert_eq!(controller.context().mode, Mode::Hold);

    let slots = controller.hardware().store.slots;
    assert_eq!(slots[0], Some(0));
    assert_eq!(slots[1], Some(Mode::Hold.ordinal()));

    let restarted = booted(
        SimBoard {
            store: MemoryStore {
                slots,
                ..MemoryStore::default()
            },
            ..SimBoard::default()
        },
        Variant::Full,
    );
    assert_eq!(restarted.context().mode, Mode::Hold);
    assert!(!restarted.context().settings.factory_values);
}

#[test]
fn menu_wraps_in_both_directions() {
    let board = SimBoard {
        // Left wraps to the last mode, Right wraps back to the first.
        inputs: script([press(LEFT), press(RIGHT), press(RIGHT), press(OK), press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Full);
    controller.run_iteration();
    open_menu(&mut controller);

    assert_eq!(controller.context().mode, Mode::Hold);
    assert_eq!(controller.hardware().store.slots[1], Some(Mode::Hold.ordinal()));
}

#[test]
fn economic_menu_skips_plot_modes() {
    let board = SimBoard {
        // Right, Right lands on ResetSensor; Ok confirms the notice.
        inputs: script([press(RIGHT), press(RIGHT), press(OK), press(OK)]),
        ..SimBoard::default()
    };
    let mut controller = booted(board, Variant::Economic);
    controller.run_iteration();
    open_menu(&mut controller);

    let ctx = controller.context();
    assert_eq!(controller.hardware().store.slots[1], Some(Mode::ResetSensor.ordinal()));
    assert_eq!(controller.hardware().sensor.recalibrations, 1);
    // The sensor reset hands control back to the previous mode.
    assert_eq!(ctx.mode, Mode::Continuous);
    assert_eq!(ctx.last_mode, Mode::ResetSensor);

    controller.run_iteration();
    assert_eq!(controller.context().last_mode, Mode::Continuous);
}

#[test]
fn menu_leaves_a_pending_reset_in_the_latch() {
    let mut inputs = script([press(RIGHT)]);
    inputs.push(Input::Raise(PendingEvent::ResetRequested));
    let board = SimBoard {
        inputs,
        ..SimBoard::default()
    };
    let (mut ctx, mut hw) = board.parts(Variant::Full);

    assert_eq!(menu::run(&mut ctx, &mut hw), MenuExit::ResetPending);
    assert_eq!(hw.latch.peek(), PendingEvent::ResetRequested);
    assert_eq!(ctx.mode, Mode::Continuous);
    assert_eq!(hw.store.writes, 0);
}

#[test]
fn menu_discards_a_repeated_menu_request() {
    let mut inputs = script([press(RIGHT)]);
    inputs.push(Input::Raise(PendingEvent::MenuRequested));
    inputs.extend(press(OK));
    let board = SimBoard {
        inputs,
        ..SimBoard::default()
    };
    let (mut ctx, mut hw) = board.parts(Variant::Full);
    ctx.last_mode = Mode::Continuous;

    assert_eq!(menu::run(&mut ctx, &mut hw), MenuExit::Committed(Mode::Hold));
    assert_eq!(ctx.mode, Mode::Hold);
    assert_eq!(hw.latch.peek(), PendingEvent::None);
}

// ── Hold ─────────────────────────────────────────────────────────────

#[test]
fn hold_reads_once_and_waits_for_ok() {
    let board = SimBoard {
        inputs: vec![Input::Hold(IDLE, 50), Input::Hold(OK, 1)],
        ..SimBoard::default()
    };
    let (mut ctx, mut hw) = board.parts(Variant::Full);

    assert_eq!(modes::Hold.on_tick(&mut ctx, &mut hw), Step::Completed);
    assert_eq!(hw.keypad.samples, 51);
    assert_eq!(hw.sensor.reads, 1);
    assert_eq!(ctx.measurement, Some(321.5));
}

#[test]
fn hold_gives_up_waiting_when_an_event_is_pending() {
    let board = SimBoard {
        inputs: vec![Input::Hold(IDLE, 5), Input::Raise(PendingEvent::MenuRequested)],
        ..SimBoard::default()
    };
    let (mut ctx, mut hw) = board.parts(Variant::Full);

    assert_eq!(modes::Hold.on_tick(&mut ctx, &mut hw), Step::Completed);
    assert_eq!(hw.keypad.samples, 6);
    assert_eq!(hw.latch.peek(), PendingEvent::MenuRequested);
}

// ── Sensor reset ─────────────────────────────────────────────────────

#[test]
fn failed_recalibration_is_reported_and_falls_back_to_continuous() {
    let board = SimBoard {
        store: MemoryStore::saved(Mode::ResetSensor.ordinal(), 1),
        sensor: FakeSensor {
            fail_recalibrate: true,
            ..FakeSensor::default()
        },
        // Fault screen, then the reset notice.
        inputs: script([press(OK), press(OK)]),
    };
    let mut controller = booted(board, Variant::Full);
    assert_eq!(controller.context().mode, Mode::ResetSensor);

    controller.run_iteration();

    let ctx = controller.context();
    assert!(ctx.errors.is_latched(Fault::Recalibration));
    assert_eq!(ctx.fault_screens_shown, 1);
    // Nothing ran before, so there is no mode to go back to.
    assert_eq!(ctx.mode, Mode::Continuous);
}

// ── Plot configurator ────────────────────────────────────────────────

fn config_plot_board(inputs: Vec<Input>) -> SimBoard {
    SimBoard {
        store: MemoryStore::saved(Mode::ConfigPlot.ordinal(), 1),
        inputs,
        ..SimBoard::default()
    }
}

#[test]
fn configurator_cursor_stops_at_the_first_field() {
    let mut inputs = script([press(UP), press(UP)]);
    inputs.push(Input::Raise(PendingEvent::MenuRequested));
    let mut controller = booted(config_plot_board(inputs), Variant::Full);

    controller.run_iteration();

    let config = controller.plot_configurator();
    assert_eq!(config.cursor(), ConfigStage::Resolution);
    // Leaving for the menu releases the staging copy.
    assert_eq!(config.stage(), ConfigStage::None);
    assert!(config.staging().is_none());
    assert_eq!(controller.hardware().latch.peek(), PendingEvent::MenuRequested);
}

#[test]
fn configurator_cursor_stops_at_the_last_field() {
    let mut inputs = script([press(DOWN), press(DOWN), press(DOWN), press(DOWN)]);
    inputs.push(Input::Raise(PendingEvent::MenuRequested));
    let mut controller = booted(config_plot_board(inputs), Variant::Full);

    controller.run_iteration();

    assert_eq!(controller.plot_configurator().cursor(), ConfigStage::Graphic);
}

#[test]
fn sample_time_field_only_leaves_with_left() {
    let inputs = script([press(DOWN), press(OK), press(UP), press(LEFT)]);
    let mut controller = booted(config_plot_board(inputs), Variant::Full);

    controller.run_iteration();
    assert_eq!(controller.plot_configurator().stage(), ConfigStage::SampleTime);

    run_until(&mut controller, 20, |c| {
        c.plot_configurator().stage() == ConfigStage::Selecting
    });
    assert_eq!(controller.context().plot.sample_time_ms, 10);
    assert!(!controller.plot_configurator().entered_graphic());
}

#[test]
fn resolution_edit_applies_only_on_ok() {
    let inputs = script([press(OK), press(DOWN), press(OK)]);
    let mut controller = booted(config_plot_board(inputs), Variant::Full);

    controller.run_iteration();
    assert_eq!(controller.plot_configurator().stage(), ConfigStage::Resolution);

    run_until(&mut controller, 20, |c| {
        c.plot_configurator().staging().map(|s| s.resolution_count) == Some(27_306)
    });
    assert_eq!(controller.context().plot.resolution_count, 54_612);

    run_until(&mut controller, 20, |c| {
        c.plot_configurator().stage() == ConfigStage::Selecting
    });
    assert_eq!(controller.context().plot.resolution_count, 27_306);
}

#[test]
fn resolution_edit_is_discarded_with_left() {
    let inputs = script([press(OK), press(DOWN), press(DOWN), press(LEFT)]);
    let mut controller = booted(config_plot_board(inputs), Variant::Full);

    controller.run_iteration();
    run_until(&mut controller, 30, |c| {
        c.plot_configurator().stage() == ConfigStage::Selecting
    });

    assert_eq!(controller.context().plot.resolution_count, 54_612);
    assert_eq!(
        controller.plot_configurator().staging().map(|s| s.resolution_count),
        Some(54_612)
    );
}

#[test]
fn configurator_restarts_at_selection_with_the_cursor_kept() {
    let mut inputs = script([press(DOWN)]);
    inputs.push(Input::Raise(PendingEvent::MenuRequested));
    inputs.push(Input::Hold(IDLE, 1));
    // Menu opens on ConfigPlot; Ok reselects it.
    inputs.push(Input::Hold(OK, 1));
    inputs.push(Input::Raise(PendingEvent::MenuRequested));
    inputs.push(Input::Hold(IDLE, 1));
    let mut controller = booted(config_plot_board(inputs), Variant::Full);

    controller.run_iteration();
    assert_eq!(controller.plot_configurator().stage(), ConfigStage::None);

    controller.run_iteration();
    let config = controller.plot_configurator();
    assert_eq!(controller.context().mode, Mode::ConfigPlot);
    assert_eq!(config.cursor(), ConfigStage::SampleTime);
    assert_eq!(config.stage(), ConfigStage::None);
}

#[test]
fn editing_the_resolution_moves_the_highlight_to_the_value() {
    let inputs = script([press(OK), press(OK)]);
    let mut controller = booted(config_plot_board(inputs), Variant::Full);
    // Top-left corner of the "Res" label box.
    let (x, y) = (CONFIG_LABEL_X - 2, CONFIG_ROWS_Y[0] - 1);

    controller.run_iteration();
    assert_eq!(controller.plot_configurator().stage(), ConfigStage::Resolution);
    assert!(controller.hardware().display.is_lit(x, y));

    controller.run_iteration();
    assert!(!controller.hardware().display.is_lit(x, y));

    run_until(&mut controller, 20, |c| {
        c.plot_configurator().stage() == ConfigStage::Selecting
    });
    assert!(controller.hardware().display.is_lit(x, y));
}

#[test]
fn oversized_plot_values_abort_entry_without_latching() {
    let (mut ctx, mut hw) = SimBoard::default().parts(Variant::Full);
    let mut configurator = PlotConfigurator::new();
    ctx.plot.resolution_count = 123_456;

    assert_eq!(configurator.on_enter(&mut ctx, &mut hw), Step::Aborted);
    // Error screen with the resolution buffer code.
    assert_eq!(hw.display.clears, 1);
    assert!(hw.display.lit_pixels() > 0);
    assert_eq!(ctx.errors, ErrorFlags::new());
    assert_eq!(ctx.fault_screens_shown, 0);
    assert_eq!(configurator.stage(), ConfigStage::None);
    assert!(configurator.staging().is_none());

    ctx.plot.resolution_count = 27_306;
    assert_eq!(configurator.on_enter(&mut ctx, &mut hw), Step::Completed);
    assert_eq!(configurator.stage(), ConfigStage::Selecting);
    assert_eq!(
        configurator.staging().map(|s| s.resolution_count),
        Some(27_306)
    );
}

#[test]
fn aborted_configurator_entry_is_retried_next_iteration() {
    let inputs = vec![Input::Raise(PendingEvent::MenuRequested)];
    let mut controller = booted(config_plot_board(inputs), Variant::Full);
    controller.context_mut().plot.resolution_count = 123_456;

    controller.run_iteration();
    let ctx = controller.context();
    assert_eq!(ctx.last_mode, Mode::Idle);
    assert!(ctx.forced_refresh);
    assert_eq!(ctx.errors, ErrorFlags::new());

    controller.context_mut().plot.resolution_count = 54_612;
    controller.run_iteration();
    let ctx = controller.context();
    assert_eq!(ctx.last_mode, Mode::ConfigPlot);
    assert!(!ctx.forced_refresh);
    assert_eq!(ctx.fault_screens_shown, 0);
}

// ── Interrupt latch ──────────────────────────────────────────────────

#[test]
fn latch_keeps_one_menu_request_until_reset_overrides_it() {
    let latch = luxmeter::InterruptLatch::new();

    latch.raise(PendingEvent::MenuRequested);
    latch.raise(PendingEvent::MenuRequested);
    assert_eq!(latch.consume(), PendingEvent::MenuRequested);
    assert_eq!(latch.consume(), PendingEvent::None);

    latch.raise(PendingEvent::MenuRequested);
    latch.raise(PendingEvent::ResetRequested);
    latch.raise(PendingEvent::MenuRequested);
    assert_eq!(latch.consume(), PendingEvent::ResetRequested);
}
