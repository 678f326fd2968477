//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, screen layout coordinates and persistence
//! addresses live here so they can be tuned in one place.

// Firmware identity

/// Version string shown on the boot splash.
#[cfg(feature = "economic")]
pub const VERSION: &str = "Version E.3";
#[cfg(not(feature = "economic"))]
pub const VERSION: &str = "Version 0.3";

// Timing

/// Rate of the free-running delay counter (72 MHz / 275 prescaler).
pub const COUNTER_HZ: u32 = 261_818;

/// Counter ticks in one 250 ms delay quantum.
pub const QUANTUM_250MS_TICKS: u32 = 65_454;

/// Counter ticks in one 50 ms delay quantum.
pub const QUANTUM_50MS_TICKS: u32 = 13_139;

/// Counter ticks the selected mode label stays visible during the
/// menu confirmation flash (~114 ms).
pub const SELECT_FLASH_TICKS: u32 = 30_000;

/// Number of label flashes played when a mode is committed.
pub const SELECT_FLASH_COUNT: u16 = 4;

/// Hardware watchdog timeout (ms). Every polling loop feeds it far
/// more often than this.
pub const WATCHDOG_TIMEOUT_MS: u32 = 400;

/// Period of the cooperative-yield tick that paces the main loop (ms).
pub const LOOP_TICK_MS: u32 = 10;

/// Boot splash hold time, in 250 ms quanta (2 s).
pub const SPLASH_QUANTA: u16 = 8;

/// Reset screen hold time before the restart, in 250 ms quanta (1.5 s).
pub const RESET_SCREEN_QUANTA: u16 = 6;

// Buttons
//
// Five active-low buttons on PA0..PA4, sampled together as one 5-bit
// field. Menu and reset request buttons sit on PB0 / PB1 (EXTI lines).
//
//   Up     → PA0
//   Down   → PA1
//   Right  → PA2
//   Left   → PA3
//   Ok     → PA4
//   Menu   → PB0 (EXTI0)
//   Reset  → PB1 (EXTI1)

/// Mask applied to the raw input port sample.
pub const BUTTON_MASK: u8 = 0x1F;

/// Settle time of the menu and reset request buttons (ms).
pub const BUTTON_DEBOUNCE_MS: u64 = 20;

// Display

/// OLED width in pixels.
pub const SCREEN_WIDTH: i32 = 128;

/// OLED height in pixels.
pub const SCREEN_HEIGHT: i32 = 64;

/// Top of the measurement screen title.
pub const TITLE_Y: i32 = 4;

/// Top of the measurement readout row.
pub const READOUT_Y: i32 = 26;

/// Top of the mode label on the measurement screens.
pub const MODE_LABEL_Y: i32 = 52;

/// Top of the menu's mode label row.
pub const MENU_LABEL_Y: i32 = 38;

/// Left edge of the plot configurator field labels.
pub const CONFIG_LABEL_X: i32 = 10;

/// Tops of the configurator rows: resolution, sample time, graphic.
pub const CONFIG_ROWS_Y: [i32; 3] = [13, 25, 37];

/// Plot X axis row.
pub const PLOT_X_AXIS_Y: i32 = 57;

/// Top of the plot Y axis when the "lx" legend is drawn above it.
pub const PLOT_LEGEND_TOP: i32 = 11;

// Persistent configuration store

/// Slot addresses inside the byte-addressable configuration store.
pub const STORE_SLOT_FACTORY_RESET: u8 = 0x00;
pub const STORE_SLOT_MODE: u8 = 0x01;
pub const STORE_SLOT_RESOLUTION: u8 = 0x02;

/// Flash page size on the STM32F103C8 (1 KiB).
pub const FLASH_PAGE_SIZE: u32 = 1024;

/// Flash offset where the settings store starts (page 62).
pub const STORE_FLASH_START: u32 = 62 * FLASH_PAGE_SIZE;

/// Flash offset where the settings store ends (exclusive).
pub const STORE_FLASH_END: u32 = 64 * FLASH_PAGE_SIZE;

// Plot defaults

/// Default plot sample period (ms).
pub const DEFAULT_SAMPLE_TIME_MS: u32 = 10;

/// Default plot vertical full scale (lx).
pub const DEFAULT_RESOLUTION_COUNT: u32 = 54_612;

/// Vertical full-scale presets offered by the plot configurator.
pub const RESOLUTION_PRESETS: [u32; 4] = [54_612, 27_306, 13_653, 6_826];

/// Capacity of the configurator's number-to-text buffers (characters).
pub const VALUE_TEXT_CAPACITY: usize = 5;
