//! Application core of the luxmeter firmware.
//!
//! Everything here is hardware independent: the firmware binary
//! (`src/main.rs`) implements the [`hal`] traits on STM32F103 peripherals,
//! and the host tests implement them with simulated parts.
//!
//! Usage: `cargo test` on the host, `cargo build --release --features
//! embedded --target thumbv7m-none-eabi` for the board.
//!
//! ## Layout
//!
//! - [`latch`]: interrupt → main loop event mailbox
//! - [`timing`]: watchdog-safe delays and main-loop pacing
//! - [`ui`]: button decoding, text geometry and screen rendering
//! - [`app`]: mode controller, menu, plot configurator and mode handlers

#![cfg_attr(not(test), no_std)]

// Must come first: the logging macros are used by every other module.
#[macro_use]
mod fmt;

pub mod app;
pub mod config;
pub mod error;
pub mod hal;
pub mod latch;
pub mod mode;
pub mod settings;
pub mod timing;
pub mod ui;

pub use app::controller::ModeController;
pub use app::{AppContext, Hardware};
pub use error::{Error, ErrorFlags, Fault};
pub use latch::{InterruptLatch, PendingEvent};
pub use mode::{Mode, Variant};
