//! Watchdog-safe blocking delays and main-loop pacing.
//!
//! Every wait in the firmware is a busy poll on hardware state. The
//! delay engine feeds the watchdog on every poll iteration, so the
//! longest gap between two feeds is one counter read - far below the
//! 400 ms watchdog timeout.

use core::sync::atomic::{AtomicBool, Ordering};

use crate::config::{QUANTUM_250MS_TICKS, QUANTUM_50MS_TICKS};
use crate::hal::{Keypad, System, TickCounter, Watchdog};
use crate::latch::InterruptLatch;
use crate::ui::buttons::ButtonReading;

/// How a blocking wait ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Wait {
    /// The wait reached its own completion condition.
    Completed,
    /// An interrupt event became pending first.
    Interrupted,
}

/// Busy-wait timing on a free-running counter with overflow counting.
pub struct DelayEngine<C, W> {
    counter: C,
    watchdog: W,
}

impl<C: TickCounter, W: Watchdog> DelayEngine<C, W> {
    pub fn new(counter: C, watchdog: W) -> Self {
        Self { counter, watchdog }
    }

    /// Service the watchdog.
    pub fn feed(&mut self) {
        self.watchdog.feed();
    }

    /// Wait for `repeat` overflows of a `quantum_ticks` long period.
    ///
    /// `repeat == 0` waits one period; a delay never waits zero time.
    pub fn blocking_delay(&mut self, quantum_ticks: u32, repeat: u16) {
        let _ = self.delay_unless(quantum_ticks, repeat, || false);
    }

    /// Like [`blocking_delay`](Self::blocking_delay) but gives up as soon
    /// as `abort` returns `true`. `abort` is checked on every poll.
    pub fn delay_unless(
        &mut self,
        quantum_ticks: u32,
        repeat: u16,
        mut abort: impl FnMut() -> bool,
    ) -> Wait {
        let repeat = repeat.max(1);
        let mut overflows: u16 = 0;

        self.counter.reset();
        loop {
            self.watchdog.feed();
            if abort() {
                return Wait::Interrupted;
            }
            if self.counter.count() >= quantum_ticks {
                self.counter.reset();
                overflows += 1;
                if overflows >= repeat {
                    return Wait::Completed;
                }
            }
        }
    }

    /// `quanta` × 250 ms.
    pub fn delay_250ms(&mut self, quanta: u16) {
        self.blocking_delay(QUANTUM_250MS_TICKS, quanta);
    }

    /// `quanta` × 50 ms.
    pub fn delay_50ms(&mut self, quanta: u16) {
        self.blocking_delay(QUANTUM_50MS_TICKS, quanta);
    }

    /// Poll the keypad until `target` is held or an interrupt event is
    /// pending.
    pub fn wait_for_press(
        &mut self,
        keypad: &mut impl Keypad,
        latch: &InterruptLatch,
        target: ButtonReading,
    ) -> Wait {
        loop {
            self.watchdog.feed();
            if ButtonReading::decode(keypad.sample()) == target {
                return Wait::Completed;
            }
            if latch.is_pending() {
                return Wait::Interrupted;
            }
        }
    }

    pub fn counter(&self) -> &C {
        &self.counter
    }

    pub fn watchdog(&self) -> &W {
        &self.watchdog
    }
}

/// How the main loop waits for the next tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pacing {
    /// Spin on the tick flag, feeding the watchdog (debug builds).
    BusyWait,
    /// Sleep until the next interrupt.
    Sleep,
}

impl Pacing {
    /// Pacing selected at build time.
    #[cfg(feature = "debug-pacing")]
    pub const ACTIVE: Pacing = Pacing::BusyWait;
    #[cfg(not(feature = "debug-pacing"))]
    pub const ACTIVE: Pacing = Pacing::Sleep;
}

/// Cooperative-yield gate, set by the periodic tick interrupt and
/// cleared by the main loop.
pub struct YieldGate {
    ticked: AtomicBool,
}

impl YieldGate {
    pub const fn new() -> Self {
        Self {
            ticked: AtomicBool::new(false),
        }
    }

    /// Called from the tick interrupt.
    pub fn signal_tick(&self) {
        self.ticked.store(true, Ordering::Release);
    }

    /// Take the tick flag, clearing it.
    pub fn take_tick(&self) -> bool {
        self.ticked.swap(false, Ordering::AcqRel)
    }

    /// Hold the main loop until the next tick.
    pub fn pace<C: TickCounter, W: Watchdog>(
        &self,
        pacing: Pacing,
        delay: &mut DelayEngine<C, W>,
        system: &mut impl System,
    ) {
        match pacing {
            Pacing::BusyWait => {
                while !self.take_tick() {
                    delay.feed();
                }
            }
            Pacing::Sleep => {
                system.wait_for_interrupt();
                let _ = self.take_tick();
                delay.feed();
            }
        }
    }
}

impl Default for YieldGate {
    fn default() -> Self {
        Self::new()
    }
}
