//! Interrupt latch: single-slot mailbox between interrupt handlers and
//! the main loop.
//!
//! Menu and reset buttons raise events from interrupt context; the Mode
//! Controller consumes them once per iteration. There is no queue - only
//! the most recent applicable event is observable.

use core::sync::atomic::{AtomicU8, Ordering};

/// Event waiting for the main loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum PendingEvent {
    None = 0,
    MenuRequested = 1,
    ResetRequested = 2,
}

impl PendingEvent {
    fn from_raw(raw: u8) -> Self {
        match raw {
            1 => PendingEvent::MenuRequested,
            2 => PendingEvent::ResetRequested,
            _ => PendingEvent::None,
        }
    }
}

/// Single-writer (interrupt) / single-reader (main loop) event slot.
pub struct InterruptLatch {
    slot: AtomicU8,
}

impl InterruptLatch {
    pub const fn new() -> Self {
        Self {
            slot: AtomicU8::new(PendingEvent::None as u8),
        }
    }

    /// Record an event. Interrupt-safe.
    ///
    /// A menu request only lands in an empty slot, so a bouncing menu
    /// button cannot retrigger. A reset request always overwrites.
    pub fn raise(&self, event: PendingEvent) {
        match event {
            PendingEvent::MenuRequested => {
                let _ = self.slot.compare_exchange(
                    PendingEvent::None as u8,
                    PendingEvent::MenuRequested as u8,
                    Ordering::AcqRel,
                    Ordering::Acquire,
                );
            }
            PendingEvent::ResetRequested => {
                self.slot
                    .store(PendingEvent::ResetRequested as u8, Ordering::Release);
            }
            PendingEvent::None => {}
        }
    }

    /// Take the pending event, leaving the slot empty. Main loop only.
    pub fn consume(&self) -> PendingEvent {
        PendingEvent::from_raw(self.slot.swap(PendingEvent::None as u8, Ordering::AcqRel))
    }

    /// Look at the pending event without taking it.
    pub fn peek(&self) -> PendingEvent {
        PendingEvent::from_raw(self.slot.load(Ordering::Acquire))
    }

    /// `true` while any event is outstanding.
    pub fn is_pending(&self) -> bool {
        self.peek() != PendingEvent::None
    }

    /// `true` while a reset request is outstanding.
    pub fn reset_pending(&self) -> bool {
        self.peek() == PendingEvent::ResetRequested
    }

    /// Drop a pending menu request, leaving a reset request untouched.
    pub fn discard_menu_request(&self) {
        let _ = self.slot.compare_exchange(
            PendingEvent::MenuRequested as u8,
            PendingEvent::None as u8,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }
}

impl Default for InterruptLatch {
    fn default() -> Self {
        Self::new()
    }
}
