//! Unified error type for the light meter.
//!
//! We avoid `alloc` - all error variants are fieldless and `Copy`.
//! Implements `defmt::Format` for efficient on-target logging.

/// Top-level error type returned by drivers and the application core.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // Storage
    /// Configuration store read or write failed.
    Storage,

    // Sensor
    /// The light sensor did not answer on its bus.
    SensorNotConnected,

    /// The light sensor answered but the measurement failed.
    Sensor,

    /// Sensor recalibration failed.
    Recalibration,

    // UI / Display
    /// Transferring the frame buffer to the display failed.
    Display,

    // Generic
    /// A fixed-capacity buffer was too small for the requested value.
    BufferOverflow,
}

/// User-facing faults that are shown once and then latched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Fault {
    /// Settings could not be read or written; defaults are in use.
    ConfigStore,
    /// The sensor is missing or stopped answering.
    SensorNotConnected,
    /// A user-requested recalibration failed.
    Recalibration,
}

impl Error {
    /// The latched fault this error is reported as, if any.
    pub fn fault(self) -> Option<Fault> {
        match self {
            Error::Storage => Some(Fault::ConfigStore),
            Error::SensorNotConnected | Error::Sensor => Some(Fault::SensorNotConnected),
            Error::Recalibration => Some(Fault::Recalibration),
            Error::Display | Error::BufferOverflow => None,
        }
    }
}

/// Sticky fault latches. Cleared only by a full restart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ErrorFlags {
    pub store_fault: bool,
    pub sensor_fault: bool,
    pub sensor_not_connected: bool,
}

impl ErrorFlags {
    pub const fn new() -> Self {
        Self {
            store_fault: false,
            sensor_fault: false,
            sensor_not_connected: false,
        }
    }

    /// Whether the screen for `fault` was already shown this run.
    pub fn is_latched(&self, fault: Fault) -> bool {
        match fault {
            Fault::ConfigStore => self.store_fault,
            Fault::SensorNotConnected => self.sensor_not_connected,
            Fault::Recalibration => self.sensor_fault,
        }
    }

    /// Set the latch for `fault`. Returns `true` if it was newly set.
    pub fn latch(&mut self, fault: Fault) -> bool {
        let flag = match fault {
            Fault::ConfigStore => &mut self.store_fault,
            Fault::SensorNotConnected => &mut self.sensor_not_connected,
            Fault::Recalibration => &mut self.sensor_fault,
        };
        let newly = !*flag;
        *flag = true;
        newly
    }
}
