//! Persisted settings and plot configuration.
//!
//! Store layout (one byte per slot):
//!   - 0x00: factory-reset flag (non-zero or missing → use defaults)
//!   - 0x01: selected mode ordinal
//!   - 0x02: sensor resolution ordinal

use crate::config::{
    DEFAULT_RESOLUTION_COUNT, DEFAULT_SAMPLE_TIME_MS, STORE_SLOT_FACTORY_RESET, STORE_SLOT_MODE,
    STORE_SLOT_RESOLUTION,
};
use crate::error::Error;
use crate::hal::ConfigStore;
use crate::mode::{Mode, Variant};

/// Addressable slot in the configuration store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreSlot {
    FactoryReset,
    Mode,
    Resolution,
}

impl StoreSlot {
    pub fn address(self) -> u8 {
        match self {
            StoreSlot::FactoryReset => STORE_SLOT_FACTORY_RESET,
            StoreSlot::Mode => STORE_SLOT_MODE,
            StoreSlot::Resolution => STORE_SLOT_RESOLUTION,
        }
    }
}

/// Measurement resolution requested from the light sensor.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorResolution {
    /// 4 lx steps, fastest conversion.
    Low = 0,
    /// 1 lx steps.
    Medium = 1,
    /// 0.5 lx steps.
    High = 2,
}

impl SensorResolution {
    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        match ordinal {
            0 => Some(SensorResolution::Low),
            1 => Some(SensorResolution::Medium),
            2 => Some(SensorResolution::High),
            _ => None,
        }
    }
}

/// Plot axis layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AxisMode {
    BothAxis,
    YAxisOnly,
}

/// Plot settings. The active copy is only replaced at the configurator's
/// confirm point.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PlotConfig {
    pub axis_mode: AxisMode,
    pub sample_time_ms: u32,
    pub resolution_count: u32,
    pub print_legends: bool,
}

impl PlotConfig {
    pub const DEFAULT: PlotConfig = PlotConfig {
        axis_mode: AxisMode::BothAxis,
        sample_time_ms: DEFAULT_SAMPLE_TIME_MS,
        resolution_count: DEFAULT_RESOLUTION_COUNT,
        print_legends: true,
    };
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Settings restored from the configuration store at boot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    pub factory_values: bool,
    pub mode: Mode,
    pub sensor_resolution: SensorResolution,
}

impl Settings {
    pub const DEFAULT: Settings = Settings {
        factory_values: true,
        mode: Mode::Continuous,
        sensor_resolution: SensorResolution::Medium,
    };

    /// Read settings from `store`.
    ///
    /// Any store error is returned so the caller can raise the store fault
    /// and keep [`Settings::DEFAULT`]. Unknown or disabled values fall back
    /// to their defaults without a fault.
    pub fn load(store: &mut impl ConfigStore, variant: Variant) -> Result<Settings, Error> {
        let mut settings = Settings::DEFAULT;

        match store.read(StoreSlot::FactoryReset)? {
            Some(0) => settings.factory_values = false,
            Some(_) | None => {
                info!("Settings: factory values in use");
                return Ok(settings);
            }
        }

        if let Some(raw) = store.read(StoreSlot::Mode)? {
            match Mode::from_ordinal(raw) {
                Some(mode) if variant.is_enabled(mode) => settings.mode = mode,
                _ => warn!("Settings: ignoring stored mode {}", raw),
            }
        }

        if let Some(raw) = store.read(StoreSlot::Resolution)? {
            match SensorResolution::from_ordinal(raw) {
                Some(resolution) => settings.sensor_resolution = resolution,
                None => warn!("Settings: ignoring stored resolution {}", raw),
            }
        }

        info!("Settings: restored mode {}", settings.mode);
        Ok(settings)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapStore {
        slots: [Option<u8>; 3],
        fail: bool,
    }

    impl ConfigStore for MapStore {
        fn read(&mut self, slot: StoreSlot) -> Result<Option<u8>, Error> {
            if self.fail {
                return Err(Error::Storage);
            }
            Ok(self.slots[usize::from(slot.address())])
        }

        fn write(&mut self, slot: StoreSlot, value: u8) -> Result<(), Error> {
            if self.fail {
                return Err(Error::Storage);
            }
            self.slots[usize::from(slot.address())] = Some(value);
            Ok(())
        }
    }

    #[test]
    fn blank_store_yields_defaults() {
        let mut store = MapStore {
            slots: [None; 3],
            fail: false,
        };
        assert_eq!(Settings::load(&mut store, Variant::Full), Ok(Settings::DEFAULT));
    }

    #[test]
    fn factory_flag_keeps_defaults() {
        let mut store = MapStore {
            slots: [Some(1), Some(Mode::Hold.ordinal()), Some(2)],
            fail: false,
        };
        assert_eq!(Settings::load(&mut store, Variant::Full), Ok(Settings::DEFAULT));
    }

    #[test]
    fn stored_values_are_restored() {
        let mut store = MapStore {
            slots: [Some(0), Some(Mode::Plot.ordinal()), Some(2)],
            fail: false,
        };
        let settings = Settings::load(&mut store, Variant::Full).unwrap();
        assert!(!settings.factory_values);
        assert_eq!(settings.mode, Mode::Plot);
        assert_eq!(settings.sensor_resolution, SensorResolution::High);
    }

    #[test]
    fn invalid_or_disabled_values_fall_back() {
        let mut store = MapStore {
            slots: [Some(0), Some(Mode::Plot.ordinal()), Some(9)],
            fail: false,
        };
        let settings = Settings::load(&mut store, Variant::Economic).unwrap();
        assert_eq!(settings.mode, Mode::Continuous);
        assert_eq!(settings.sensor_resolution, SensorResolution::Medium);

        store.slots[1] = Some(0xEE);
        let settings = Settings::load(&mut store, Variant::Full).unwrap();
        assert_eq!(settings.mode, Mode::Continuous);
    }

    #[test]
    fn store_failure_is_reported() {
        let mut store = MapStore {
            slots: [None; 3],
            fail: true,
        };
        assert_eq!(Settings::load(&mut store, Variant::Full), Err(Error::Storage));
    }
}
