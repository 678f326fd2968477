//! Operating modes and the build-time variant that enables them.

use crate::ui::input_logic::{cycle_next, cycle_prev};

/// Top-level operating state of the instrument.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Mode {
    Continuous = 0,
    Hold = 1,
    Plot = 2,
    ConfigPlot = 3,
    SelectSensor = 4,
    ResetSensor = 5,
    Idle = 6,
    SelectDiode = 7,
}

impl Mode {
    pub const ALL: [Mode; 8] = [
        Mode::Continuous,
        Mode::Hold,
        Mode::Plot,
        Mode::ConfigPlot,
        Mode::SelectSensor,
        Mode::ResetSensor,
        Mode::Idle,
        Mode::SelectDiode,
    ];

    /// Ordinal persisted in the configuration store.
    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(usize::from(ordinal)).copied()
    }

    /// Name shown in the mode menu.
    pub fn label(self) -> &'static str {
        match self {
            Mode::Continuous => "Continuous",
            Mode::Hold => "Hold",
            Mode::Plot => "Plot",
            Mode::ConfigPlot => "Config Plot",
            Mode::SelectSensor => "Sel Sensor",
            Mode::ResetSensor => "Reset Sense",
            Mode::Idle => "Idle",
            Mode::SelectDiode => "Sel Diode",
        }
    }
}

/// Instrument variant, chosen at build time with the `economic` feature.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Variant {
    /// Every implemented mode.
    Full,
    /// Measurement-only instrument without plotting.
    Economic,
}

const FULL_MODES: [Mode; 6] = [
    Mode::Continuous,
    Mode::Hold,
    Mode::Plot,
    Mode::ConfigPlot,
    Mode::SelectSensor,
    Mode::ResetSensor,
];

const ECONOMIC_MODES: [Mode; 3] = [Mode::Continuous, Mode::Hold, Mode::ResetSensor];

impl Variant {
    #[cfg(feature = "economic")]
    pub const ACTIVE: Variant = Variant::Economic;
    #[cfg(not(feature = "economic"))]
    pub const ACTIVE: Variant = Variant::Full;

    /// Modes offered by the menu, in menu order.
    pub fn enabled_modes(self) -> &'static [Mode] {
        match self {
            Variant::Full => &FULL_MODES,
            Variant::Economic => &ECONOMIC_MODES,
        }
    }

    pub fn is_enabled(self, mode: Mode) -> bool {
        self.enabled_modes().contains(&mode)
    }

    fn position(self, mode: Mode) -> Option<usize> {
        self.enabled_modes().iter().position(|&m| m == mode)
    }

    /// Next enabled mode, wrapping after the last. A mode outside the
    /// list starts from the first entry.
    pub fn next_mode(self, mode: Mode) -> Mode {
        let modes = self.enabled_modes();
        match self.position(mode) {
            Some(at) => modes[cycle_next(at, modes.len())],
            None => modes[0],
        }
    }

    /// Previous enabled mode, wrapping before the first. A mode outside
    /// the list starts from the last entry.
    pub fn prev_mode(self, mode: Mode) -> Mode {
        let modes = self.enabled_modes();
        match self.position(mode) {
            Some(at) => modes[cycle_prev(at, modes.len())],
            None => modes[modes.len() - 1],
        }
    }

    /// `mode` if the menu can show it, otherwise the first enabled mode.
    pub fn menu_start(self, mode: Mode) -> Mode {
        if self.is_enabled(mode) {
            mode
        } else {
            self.enabled_modes()[0]
        }
    }
}
