//! Simulated board for driving the application core on the host.

#![allow(dead_code)]

use std::collections::VecDeque;

use embedded_graphics::pixelcolor::BinaryColor;
use embedded_graphics::prelude::*;
use luxmeter::hal::{Board, ConfigStore, Keypad, LightSensor, Screen, System, TickCounter, Watchdog};
use luxmeter::settings::{SensorResolution, StoreSlot};
use luxmeter::timing::{DelayEngine, Pacing, YieldGate};
use luxmeter::{AppContext, Error, Hardware, InterruptLatch, ModeController, PendingEvent, Variant};

// Raw active-low port samples.
pub const IDLE: u8 = 0b11111;
pub const UP: u8 = 0b11110;
pub const DOWN: u8 = 0b11101;
pub const RIGHT: u8 = 0b11011;
pub const LEFT: u8 = 0b10111;
pub const OK: u8 = 0b01111;

/// Keypad samples before a test is considered hung.
const SAMPLE_LIMIT: usize = 100_000;

pub struct Sim;

impl Board for Sim {
    type Display = RecordingDisplay;
    type Sensor = FakeSensor;
    type Store = MemoryStore;
    type Keypad = ScriptedKeypad;
    type Counter = SteppingCounter;
    type Watchdog = CountingWatchdog;
    type System = HostSystem;
}

/// One entry of a keypad script.
#[derive(Clone, Copy, Debug)]
pub enum Input {
    /// Return `raw` for this many samples.
    Hold(u8, usize),
    /// Raise an interrupt event before the next sample.
    Raise(PendingEvent),
}

/// Press and release `raw`, two samples each.
pub fn press(raw: u8) -> [Input; 2] {
    [Input::Hold(raw, 2), Input::Hold(IDLE, 2)]
}

pub fn script<const N: usize>(presses: [[Input; 2]; N]) -> Vec<Input> {
    presses.into_iter().flatten().collect()
}

pub struct ScriptedKeypad {
    script: VecDeque<Input>,
    latch: &'static InterruptLatch,
    pub samples: usize,
}

impl ScriptedKeypad {
    pub fn push(&mut self, inputs: impl IntoIterator<Item = Input>) {
        self.script.extend(inputs);
    }
}

impl Keypad for ScriptedKeypad {
    fn sample(&mut self) -> u8 {
        self.samples += 1;
        assert!(self.samples < SAMPLE_LIMIT, "keypad script exhausted");
        loop {
            match self.script.front_mut() {
                Some(Input::Raise(event)) => {
                    self.latch.raise(*event);
                    self.script.pop_front();
                }
                Some(Input::Hold(raw, remaining)) => {
                    let raw = *raw;
                    *remaining = remaining.saturating_sub(1);
                    if *remaining == 0 {
                        self.script.pop_front();
                    }
                    return raw;
                }
                None => return IDLE,
            }
        }
    }
}

/// Advances a fixed step on every read.
pub struct SteppingCounter {
    now: u32,
    step: u32,
}

impl TickCounter for SteppingCounter {
    fn reset(&mut self) {
        self.now = 0;
    }

    fn count(&mut self) -> u32 {
        self.now = self.now.saturating_add(self.step);
        self.now
    }
}

#[derive(Default)]
pub struct CountingWatchdog {
    pub feeds: u64,
}

impl Watchdog for CountingWatchdog {
    fn feed(&mut self) {
        self.feeds += 1;
    }
}

#[derive(Default)]
pub struct FakeSensor {
    pub lux: f32,
    pub fail_init: bool,
    pub fail_read: bool,
    pub fail_recalibrate: bool,
    pub resolution: Option<SensorResolution>,
    pub reads: u32,
    pub recalibrations: u32,
}

impl LightSensor for FakeSensor {
    fn init(&mut self, resolution: SensorResolution) -> Result<(), Error> {
        self.resolution = Some(resolution);
        if self.fail_init {
            Err(Error::SensorNotConnected)
        } else {
            Ok(())
        }
    }

    fn read_lux(&mut self) -> Result<f32, Error> {
        self.reads += 1;
        if self.fail_read {
            Err(Error::Sensor)
        } else {
            Ok(self.lux)
        }
    }

    fn recalibrate(&mut self) -> Result<(), Error> {
        self.recalibrations += 1;
        if self.fail_recalibrate {
            Err(Error::Recalibration)
        } else {
            Ok(())
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    pub slots: [Option<u8>; 3],
    pub fail_reads: bool,
    pub fail_writes: bool,
    pub reads: u32,
    pub writes: u32,
}

impl MemoryStore {
    /// A store holding saved (non-factory) settings.
    pub fn saved(mode: u8, resolution: u8) -> Self {
        Self {
            slots: [Some(0), Some(mode), Some(resolution)],
            ..Self::default()
        }
    }
}

impl ConfigStore for MemoryStore {
    fn read(&mut self, slot: StoreSlot) -> Result<Option<u8>, Error> {
        self.reads += 1;
        if self.fail_reads {
            return Err(Error::Storage);
        }
        Ok(self.slots[usize::from(slot.address())])
    }

    fn write(&mut self, slot: StoreSlot, value: u8) -> Result<(), Error> {
        self.writes += 1;
        if self.fail_writes {
            return Err(Error::Storage);
        }
        self.slots[usize::from(slot.address())] = Some(value);
        Ok(())
    }
}

/// 128×64 frame buffer that counts full clears and flushes.
pub struct RecordingDisplay {
    frame: Vec<bool>,
    pub clears: u32,
    pub presents: u32,
}

impl Default for RecordingDisplay {
    fn default() -> Self {
        Self {
            frame: vec![false; 128 * 64],
            clears: 0,
            presents: 0,
        }
    }
}

impl RecordingDisplay {
    pub fn is_lit(&self, x: i32, y: i32) -> bool {
        (0..128).contains(&x) && (0..64).contains(&y) && self.frame[(y * 128 + x) as usize]
    }

    pub fn lit_pixels(&self) -> usize {
        self.frame.iter().filter(|&&p| p).count()
    }
}

impl OriginDimensions for RecordingDisplay {
    fn size(&self) -> Size {
        Size::new(128, 64)
    }
}

impl DrawTarget for RecordingDisplay {
    type Color = BinaryColor;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(at, color) in pixels {
            if (0..128).contains(&at.x) && (0..64).contains(&at.y) {
                self.frame[(at.y * 128 + at.x) as usize] = color.is_on();
            }
        }
        Ok(())
    }

    fn clear(&mut self, color: Self::Color) -> Result<(), Self::Error> {
        self.clears += 1;
        self.frame.fill(color.is_on());
        Ok(())
    }
}

impl Screen for RecordingDisplay {
    fn present(&mut self) -> Result<(), Error> {
        self.presents += 1;
        Ok(())
    }
}

#[derive(Default)]
pub struct HostSystem {
    pub sleeps: u32,
}

impl System for HostSystem {
    fn restart(&mut self) -> ! {
        panic!("system restart");
    }

    fn wait_for_interrupt(&mut self) {
        self.sleeps += 1;
    }
}

/// Parts of one simulated board before they are handed over.
pub struct SimBoard {
    pub store: MemoryStore,
    pub sensor: FakeSensor,
    pub inputs: Vec<Input>,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self {
            store: MemoryStore::default(),
            sensor: FakeSensor {
                lux: 321.5,
                ..FakeSensor::default()
            },
            inputs: Vec::new(),
        }
    }
}

impl SimBoard {
    pub fn hardware(self) -> Hardware<'static, Sim> {
        let latch: &'static InterruptLatch = Box::leak(Box::new(InterruptLatch::new()));
        Hardware {
            display: RecordingDisplay::default(),
            sensor: self.sensor,
            store: self.store,
            keypad: ScriptedKeypad {
                script: self.inputs.into(),
                latch,
                samples: 0,
            },
            // 5 000 ticks per read: a 250 ms quantum takes 14 polls.
            delay: DelayEngine::new(SteppingCounter { now: 0, step: 5_000 }, CountingWatchdog::default()),
            system: HostSystem::default(),
            latch,
        }
    }

    pub fn controller(self, variant: Variant) -> ModeController<'static, Sim> {
        let gate: &'static YieldGate = Box::leak(Box::new(YieldGate::new()));
        ModeController::new(self.hardware(), gate, variant, Pacing::Sleep)
    }

    /// Hardware plus a fresh context, for driving components directly.
    pub fn parts(self, variant: Variant) -> (AppContext, Hardware<'static, Sim>) {
        (AppContext::new(variant), self.hardware())
    }
}

/// Run iterations until `done` holds, at most `limit` times.
pub fn run_until(
    controller: &mut ModeController<'static, Sim>,
    limit: usize,
    mut done: impl FnMut(&ModeController<'static, Sim>) -> bool,
) {
    for _ in 0..limit {
        controller.run_iteration();
        if done(controller) {
            return;
        }
    }
    panic!("condition not reached after {limit} iterations");
}
