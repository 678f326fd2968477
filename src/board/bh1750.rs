//! BH1750 ambient light sensor over blocking I²C.

use embedded_hal::i2c::I2c;
use luxmeter::hal::LightSensor;
use luxmeter::settings::SensorResolution;
use luxmeter::Error;

/// ADDR pin tied low.
const ADDRESS: u8 = 0x23;

const POWER_ON: u8 = 0x01;
const RESET: u8 = 0x07;
const CONTINUOUS_HIGH_RES: u8 = 0x10;
const CONTINUOUS_HIGH_RES_2: u8 = 0x11;
const CONTINUOUS_LOW_RES: u8 = 0x13;

/// Counts per lux in the high resolution modes.
const COUNTS_PER_LUX: f32 = 1.2;

fn mode_command(resolution: SensorResolution) -> u8 {
    match resolution {
        SensorResolution::Low => CONTINUOUS_LOW_RES,
        SensorResolution::Medium => CONTINUOUS_HIGH_RES,
        SensorResolution::High => CONTINUOUS_HIGH_RES_2,
    }
}

pub struct Bh1750<I2C> {
    i2c: I2C,
    resolution: SensorResolution,
}

impl<I2C: I2c> Bh1750<I2C> {
    pub fn new(i2c: I2C) -> Self {
        Self {
            i2c,
            resolution: SensorResolution::Medium,
        }
    }

    fn command(&mut self, opcode: u8) -> Result<(), I2C::Error> {
        self.i2c.write(ADDRESS, &[opcode])
    }
}

impl<I2C: I2c> LightSensor for Bh1750<I2C> {
    fn init(&mut self, resolution: SensorResolution) -> Result<(), Error> {
        self.resolution = resolution;
        self.command(POWER_ON)
            .and_then(|_| self.command(mode_command(resolution)))
            .map_err(|_| Error::SensorNotConnected)
    }

    fn read_lux(&mut self) -> Result<f32, Error> {
        let mut raw = [0u8; 2];
        self.i2c
            .read(ADDRESS, &mut raw)
            .map_err(|_| Error::Sensor)?;

        let counts = f32::from(u16::from_be_bytes(raw));
        Ok(match self.resolution {
            // Mode 2 doubles the count per lux.
            SensorResolution::High => counts / (COUNTS_PER_LUX * 2.0),
            SensorResolution::Low | SensorResolution::Medium => counts / COUNTS_PER_LUX,
        })
    }

    fn recalibrate(&mut self) -> Result<(), Error> {
        let mode = mode_command(self.resolution);
        [POWER_ON, RESET, mode]
            .into_iter()
            .try_for_each(|opcode| self.command(opcode))
            .map_err(|_| Error::Recalibration)
    }
}
