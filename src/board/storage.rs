//! Persistent settings in the STM32F103's internal flash.
//!
//! Uses `sequential-storage` to keep a small key-value map in the last two
//! flash pages. Each store slot is one key holding one byte; records are
//! appended and the crate handles wear levelling and page erase.

use core::ops::Range;

use defmt::{debug, error};
use embassy_embedded_hal::adapter::BlockingAsync;
use embassy_futures::block_on;
use embassy_stm32::flash::{Blocking, Flash};
use luxmeter::config::{STORE_FLASH_END, STORE_FLASH_START};
use luxmeter::hal::ConfigStore;
use luxmeter::settings::StoreSlot;
use luxmeter::Error;
use sequential_storage::cache::NoCache;
use sequential_storage::map;

const FLASH_RANGE: Range<u32> = STORE_FLASH_START..STORE_FLASH_END;

/// Scratch space for one serialized record (key, value, header).
const RECORD_BUFFER_SIZE: usize = 32;

pub struct FlashStore {
    flash: BlockingAsync<Flash<'static, Blocking>>,
}

impl FlashStore {
    pub fn new(flash: Flash<'static, Blocking>) -> Self {
        Self {
            flash: BlockingAsync::new(flash),
        }
    }
}

impl ConfigStore for FlashStore {
    fn read(&mut self, slot: StoreSlot) -> Result<Option<u8>, Error> {
        let mut buf = [0u8; RECORD_BUFFER_SIZE];
        let key = slot.address();

        match block_on(map::fetch_item::<u8, u8, _>(
            &mut self.flash,
            FLASH_RANGE,
            &mut NoCache::new(),
            &mut buf,
            &key,
        )) {
            Ok(value) => {
                debug!("Store: slot {} = {}", key, value);
                Ok(value)
            }
            Err(e) => {
                error!("Flash read error: {:?}", defmt::Debug2Format(&e));
                Err(Error::Storage)
            }
        }
    }

    fn write(&mut self, slot: StoreSlot, value: u8) -> Result<(), Error> {
        let mut buf = [0u8; RECORD_BUFFER_SIZE];
        let key = slot.address();

        block_on(map::store_item::<u8, u8, _>(
            &mut self.flash,
            FLASH_RANGE,
            &mut NoCache::new(),
            &mut buf,
            &key,
            &value,
        ))
        .map_err(|e| {
            error!("Flash write error: {:?}", defmt::Debug2Format(&e));
            Error::Storage
        })?;

        debug!("Store: slot {} <- {}", key, value);
        Ok(())
    }
}
