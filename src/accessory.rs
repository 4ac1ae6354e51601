use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{self, Receiver};

use crate::config::AccessoryConfig;
use crate::error::ReadingError;
use crate::reading::{BatteryStatus, Reading};
use crate::sensor_poller::SensorPoller;

/// Push-side mirror of the three characteristics this accessory serves,
/// emitted whenever a poll commits a new reading. Hosts that render value
/// changes eagerly consume these; pull-style hosts just call the getters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CharacteristicUpdate {
    CurrentTemperature(f64),
    CurrentRelativeHumidity(f64),
    StatusLowBattery(BatteryStatus),
}

/// One configured Shelly H&T device exposed as a temperature/humidity/battery
/// accessory. Getters answer from the cached reading and never touch the
/// network; the background poller is the only writer.
pub struct ShellyHntAccessory {
    cache: Arc<Mutex<Option<Reading>>>,
    name: String,
}

impl ShellyHntAccessory {
    /// Builds the accessory and starts its background poller. Must be called
    /// from within a tokio runtime.
    pub fn new(config: AccessoryConfig) -> (Self, Receiver<CharacteristicUpdate>) {
        println!("Setting up accessory `{}`", config.name);

        let cache = Arc::new(Mutex::new(None));
        let (update_tx, update_rx) = mpsc::channel(32);
        let name = config.name.clone();

        SensorPoller::new(config, cache.clone(), update_tx).spawn();

        (Self { cache, name }, update_rx)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current temperature in Celsius, from the last committed reading.
    pub fn current_temperature(&self) -> Result<f64, ReadingError> {
        self.snapshot()?
            .temperature_c
            .ok_or(ReadingError::UnrecognizedShape("temperature"))
    }

    /// Current relative humidity in percent, from the last committed reading.
    pub fn current_relative_humidity(&self) -> Result<f64, ReadingError> {
        self.snapshot()?
            .humidity_pct
            .ok_or(ReadingError::UnrecognizedShape("humidity"))
    }

    /// Battery status from the last committed reading. Unlike temperature and
    /// humidity this cannot fail on shape: a status without battery data reads
    /// as `Normal`.
    pub fn status_low_battery(&self) -> Result<BatteryStatus, ReadingError> {
        Ok(self.snapshot()?.battery)
    }

    fn snapshot(&self) -> Result<Reading, ReadingError> {
        let cache = self.cache.lock().expect("Shall unlock reading cache");
        (*cache).ok_or(ReadingError::DataUnavailable)
    }
}
