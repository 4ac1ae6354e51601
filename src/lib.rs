//! Shelly H&T Cloud Bridge Library
//!
//! This library polls the Shelly Cloud device-status endpoint for a single H&T
//! temperature/humidity sensor, normalizes the generation-specific response
//! shapes into one canonical reading, and serves it to a host framework as
//! HomeKit-style characteristics.

pub mod accessory;
pub mod config;
pub mod error;
pub mod reading;
pub mod sensor_poller;
pub mod shelly_cloud;

// Re-export commonly used types for easier access
pub use accessory::{CharacteristicUpdate, ShellyHntAccessory};
pub use config::{AccessoryConfig, ConfigError};
pub use error::ReadingError;
pub use reading::{BatteryStatus, Reading};
pub use sensor_poller::SensorPoller;
pub use shelly_cloud::ShellyCloudClient;
