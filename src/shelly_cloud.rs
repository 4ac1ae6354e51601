use serde_derive::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::AccessoryConfig;

// Well under the default 30s polling interval, so a hung request can never
// back the poll loop up across ticks.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Client for the Shelly Cloud device-status endpoint.
/// API is documented at https://shelly-api-docs.shelly.cloud/cloud-control-api/communication
pub struct ShellyCloudClient {
    endpoint_url: String,
    device_id: String,
    auth_key: String,
    client: reqwest::Client,
}

impl ShellyCloudClient {
    pub fn new(config: &AccessoryConfig) -> Self {
        Self {
            endpoint_url: config.server_url.clone(),
            device_id: config.device_id.clone(),
            auth_key: config.authorization_key.clone(),
            client: reqwest::Client::new(),
        }
    }

    /// Requests the current status of the configured device. Any transport
    /// failure, non-2xx status or unparseable body is an error; the caller
    /// decides what to do with the previous reading.
    pub async fn fetch_device_status(&self) -> Result<DeviceStatus, anyhow::Error> {
        let envelope: StatusEnvelope = self
            .client
            .post(format!("{}/device/status", self.endpoint_url))
            .timeout(REQUEST_TIMEOUT)
            .json(&StatusRequest {
                id: &self.device_id,
                auth_key: &self.auth_key,
            })
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(envelope.data.device_status)
    }
}

#[derive(Debug, Serialize)]
struct StatusRequest<'a> {
    id: &'a str,
    auth_key: &'a str,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEnvelope {
    pub data: StatusData,
}

#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusData {
    pub device_status: DeviceStatus,
}

/// Raw device status. First and third generation H&T firmware report the same
/// quantities under different keys, so every block is optional and one struct
/// can carry either layout (or, in principle, a mix of both).
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeviceStatus {
    // first gen H&T
    pub tmp: Option<TemperatureGen1>,
    pub hum: Option<HumidityGen1>,
    pub bat: Option<BatteryGen1>,
    // third gen H&T
    #[serde(rename = "temperature:0")]
    pub temperature: Option<TemperatureGen3>,
    #[serde(rename = "humidity:0")]
    pub humidity: Option<HumidityGen3>,
    #[serde(rename = "devicepower:0")]
    pub device_power: Option<DevicePowerGen3>,
    pub cloud: Option<CloudStatus>,
}

// The leaf fields are optional so one gutted block cannot fail the whole
// envelope parse; a block without its value simply never classifies.

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureGen1 {
    #[serde(rename = "tC")]
    pub t_c: Option<f64>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityGen1 {
    pub value: Option<f64>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryGen1 {
    pub value: Option<f64>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TemperatureGen3 {
    #[serde(rename = "tC")]
    pub t_c: Option<f64>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HumidityGen3 {
    pub rh: Option<f64>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DevicePowerGen3 {
    pub battery: Option<BatteryLevel>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryLevel {
    pub percent: Option<f64>,
}

#[derive(Default, Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CloudStatus {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default)]
    pub connected: bool,
}

impl DeviceStatus {
    /// True when the status carries a cloud block with neither flag set.
    /// Readings still work over the local status server in that case, so this
    /// only ever warrants a warning.
    pub fn cloud_disabled(&self) -> bool {
        self.cloud
            .is_some_and(|cloud| !cloud.enabled && !cloud.connected)
    }
}
