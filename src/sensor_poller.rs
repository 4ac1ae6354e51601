use std::sync::{Arc, Mutex};

use tokio::sync::mpsc::{error::TrySendError, Sender};
use tokio::time::{interval, MissedTickBehavior};

use crate::accessory::CharacteristicUpdate;
use crate::config::AccessoryConfig;
use crate::reading::Reading;
use crate::shelly_cloud::ShellyCloudClient;

/// Isolated task that keeps the shared reading cache current for one device.
/// Single writer: only this task ever replaces the cached reading, and it
/// replaces it wholesale.
pub struct SensorPoller {
    config: AccessoryConfig,
    client: ShellyCloudClient,
    cache: Arc<Mutex<Option<Reading>>>,
    update_sender: Sender<CharacteristicUpdate>,
}

impl SensorPoller {
    pub fn new(
        config: AccessoryConfig,
        cache: Arc<Mutex<Option<Reading>>>,
        update_sender: Sender<CharacteristicUpdate>,
    ) -> Self {
        let client = ShellyCloudClient::new(&config);
        Self {
            config,
            client,
            cache,
            update_sender,
        }
    }

    /// Spawns the poller in its own isolated task
    pub fn spawn(self) {
        tokio::spawn(async move {
            let mut poller = self;
            poller.run().await;
        });
    }

    /// Main execution loop. The first tick fires immediately, so a reading is
    /// requested right at startup. A failed poll is logged and retried on the
    /// next tick; there is no backoff.
    async fn run(&mut self) {
        println!(
            "Starting status poller for device {} every {:?}",
            self.config.device_id, self.config.polling_interval
        );

        let mut poll_interval = interval(self.config.polling_interval);
        // A fetch that outlives its tick delays the next one instead of
        // bursting, so at most one request is ever in flight.
        poll_interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            poll_interval.tick().await;

            if let Err(e) = self.fetch_and_update().await {
                println!("Device status fetch failed, keeping last reading: {e:#}");
            }
        }
    }

    /// One poll cycle: fetch, classify, commit the merged reading wholesale,
    /// publish characteristic updates.
    async fn fetch_and_update(&mut self) -> anyhow::Result<()> {
        let status = self.client.fetch_device_status().await?;

        if status.cloud_disabled() {
            println!(
                "Shelly Cloud for device {} is not enabled!",
                self.config.device_id
            );
        }

        let reading = {
            let mut cache = self.cache.lock().expect("Shall unlock reading cache");
            let reading = match cache.as_ref() {
                Some(previous) => Reading::from_status(&status).merged_with(previous),
                None => Reading::from_status(&status),
            };
            *cache = Some(reading);
            reading
        };

        self.publish(&reading);
        Ok(())
    }

    /// Pushes the committed reading to the consumer side. A missing or idle
    /// consumer is never allowed to stall the poll loop: a full channel drops
    /// the update, the cache keeps serving the getters either way.
    fn publish(&self, reading: &Reading) {
        let mut updates = Vec::new();
        if let Some(temperature) = reading.temperature_c {
            updates.push(CharacteristicUpdate::CurrentTemperature(temperature));
        }
        if let Some(humidity) = reading.humidity_pct {
            updates.push(CharacteristicUpdate::CurrentRelativeHumidity(humidity));
        }
        updates.push(CharacteristicUpdate::StatusLowBattery(reading.battery));

        for update in updates {
            match self.update_sender.try_send(update) {
                Ok(()) => {}
                Err(TrySendError::Full(update)) => {
                    println!("Consumer not keeping up, dropping update {update:?}");
                }
                Err(TrySendError::Closed(_)) => {
                    println!("No consumer for characteristic updates");
                    return;
                }
            }
        }
    }
}
