use shelly_hnt_bridge::{AccessoryConfig, CharacteristicUpdate, ShellyHntAccessory};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    println!("Starting Shelly H&T bridge");
    let config = AccessoryConfig::from_env()?;

    let (accessory, mut updates) = ShellyHntAccessory::new(config);
    println!("Polling as accessory `{}`", accessory.name());

    // The poller runs for the lifetime of the process; here we just render
    // every characteristic update it pushes.
    while let Some(update) = updates.recv().await {
        match update {
            CharacteristicUpdate::CurrentTemperature(celsius) => {
                println!("Temperature {celsius}C");
            }
            CharacteristicUpdate::CurrentRelativeHumidity(percent) => {
                println!("Humidity {percent}%");
            }
            CharacteristicUpdate::StatusLowBattery(status) => {
                println!("Battery {status:?}");
            }
        }
    }

    Ok(())
}
