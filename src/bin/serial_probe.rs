//! Glucosync - Serial port probe
//!
//! Opens the configured port once and closes it again.

use glucosync::logic::config::SerialConfig;
use glucosync::logic::serial::SerialDevice;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let config = SerialConfig::from_env();
    match SerialDevice::open(&config) {
        Ok(device) => {
            log::info!("Serial opened successfully");
            device.close();
            Ok(())
        }
        Err(e) => {
            log::error!("Serial error on {}: {}", config.port, e);
            Err(e.into())
        }
    }
}
