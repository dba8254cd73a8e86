//! Glucosync - Realtime inference service
//!
//! Reads `DATA,...,<absorbance>` frames from the sensor board, predicts
//! glucose, inserts the reading into the remote table and echoes the
//! prediction back over the serial link.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use anyhow::Context;

use glucosync::constants;
use glucosync::logic::config::InferenceConfig;
use glucosync::logic::inference_loop;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    log::info!("Starting {} v{} (inference)", constants::APP_NAME, constants::APP_VERSION);

    if let Err(e) = serve() {
        log::error!("{:#}", e);
        return Err(e);
    }
    Ok(())
}

fn serve() -> anyhow::Result<()> {
    let config = InferenceConfig::from_env().context("invalid configuration")?;
    let mut context = inference_loop::bootstrap(&config).context("startup failed")?;

    let shutdown = Arc::new(AtomicBool::new(false));
    install_interrupt_handler(shutdown.clone()).context("failed to install Ctrl-C handler")?;

    context.run(&shutdown);

    log::info!("Exiting...");
    context.link.close();
    Ok(())
}

/// Waits for Ctrl-C on a dedicated thread and raises the shutdown flag
fn install_interrupt_handler(shutdown: Arc<AtomicBool>) -> std::io::Result<()> {
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    std::thread::spawn(move || {
        rt.block_on(async {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    log::info!("Interrupt received, shutting down");
                    shutdown.store(true, Ordering::SeqCst);
                }
                Err(e) => log::error!("Failed to listen for Ctrl-C: {}", e),
            }
        });
    });

    Ok(())
}
