use embassy_time::Instant;
use log::{error, info};

use temp_station::config::CONFIG;
use temp_station::payload::{format_temperature_payload, Batch};

use crate::sensor::ReadingChannel;

/// Turns accepted readings into upload payloads for the temperature endpoint.
///
/// With `samples_per_upload == 1` every reading becomes a single payload,
/// otherwise readings are collected and sent as one batch.
#[embassy_executor::task]
pub async fn report_task(readings: &'static ReadingChannel) {
    let per_upload = usize::from(CONFIG.samples_per_upload);
    let mut batch = Batch::new();

    loop {
        let temperature = match readings.receive().await {
            Ok(temperature) => temperature,
            // already logged by the sensor task, nothing is reported
            Err(_) => continue,
        };

        info!("Temperature: {:.2} C", temperature);

        if per_upload <= 1 {
            match format_temperature_payload(temperature) {
                Ok(payload) => info!("Payload for {}: {}", CONFIG.temp_data_url, payload),
                Err(e) => error!("Payload format error: {:?}", e),
            }
            continue;
        }

        // no wall clock without network time, batches are stamped with uptime
        let uptime_secs = Instant::now().as_secs() as u32;
        if !batch.push(temperature, uptime_secs) {
            error!("Batch full, dropping reading");
        }

        if batch.len() >= per_upload {
            match batch.payload() {
                Ok(payload) => info!("Batch payload for {}: {}", CONFIG.temp_data_url, payload),
                Err(e) => error!("Batch payload format error: {:?}", e),
            }
            batch.clear();
        }
    }
}
