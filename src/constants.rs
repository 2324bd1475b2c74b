/// Current firmware version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Raw ADC samples averaged into one reading
pub const SAMPLES_PER_READING: usize = 16;
/// Pause between samples of one burst
pub const SAMPLE_SPACING_MS: u64 = 2;

/// Upper bound on readings sent in one batch payload
pub const MAX_BATCH_SAMPLES: usize = 12;

/// GPIO the divider is soldered to (ADC1 channel 0)
pub const THERMISTOR_GPIO: u8 = 36;

/// Readings buffered between the sensor and report tasks
pub const READING_QUEUE_DEPTH: usize = 4;

/// OTA password shipped in the example configuration
pub const FACTORY_OTA_PASSWORD: &str = "admin123";

/// Delay before touching the ADC after boot
pub const STARTUP_SETTLE_MS: u64 = 1000;
