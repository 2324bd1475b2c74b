#![no_std]
#![no_main]

use static_cell::StaticCell;

use embassy_executor::Spawner;
use embassy_sync::channel::Channel;
use embassy_time::{Duration, Timer};

use esp_backtrace as _;
use esp_hal::{
    self as hal,
    analog::adc::{Adc, AdcConfig, Attenuation},
    timer::timg::TimerGroup,
};
use esp_println::logger::init_logger;

use temp_station::config::{Config, Warning, CONFIG};
use temp_station::constants::*;

mod measurement;
mod sensor;

use sensor::{ReadingChannel, ThermistorSensor};

esp_bootloader_esp_idf::esp_app_desc!();

static READINGS: StaticCell<ReadingChannel> = StaticCell::new();

#[esp_hal_embassy::main]
async fn main(spawner: Spawner) {
    init_logger(log::LevelFilter::Info);
    log::info!("temp_station v{}", VERSION);

    let peripherals = hal::init(hal::Config::default());

    let timg0 = TimerGroup::new(peripherals.TIMG0);
    esp_hal_embassy::init(timg0.timer0);

    log_config(&CONFIG);

    if let Err(e) = CONFIG.validate() {
        log::error!("Invalid configuration: {:?}", e);
        halt().await;
    }

    for warning in CONFIG.warnings() {
        match warning {
            Warning::AtypicalBeta => log::warn!(
                "Beta coefficient {} is unusual, check the thermistor datasheet",
                CONFIG.calibration.beta_coefficient
            ),
            Warning::FactoryOtaPassword => {
                log::warn!("OTA password is still the factory default, change it for production")
            }
            Warning::OpenNetwork => log::warn!("Wi-Fi PSK is empty, joining an open network"),
        }
    }

    let thermistor = match CONFIG.thermistor() {
        Ok(thermistor) => thermistor,
        Err(e) => {
            log::error!("Thermistor setup failed: {:?}", e);
            halt().await
        }
    };

    let calibration = thermistor.calibration();
    log::info!(
        "Thermistor on GPIO{}: series {} ohm, R0 {} ohm at {} C, B {}, {:?}, full scale {}",
        THERMISTOR_GPIO,
        calibration.series_resistor_ohms,
        calibration.nominal_resistance_ohms,
        calibration.nominal_temperature_c,
        calibration.beta_coefficient,
        thermistor.topology(),
        thermistor.full_scale()
    );

    // let the divider settle before the first conversion
    Timer::after(Duration::from_millis(STARTUP_SETTLE_MS)).await;

    let mut adc_config = AdcConfig::new();
    let pin = adc_config.enable_pin(peripherals.GPIO36, Attenuation::_11dB);
    let adc = Adc::new(peripherals.ADC1, adc_config);

    let readings = READINGS.init(Channel::new());
    let sensor = ThermistorSensor::new(adc, pin, thermistor);
    let interval = Duration::from_millis(CONFIG.send_interval_ms.into());

    spawner
        .spawn(sensor::sensor_task(sensor, readings, interval))
        .ok();
    spawner.spawn(measurement::report_task(readings)).ok();
}

fn log_config(config: &Config) {
    log::info!("Device ID: {}", config.device_id);
    log::info!("Wi-Fi SSID: {:?} (PSK hidden)", config.wifi_ssid);
    log::info!("Temperature endpoint: {}", config.temp_data_url);
    log::info!("User data endpoint: {}", config.user_data_url);
    log::info!(
        "Display: {} (SDA GPIO{}, SCL GPIO{})",
        if config.display_enabled { "on" } else { "off" },
        config.oled_sda_pin,
        config.oled_scl_pin
    );
    log::info!(
        "Send interval: {} ms, {} reading(s) per upload",
        config.send_interval_ms,
        config.samples_per_upload
    );
    log::info!(
        "Retries: Wi-Fi {}, HTTP {}",
        config.max_wifi_retries,
        config.max_http_retries
    );
    log::info!(
        "OTA hostname: {} (password {})",
        config.ota_hostname,
        if config.ota_password.is_some() { "set" } else { "unset" }
    );
}

async fn halt() -> ! {
    loop {
        Timer::after(Duration::from_secs(60)).await;
    }
}
