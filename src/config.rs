use heapless::Vec;

use crate::constants::{FACTORY_OTA_PASSWORD, MAX_BATCH_SAMPLES, THERMISTOR_GPIO};
use crate::thermistor::{self, CalibrationParameters, DividerTopology, Thermistor};

pub struct Config {
    // Device ID (used as DHCP hostname)
    pub device_id: &'static str,

    // Wi-Fi SSID to connect to
    pub wifi_ssid: &'static str,

    // Wi-Fi pre-shared key (password)
    pub wifi_psk: &'static str,

    // Endpoint receiving temperature readings
    pub temp_data_url: &'static str,

    // Endpoint receiving connected user data
    pub user_data_url: &'static str,

    // Thermistor and series resistor calibration
    pub calibration: CalibrationParameters,

    // Side of the divider the thermistor is wired to
    pub divider_topology: DividerTopology,

    // Maximum ADC reading (1023 for 10-bit, 4095 for 12-bit)
    pub adc_full_scale: u16,

    // OLED display on/off
    pub display_enabled: bool,

    // OLED I2C data pin
    pub oled_sda_pin: u8,

    // OLED I2C clock pin
    pub oled_scl_pin: u8,

    // Analog input wired to the divider (fixed by the board, must be THERMISTOR_GPIO)
    pub thermistor_pin: u8,

    // Interval between readings in milliseconds
    pub send_interval_ms: u32,

    // Readings per upload: 1 sends each reading alone, more sends batches
    pub samples_per_upload: u8,

    // Wi-Fi connection attempts before giving up
    pub max_wifi_retries: u8,

    // HTTP request retries on failure
    pub max_http_retries: u8,

    // OTA hostname
    pub ota_hostname: &'static str,

    // OTA password (optional)
    pub ota_password: Option<&'static str>,
}

#[derive(Debug, PartialEq)]
pub enum Error {
    EmptySsid,
    InvalidUrl(&'static str),
    Calibration(thermistor::Error),
    ZeroSendInterval,
    InvalidBatchSize,
    DisplayPinConflict,
    ThermistorPinConflict,
    UnsupportedThermistorPin,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Warning {
    AtypicalBeta,
    FactoryOtaPassword,
    OpenNetwork,
}

/// Accepts `http://host[:port][/path]` and `https://...`.
fn is_http_url(url: &str) -> bool {
    let rest = match url
        .strip_prefix("http://")
        .or_else(|| url.strip_prefix("https://"))
    {
        Some(rest) => rest,
        None => return false,
    };

    let authority = rest.split('/').next().unwrap_or("");
    let host = authority.split(':').next().unwrap_or("");

    !host.is_empty() && !authority.contains(char::is_whitespace)
}

impl Config {
    /// Checks the configuration once at startup; returns the first problem found.
    pub fn validate(&self) -> Result<(), Error> {
        if self.wifi_ssid.is_empty() {
            return Err(Error::EmptySsid);
        }

        if !is_http_url(self.temp_data_url) {
            return Err(Error::InvalidUrl("temp_data_url"));
        }
        if !is_http_url(self.user_data_url) {
            return Err(Error::InvalidUrl("user_data_url"));
        }

        self.thermistor().map_err(Error::Calibration)?;

        if self.send_interval_ms == 0 {
            return Err(Error::ZeroSendInterval);
        }

        if self.samples_per_upload == 0 || usize::from(self.samples_per_upload) > MAX_BATCH_SAMPLES {
            return Err(Error::InvalidBatchSize);
        }

        if self.oled_sda_pin == self.oled_scl_pin {
            return Err(Error::DisplayPinConflict);
        }

        if self.display_enabled
            && (self.thermistor_pin == self.oled_sda_pin || self.thermistor_pin == self.oled_scl_pin)
        {
            return Err(Error::ThermistorPinConflict);
        }

        if self.thermistor_pin != THERMISTOR_GPIO {
            return Err(Error::UnsupportedThermistorPin);
        }

        Ok(())
    }

    /// Non-fatal issues worth logging at startup.
    pub fn warnings(&self) -> Vec<Warning, 3> {
        let mut warnings = Vec::new();

        if !self.calibration.beta_is_typical() {
            warnings.push(Warning::AtypicalBeta).ok();
        }
        if self.ota_password == Some(FACTORY_OTA_PASSWORD) {
            warnings.push(Warning::FactoryOtaPassword).ok();
        }
        if self.wifi_psk.is_empty() {
            warnings.push(Warning::OpenNetwork).ok();
        }

        warnings
    }

    /// Builds the temperature estimator for the configured sensor.
    pub fn thermistor(&self) -> Result<Thermistor, thermistor::Error> {
        Thermistor::new(self.calibration, self.divider_topology, self.adc_full_scale)
    }
}

// config values are generated at compile time
include!(concat!(env!("OUT_DIR"), "/config.rs"));

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        Config {
            device_id: "temp-station",
            wifi_ssid: "home",
            wifi_psk: "secret",
            temp_data_url: "http://192.168.1.100/temp-station/api/receive.php",
            user_data_url: "https://example.com:8443/api/receive_user.php",
            calibration: CalibrationParameters {
                series_resistor_ohms: 10_000.0,
                nominal_resistance_ohms: 10_000.0,
                nominal_temperature_c: 25.0,
                beta_coefficient: 3425.0,
            },
            divider_topology: DividerTopology::ThermistorHigh,
            adc_full_scale: 1023,
            display_enabled: true,
            oled_sda_pin: 14,
            oled_scl_pin: 12,
            thermistor_pin: 36,
            send_interval_ms: 10 * 60 * 1000,
            samples_per_upload: 1,
            max_wifi_retries: 20,
            max_http_retries: 2,
            ota_hostname: "TempMonitor",
            ota_password: Some("correct-horse"),
        }
    }

    #[test]
    fn valid_config_passes() {
        let config = config();
        assert_eq!(config.validate(), Ok(()));
        assert!(config.warnings().is_empty());
    }

    #[test]
    fn empty_ssid_is_rejected() {
        let mut config = config();
        config.wifi_ssid = "";
        assert_eq!(config.validate(), Err(Error::EmptySsid));
    }

    #[test]
    fn urls_need_scheme_and_host() {
        let mut config = config();
        config.temp_data_url = "192.168.1.100/api/receive.php";
        assert_eq!(config.validate(), Err(Error::InvalidUrl("temp_data_url")));

        let mut config = self::config();
        config.user_data_url = "http:///receive_user.php";
        assert_eq!(config.validate(), Err(Error::InvalidUrl("user_data_url")));

        let mut config = self::config();
        config.user_data_url = "ftp://example.com/receive_user.php";
        assert_eq!(config.validate(), Err(Error::InvalidUrl("user_data_url")));

        assert!(is_http_url("http://example.com"));
        assert!(is_http_url("http://10.0.0.2:8080/"));
        assert!(!is_http_url("http://:8080/"));
        assert!(!is_http_url("http://my host/"));
    }

    #[test]
    fn calibration_errors_are_reported() {
        let mut config = config();
        config.calibration.nominal_resistance_ohms = 0.0;
        assert_eq!(
            config.validate(),
            Err(Error::Calibration(thermistor::Error::InvalidCalibration))
        );

        let mut config = self::config();
        config.adc_full_scale = 0;
        assert_eq!(
            config.validate(),
            Err(Error::Calibration(thermistor::Error::InvalidFullScale))
        );
    }

    #[test]
    fn zero_interval_is_rejected() {
        let mut config = config();
        config.send_interval_ms = 0;
        assert_eq!(config.validate(), Err(Error::ZeroSendInterval));
    }

    #[test]
    fn pin_conflicts() {
        let mut config = config();
        config.oled_scl_pin = config.oled_sda_pin;
        assert_eq!(config.validate(), Err(Error::DisplayPinConflict));

        let mut config = self::config();
        config.oled_sda_pin = THERMISTOR_GPIO;
        assert_eq!(config.validate(), Err(Error::ThermistorPinConflict));

        // The display pins are free when the display is off
        config.display_enabled = false;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn thermistor_pin_must_match_the_wired_input() {
        let mut config = config();
        config.thermistor_pin = 34;
        assert_eq!(config.validate(), Err(Error::UnsupportedThermistorPin));

        config.thermistor_pin = THERMISTOR_GPIO;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn batch_size_is_bounded() {
        let mut config = config();
        config.samples_per_upload = 0;
        assert_eq!(config.validate(), Err(Error::InvalidBatchSize));

        config.samples_per_upload = MAX_BATCH_SAMPLES as u8 + 1;
        assert_eq!(config.validate(), Err(Error::InvalidBatchSize));

        config.samples_per_upload = MAX_BATCH_SAMPLES as u8;
        assert_eq!(config.validate(), Ok(()));
    }

    #[test]
    fn warnings_are_collected() {
        let mut config = config();
        config.calibration.beta_coefficient = 34250.0;
        config.ota_password = Some(FACTORY_OTA_PASSWORD);
        config.wifi_psk = "";

        assert_eq!(config.validate(), Ok(()));
        assert_eq!(
            config.warnings().as_slice(),
            &[
                Warning::AtypicalBeta,
                Warning::FactoryOtaPassword,
                Warning::OpenNetwork
            ]
        );
    }

    #[test]
    fn estimator_carries_the_configured_divider() {
        let config = config();
        let thermistor = config.thermistor().unwrap();
        assert_eq!(thermistor.calibration(), &config.calibration);
        assert_eq!(thermistor.topology(), DividerTopology::ThermistorHigh);
        assert_eq!(thermistor.full_scale(), 1023);
    }

    #[test]
    fn generated_config_builds_an_estimator() {
        assert!(CONFIG.thermistor().is_ok());
    }
}
