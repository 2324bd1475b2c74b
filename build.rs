use std::{env, error::Error, fs, path::Path};

use serde::Deserialize;

#[derive(Deserialize)]
struct RawConfig {
    device_id: String,
    wifi_ssid: String,
    wifi_psk: String,
    temp_data_url: String,
    user_data_url: String,
    series_resistor_ohms: f32,
    nominal_resistance_ohms: f32,
    nominal_temperature_c: f32,
    beta_coefficient: f32,
    divider_topology: String,
    adc_full_scale: u16,
    display_enabled: bool,
    oled_sda_pin: u8,
    oled_scl_pin: u8,
    thermistor_pin: u8,
    send_interval_ms: u32,
    samples_per_upload: u8,
    max_wifi_retries: u8,
    max_http_retries: u8,
    ota_hostname: String,
    ota_password: Option<String>,
}

fn topology_variant(name: &str) -> Result<&'static str, Box<dyn Error>> {
    match name {
        "thermistor-high" => Ok("DividerTopology::ThermistorHigh"),
        "thermistor-low" => Ok("DividerTopology::ThermistorLow"),
        other => Err(format!(
            "divider_topology must be \"thermistor-high\" or \"thermistor-low\", got {other:?}"
        )
        .into()),
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    // Tell Cargo to rerun if toml changes
    println!("cargo:rerun-if-changed=cfg.toml");
    println!("cargo:rerun-if-changed=cfg.toml.example");

    let source = if Path::new("cfg.toml").exists() {
        "cfg.toml"
    } else {
        println!("cargo:warning=cfg.toml not found, using cfg.toml.example");
        "cfg.toml.example"
    };

    // Read and parse
    let toml_str = fs::read_to_string(source)?;
    let raw: RawConfig = toml::from_str(&toml_str)?;

    let topology = topology_variant(&raw.divider_topology)?;

    if !(2000.0..=6000.0).contains(&raw.beta_coefficient) {
        println!(
            "cargo:warning=beta_coefficient {} is outside 2000-6000, check the thermistor datasheet",
            raw.beta_coefficient
        );
    }

    // Generate Rust code
    let code = format!(
        r#"
        pub const CONFIG: Config = Config {{
            device_id: {device_id:?},
            wifi_ssid: {ssid:?},
            wifi_psk: {psk:?},
            temp_data_url: {temp_url:?},
            user_data_url: {user_url:?},
            calibration: CalibrationParameters {{
                series_resistor_ohms: {series:?},
                nominal_resistance_ohms: {nominal_r:?},
                nominal_temperature_c: {nominal_t:?},
                beta_coefficient: {beta:?},
            }},
            divider_topology: {topology},
            adc_full_scale: {full_scale},
            display_enabled: {display},
            oled_sda_pin: {sda},
            oled_scl_pin: {scl},
            thermistor_pin: {thermistor_pin},
            send_interval_ms: {interval},
            samples_per_upload: {per_upload},
            max_wifi_retries: {wifi_retries},
            max_http_retries: {http_retries},
            ota_hostname: {ota_host:?},
            ota_password: {ota_password:?},
        }};
    "#,
        device_id = raw.device_id,
        ssid = raw.wifi_ssid,
        psk = raw.wifi_psk,
        temp_url = raw.temp_data_url,
        user_url = raw.user_data_url,
        series = raw.series_resistor_ohms,
        nominal_r = raw.nominal_resistance_ohms,
        nominal_t = raw.nominal_temperature_c,
        beta = raw.beta_coefficient,
        full_scale = raw.adc_full_scale,
        display = raw.display_enabled,
        sda = raw.oled_sda_pin,
        scl = raw.oled_scl_pin,
        thermistor_pin = raw.thermistor_pin,
        interval = raw.send_interval_ms,
        per_upload = raw.samples_per_upload,
        wifi_retries = raw.max_wifi_retries,
        http_retries = raw.max_http_retries,
        ota_host = raw.ota_hostname,
        ota_password = raw.ota_password,
    );

    let out_dir = env::var("OUT_DIR")?;
    let dest_path = Path::new(&out_dir).join("config.rs");

    fs::write(dest_path, code)?;
    Ok(())
}
