use embassy_sync::{blocking_mutex::raw::NoopRawMutex, channel::Channel};
use embassy_time::{Duration, Timer};
use esp_hal::{
    analog::adc::{Adc, AdcPin},
    peripherals::{ADC1, GPIO36},
    Blocking,
};
use heapless::Vec;
use log::{info, warn};

use temp_station::constants::{READING_QUEUE_DEPTH, SAMPLES_PER_READING, SAMPLE_SPACING_MS};
use temp_station::sampling;
use temp_station::thermistor::{self, Thermistor};

pub type ThermistorAdc = Adc<'static, ADC1<'static>, Blocking>;
pub type ThermistorPin = AdcPin<GPIO36<'static>, ADC1<'static>>;

/// Estimates handed from the sensor task to the report task
pub type ReadingChannel = Channel<NoopRawMutex, Result<f32, Error>, READING_QUEUE_DEPTH>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    Adc,
    EmptyBurst,
    Thermistor(thermistor::Error),
}

pub struct ThermistorSensor {
    adc: ThermistorAdc,
    pin: ThermistorPin,
    thermistor: Thermistor,
}

impl ThermistorSensor {
    pub fn new(adc: ThermistorAdc, pin: ThermistorPin, thermistor: Thermistor) -> Self {
        Self {
            adc,
            pin,
            thermistor,
        }
    }

    async fn read_raw(&mut self) -> Result<u16, Error> {
        loop {
            match self.adc.read_oneshot(&mut self.pin) {
                Ok(value) => return Ok(value),
                Err(nb::Error::WouldBlock) => Timer::after(Duration::from_millis(1)).await,
                Err(nb::Error::Other(_)) => return Err(Error::Adc),
            }
        }
    }

    /// Takes one burst of samples and combines them into a single reading.
    pub async fn sample(&mut self) -> Result<u16, Error> {
        let mut samples: Vec<u16, SAMPLES_PER_READING> = Vec::new();

        while !samples.is_full() {
            let raw = self.read_raw().await?;
            samples.push(raw).ok();
            Timer::after(Duration::from_millis(SAMPLE_SPACING_MS)).await;
        }

        sampling::combine(&samples, self.thermistor.full_scale()).ok_or(Error::EmptyBurst)
    }

    pub async fn measure(&mut self) -> Result<f32, Error> {
        let reading = self.sample().await?;
        log::debug!("ADC reading: {}", reading);

        self.thermistor
            .estimate_temperature_c(reading)
            .map_err(Error::Thermistor)
    }
}

#[embassy_executor::task]
pub async fn sensor_task(
    mut sensor: ThermistorSensor,
    readings: &'static ReadingChannel,
    interval: Duration,
) {
    info!("Sensor task started, interval {} ms", interval.as_millis());

    loop {
        let result = sensor.measure().await;
        if let Err(e) = result {
            warn!("Temperature measurement rejected: {:?}", e);
        }

        // Keep the sensing cadence even if the report task falls behind
        if readings.try_send(result).is_err() {
            warn!("Reading queue full, dropping measurement");
        }

        Timer::after(interval).await;
    }
}
