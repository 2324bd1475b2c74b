//! NTC thermistor temperature estimation using the Beta model.
//!
//! The thermistor sits in a two-resistor divider with a fixed series
//! resistor. The raw ADC value gives the divider ratio, the ratio gives the
//! thermistor resistance, and the Beta equation
//! `1/T = 1/T0 + ln(R/R0) / B` gives the temperature.

use libm::{expf, logf, roundf};

/// Offset between degrees Celsius and Kelvin
pub const KELVIN_OFFSET: f32 = 273.15;

/// Lowest result accepted as a physical temperature, in Kelvin
pub const MIN_KELVIN: f32 = 1.0;

/// Beta values outside this range usually mean a datasheet transcription error
pub const TYPICAL_BETA_RANGE: core::ops::RangeInclusive<f32> = 2000.0..=6000.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    /// Thermistor disconnected (infinite resistance)
    OpenCircuit,
    /// Thermistor shorted (zero resistance)
    ShortCircuit,
    /// Reading beyond what the converter can produce
    AboveFullScale,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Error {
    OutOfRange(Fault),
    InvalidResistance,
    NonFinite,
    /// Result at or near absolute zero, usually a bad Beta coefficient
    BelowAbsoluteZero,
    InvalidCalibration,
    InvalidFullScale,
}

/// Which side of the divider the thermistor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DividerTopology {
    /// VCC - thermistor - ADC - series resistor - GND.
    /// `R = series * (full_scale / reading - 1)`; temperature rises with the reading.
    ThermistorHigh,
    /// VCC - series resistor - ADC - thermistor - GND.
    /// `R = series * reading / (full_scale - reading)`; temperature falls as the reading rises.
    ThermistorLow,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibrationParameters {
    pub series_resistor_ohms: f32,
    pub nominal_resistance_ohms: f32,
    pub nominal_temperature_c: f32,
    pub beta_coefficient: f32,
}

fn positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

impl CalibrationParameters {
    /// All four parameters must be positive and finite.
    pub fn validate(&self) -> Result<(), Error> {
        let values = [
            self.series_resistor_ohms,
            self.nominal_resistance_ohms,
            self.nominal_temperature_c,
            self.beta_coefficient,
        ];

        if values.iter().all(|v| positive_finite(*v)) {
            Ok(())
        } else {
            Err(Error::InvalidCalibration)
        }
    }

    pub fn beta_is_typical(&self) -> bool {
        TYPICAL_BETA_RANGE.contains(&self.beta_coefficient)
    }

    fn nominal_temperature_k(&self) -> f32 {
        self.nominal_temperature_c + KELVIN_OFFSET
    }

    /// Resistance the thermistor should show at `temperature_c`.
    /// Returns `None` at or below absolute zero or on overflow.
    pub fn resistance_at(&self, temperature_c: f32) -> Option<f32> {
        let kelvin = temperature_c + KELVIN_OFFSET;
        if !positive_finite(kelvin) {
            return None;
        }

        let exponent = self.beta_coefficient * (1.0 / kelvin - 1.0 / self.nominal_temperature_k());
        let resistance = self.nominal_resistance_ohms * expf(exponent);

        positive_finite(resistance).then_some(resistance)
    }
}

/// A calibrated thermistor wired to an ADC input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thermistor {
    calibration: CalibrationParameters,
    topology: DividerTopology,
    full_scale: u16,
}

impl Thermistor {
    pub fn new(
        calibration: CalibrationParameters,
        topology: DividerTopology,
        full_scale: u16,
    ) -> Result<Self, Error> {
        calibration.validate()?;

        // Needs at least one reading strictly between the rails
        if full_scale < 2 {
            return Err(Error::InvalidFullScale);
        }

        Ok(Self {
            calibration,
            topology,
            full_scale,
        })
    }

    pub fn calibration(&self) -> &CalibrationParameters {
        &self.calibration
    }

    pub fn topology(&self) -> DividerTopology {
        self.topology
    }

    pub fn full_scale(&self) -> u16 {
        self.full_scale
    }

    /// Rail readings have no finite resistance, so map them to the physical fault.
    fn check_reading(&self, reading: u16) -> Result<(), Error> {
        let fault = if reading > self.full_scale {
            Fault::AboveFullScale
        } else if reading == 0 {
            match self.topology {
                DividerTopology::ThermistorHigh => Fault::OpenCircuit,
                DividerTopology::ThermistorLow => Fault::ShortCircuit,
            }
        } else if reading == self.full_scale {
            match self.topology {
                DividerTopology::ThermistorHigh => Fault::ShortCircuit,
                DividerTopology::ThermistorLow => Fault::OpenCircuit,
            }
        } else {
            return Ok(());
        };

        Err(Error::OutOfRange(fault))
    }

    /// Thermistor resistance in ohms for a raw ADC reading.
    pub fn resistance_ohms(&self, reading: u16) -> Result<f32, Error> {
        self.check_reading(reading)?;

        let series = self.calibration.series_resistor_ohms;
        let reading = f32::from(reading);
        let full_scale = f32::from(self.full_scale);

        let resistance = match self.topology {
            DividerTopology::ThermistorHigh => series * (full_scale / reading - 1.0),
            DividerTopology::ThermistorLow => series * reading / (full_scale - reading),
        };

        if positive_finite(resistance) {
            Ok(resistance)
        } else {
            Err(Error::InvalidResistance)
        }
    }

    /// Beta equation, resistance in ohms to degrees Celsius.
    pub fn temperature_from_resistance(&self, resistance_ohms: f32) -> Result<f32, Error> {
        if !positive_finite(resistance_ohms) {
            return Err(Error::InvalidResistance);
        }

        let inverse_kelvin = 1.0 / self.calibration.nominal_temperature_k()
            + logf(resistance_ohms / self.calibration.nominal_resistance_ohms)
                / self.calibration.beta_coefficient;
        let kelvin = 1.0 / inverse_kelvin;

        if !kelvin.is_finite() {
            return Err(Error::NonFinite);
        }
        if kelvin < MIN_KELVIN {
            return Err(Error::BelowAbsoluteZero);
        }

        Ok(kelvin - KELVIN_OFFSET)
    }

    /// Estimated temperature in degrees Celsius for a raw ADC reading.
    ///
    /// Rail readings (0 and full scale) fail with [`Error::OutOfRange`]; the
    /// result is always finite when `Ok`.
    pub fn estimate_temperature_c(&self, reading: u16) -> Result<f32, Error> {
        let resistance = self.resistance_ohms(reading)?;
        self.temperature_from_resistance(resistance)
    }

    /// Nearest ADC reading the divider produces at `temperature_c`.
    pub fn reading_for_temperature(&self, temperature_c: f32) -> Option<u16> {
        let resistance = self.calibration.resistance_at(temperature_c)?;
        let series = self.calibration.series_resistor_ohms;
        let full_scale = f32::from(self.full_scale);

        let ratio = match self.topology {
            DividerTopology::ThermistorHigh => series / (series + resistance),
            DividerTopology::ThermistorLow => resistance / (series + resistance),
        };

        let reading = roundf(ratio * full_scale);
        (reading.is_finite() && (0.0..=full_scale).contains(&reading)).then_some(reading as u16)
    }
}
