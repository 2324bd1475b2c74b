use temp_station::payload::format_temperature_payload;
use temp_station::sampling;
use temp_station::thermistor::{
    CalibrationParameters, DividerTopology, Error, Fault, Thermistor,
};

const CALIBRATION: CalibrationParameters = CalibrationParameters {
    series_resistor_ohms: 10_000.0,
    nominal_resistance_ohms: 10_000.0,
    nominal_temperature_c: 25.0,
    beta_coefficient: 3425.0,
};

const TOPOLOGIES: [DividerTopology; 2] = [
    DividerTopology::ThermistorHigh,
    DividerTopology::ThermistorLow,
];

#[test]
fn rails_fail_without_non_finite_values() {
    for topology in TOPOLOGIES {
        for full_scale in [1023, 4095] {
            let t = Thermistor::new(CALIBRATION, topology, full_scale).unwrap();
            for reading in [0, full_scale] {
                match t.estimate_temperature_c(reading) {
                    Err(Error::OutOfRange(Fault::OpenCircuit | Fault::ShortCircuit)) => {}
                    other => panic!("{topology:?} reading {reading}: {other:?}"),
                }
            }
        }
    }
}

#[test]
fn estimate_is_monotonic_in_the_reading() {
    for topology in TOPOLOGIES {
        let t = Thermistor::new(CALIBRATION, topology, 1023).unwrap();
        let mut previous = t.estimate_temperature_c(1).unwrap();

        for reading in 2..1023 {
            let current = t.estimate_temperature_c(reading).unwrap();
            assert!(current.is_finite());
            match topology {
                DividerTopology::ThermistorHigh => assert!(current > previous, "at {reading}"),
                DividerTopology::ThermistorLow => assert!(current < previous, "at {reading}"),
            }
            previous = current;
        }
    }
}

#[test]
fn synthesized_resistance_round_trips() {
    let t = Thermistor::new(CALIBRATION, DividerTopology::ThermistorHigh, 4095).unwrap();

    for tenth in -200..=1000 {
        let target = tenth as f32 / 10.0;
        let resistance = CALIBRATION.resistance_at(target).unwrap();
        let recovered = t.temperature_from_resistance(resistance).unwrap();
        assert!(
            (recovered - target).abs() < 0.1,
            "target {target}, recovered {recovered}"
        );
    }
}

#[test]
fn quantized_reading_round_trips_on_12_bit_adc() {
    for topology in TOPOLOGIES {
        let t = Thermistor::new(CALIBRATION, topology, 4095).unwrap();

        for tenth in -100..=800 {
            let target = tenth as f32 / 10.0;
            let reading = t.reading_for_temperature(target).unwrap();
            let recovered = t.estimate_temperature_c(reading).unwrap();
            assert!(
                (recovered - target).abs() < 0.1,
                "{topology:?} target {target}, reading {reading}, recovered {recovered}"
            );
        }
    }
}

#[test]
fn reference_divider_reads_25_degrees() {
    let t = Thermistor::new(CALIBRATION, DividerTopology::ThermistorHigh, 1023).unwrap();

    let at_nominal = t.temperature_from_resistance(10_000.0).unwrap();
    assert!((at_nominal - 25.0).abs() < 0.01);

    // 511 and 512 straddle R = 10k on a 10-bit converter
    for reading in [511, 512] {
        let temperature = t.estimate_temperature_c(reading).unwrap();
        assert!((temperature - 25.0).abs() < 0.5, "reading {reading}: {temperature}");
    }
}

#[test]
fn burst_to_payload() {
    let t = Thermistor::new(CALIBRATION, DividerTopology::ThermistorHigh, 1000).unwrap();

    let reading = sampling::combine(&[499, 500, 501, 500], t.full_scale()).unwrap();
    let temperature = t.estimate_temperature_c(reading).unwrap();
    let payload = format_temperature_payload(temperature).unwrap();
    assert_eq!(payload.as_str(), "{\"temperature\": 25.00}");

    // An open sensor in the burst never turns into a payload
    let reading = sampling::combine(&[499, 0, 501, 500], t.full_scale()).unwrap();
    assert_eq!(
        t.estimate_temperature_c(reading),
        Err(Error::OutOfRange(Fault::OpenCircuit))
    );
}
