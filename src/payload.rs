//! JSON bodies accepted by the temperature and user receivers.

use core::fmt::Write;
use heapless::{String, Vec};

use crate::constants::MAX_BATCH_SAMPLES;

/// Capacity of a formatted temperature payload
pub const PAYLOAD_CAPACITY: usize = 48;
/// Capacity of a formatted batch payload
pub const BATCH_PAYLOAD_CAPACITY: usize = 1024;
/// Capacity of a formatted user payload
pub const USER_PAYLOAD_CAPACITY: usize = 1024;

#[derive(Debug, PartialEq, Eq)]
pub enum Error {
    NonFinite,
    Format,
}

/// Formats the JSON body accepted by the temperature receiver:
/// `{"temperature": 21.37}`.
pub fn format_temperature_payload(temperature_c: f32) -> Result<String<PAYLOAD_CAPACITY>, Error> {
    if !temperature_c.is_finite() {
        return Err(Error::NonFinite);
    }

    let mut payload: String<PAYLOAD_CAPACITY> = String::new();
    write!(payload, "{{\"temperature\": {:.2}}}", temperature_c).map_err(|_| Error::Format)?;

    Ok(payload)
}

/// Formats a batch of `(temperature_c, offset_secs)` samples taken after
/// `timestamp`:
/// `{"timestamp": 120, "samples": [{"temp": 21.37, "offset": 0}, ...]}`.
pub fn format_batch_payload(
    timestamp: u32,
    samples: &[(f32, u32)],
) -> Result<String<BATCH_PAYLOAD_CAPACITY>, Error> {
    if samples.iter().any(|(temperature, _)| !temperature.is_finite()) {
        return Err(Error::NonFinite);
    }

    let mut payload: String<BATCH_PAYLOAD_CAPACITY> = String::new();
    write!(payload, "{{\"timestamp\": {}, \"samples\": [", timestamp).map_err(|_| Error::Format)?;
    for (i, (temperature, offset)) in samples.iter().enumerate() {
        if i > 0 {
            write!(payload, ", ").map_err(|_| Error::Format)?;
        }
        write!(payload, "{{\"temp\": {:.2}, \"offset\": {}}}", temperature, offset)
            .map_err(|_| Error::Format)?;
    }
    write!(payload, "]}}").map_err(|_| Error::Format)?;

    Ok(payload)
}

/// Readings collected for one batch upload.
///
/// The first sample's uptime becomes the batch timestamp; later samples
/// carry their offset from it in seconds.
#[derive(Debug, Default)]
pub struct Batch {
    timestamp: u32,
    samples: Vec<(f32, u32), MAX_BATCH_SAMPLES>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a reading taken at `uptime_secs`. Returns `false` when full.
    pub fn push(&mut self, temperature_c: f32, uptime_secs: u32) -> bool {
        if self.samples.is_empty() {
            self.timestamp = uptime_secs;
        }
        let offset = uptime_secs.saturating_sub(self.timestamp);
        self.samples.push((temperature_c, offset)).is_ok()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn payload(&self) -> Result<String<BATCH_PAYLOAD_CAPACITY>, Error> {
        format_batch_payload(self.timestamp, &self.samples)
    }

    pub fn clear(&mut self) {
        self.samples.clear();
    }
}

/// One device seen on the local access point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRecord<'a> {
    pub mac: &'a str,
    pub device: &'a str,
    pub email: &'a str,
    pub phone: &'a str,
    pub connect_time: u32,
    pub duration: u32,
}

/// Writes `value` as a JSON string literal.
fn write_json_str(out: &mut impl Write, value: &str) -> core::fmt::Result {
    out.write_char('"')?;
    for c in value.chars() {
        match c {
            '"' => out.write_str("\\\"")?,
            '\\' => out.write_str("\\\\")?,
            '\n' => out.write_str("\\n")?,
            '\r' => out.write_str("\\r")?,
            '\t' => out.write_str("\\t")?,
            c if (c as u32) < 0x20 => write!(out, "\\u{:04x}", c as u32)?,
            c => out.write_char(c)?,
        }
    }
    out.write_char('"')
}

fn write_user(out: &mut impl Write, user: &UserRecord<'_>) -> core::fmt::Result {
    out.write_str("{\"mac\": ")?;
    write_json_str(out, user.mac)?;
    out.write_str(", \"device\": ")?;
    write_json_str(out, user.device)?;
    out.write_str(", \"email\": ")?;
    write_json_str(out, user.email)?;
    out.write_str(", \"phone\": ")?;
    write_json_str(out, user.phone)?;
    write!(
        out,
        ", \"connect_time\": {}, \"duration\": {}}}",
        user.connect_time, user.duration
    )
}

/// Formats the JSON body accepted by the user receiver:
/// `{"users": [{"mac": "..", "device": "..", "email": "..", "phone": "..",
/// "connect_time": 0, "duration": 0}]}`.
pub fn format_user_payload(
    users: &[UserRecord<'_>],
) -> Result<String<USER_PAYLOAD_CAPACITY>, Error> {
    let mut payload: String<USER_PAYLOAD_CAPACITY> = String::new();

    payload.push_str("{\"users\": [").map_err(|_| Error::Format)?;
    for (i, user) in users.iter().enumerate() {
        if i > 0 {
            payload.push_str(", ").map_err(|_| Error::Format)?;
        }
        write_user(&mut payload, user).map_err(|_| Error::Format)?;
    }
    payload.push_str("]}").map_err(|_| Error::Format)?;

    Ok(payload)
}
