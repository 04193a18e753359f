//! NMEA 0183 GGA sentence parsing.
//!
//! Only GGA (fix data) is decoded; any talker id is accepted (`GP`, `GN`,
//! `GL`, ...). When a `*hh` checksum is present it must match.

use chrono::NaiveTime;
use gpsmanager_core::Fix;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum NmeaError {
    #[error("Sentence does not start with '$'")]
    MissingStart,

    #[error("Checksum mismatch: expected {expected:02X}, computed {computed:02X}")]
    ChecksumMismatch { expected: u8, computed: u8 },

    #[error("Invalid checksum field: {0}")]
    InvalidChecksum(String),

    #[error("Unsupported sentence: {0}")]
    Unsupported(String),

    #[error("Expected at least {expected} fields, found {found}")]
    TooFewFields { expected: usize, found: usize },

    #[error("Malformed {field}: {value:?}")]
    MalformedField { field: &'static str, value: String },
}

/// GPS fix quality indicator (GGA field 6).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixQuality {
    Invalid,
    Gps,
    Dgps,
    Pps,
    Rtk,
    FloatRtk,
    Estimated,
    Manual,
    Simulation,
}

impl FixQuality {
    fn from_digit(value: &str) -> Result<Self, NmeaError> {
        Ok(match value {
            "" | "0" => FixQuality::Invalid,
            "1" => FixQuality::Gps,
            "2" => FixQuality::Dgps,
            "3" => FixQuality::Pps,
            "4" => FixQuality::Rtk,
            "5" => FixQuality::FloatRtk,
            "6" => FixQuality::Estimated,
            "7" => FixQuality::Manual,
            "8" => FixQuality::Simulation,
            other => {
                return Err(NmeaError::MalformedField {
                    field: "fix quality",
                    value: other.to_string(),
                })
            }
        })
    }

    pub fn is_valid(self) -> bool {
        self != FixQuality::Invalid
    }
}

/// Decoded GGA sentence.
#[derive(Debug, Clone, PartialEq)]
pub struct GgaSentence {
    pub talker: String,
    pub time: Option<NaiveTime>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub quality: FixQuality,
    pub satellites: Option<u8>,
    pub hdop: Option<f64>,
    pub altitude_m: Option<f64>,
}

impl GgaSentence {
    /// Position fix, when the receiver reports a valid one.
    pub fn to_fix(&self) -> Option<Fix> {
        if !self.quality.is_valid() {
            return None;
        }
        let mut fix = Fix::new(self.latitude?, self.longitude?);
        fix.altitude_m = self.altitude_m;
        fix.utc_time = self.time;
        fix.satellites = self.satellites;
        Some(fix)
    }
}

/// XOR of all bytes between `$` and `*`.
pub fn checksum(body: &str) -> u8 {
    body.bytes().fold(0, |acc, b| acc ^ b)
}

/// Parse one line as a GGA sentence.
pub fn parse_gga(line: &str) -> Result<GgaSentence, NmeaError> {
    let line = line.trim();
    let rest = line.strip_prefix('$').ok_or(NmeaError::MissingStart)?;

    let body = match rest.split_once('*') {
        Some((body, sum)) => {
            let expected = u8::from_str_radix(sum.trim(), 16)
                .map_err(|_| NmeaError::InvalidChecksum(sum.to_string()))?;
            let computed = checksum(body);
            if expected != computed {
                return Err(NmeaError::ChecksumMismatch { expected, computed });
            }
            body
        }
        None => rest,
    };

    let fields: Vec<&str> = body.split(',').collect();
    let address = fields[0];
    if address.len() != 5 || !address.ends_with("GGA") {
        return Err(NmeaError::Unsupported(address.to_string()));
    }
    if fields.len() < 10 {
        return Err(NmeaError::TooFewFields {
            expected: 10,
            found: fields.len(),
        });
    }

    Ok(GgaSentence {
        talker: address[..2].to_string(),
        time: parse_time(fields[1])?,
        latitude: parse_coordinate(fields[2], fields[3], 2, "latitude")?,
        longitude: parse_coordinate(fields[4], fields[5], 3, "longitude")?,
        quality: FixQuality::from_digit(fields[6])?,
        satellites: parse_optional(fields[7], "satellites")?,
        hdop: parse_optional(fields[8], "hdop")?,
        altitude_m: parse_optional(fields[9], "altitude")?,
    })
}

fn parse_optional<T: std::str::FromStr>(
    value: &str,
    field: &'static str,
) -> Result<Option<T>, NmeaError> {
    if value.is_empty() {
        return Ok(None);
    }
    value.parse().map(Some).map_err(|_| NmeaError::MalformedField {
        field,
        value: value.to_string(),
    })
}

fn parse_time(value: &str) -> Result<Option<NaiveTime>, NmeaError> {
    if value.is_empty() {
        return Ok(None);
    }
    NaiveTime::parse_from_str(value, "%H%M%S%.f")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H%M%S"))
        .map(Some)
        .map_err(|_| NmeaError::MalformedField {
            field: "time",
            value: value.to_string(),
        })
}

/// Decode `ddmm.mmmm` / `dddmm.mmmm` plus hemisphere into signed degrees.
fn parse_coordinate(
    value: &str,
    hemisphere: &str,
    degree_digits: usize,
    field: &'static str,
) -> Result<Option<f64>, NmeaError> {
    if value.is_empty() {
        return Ok(None);
    }
    let malformed = || NmeaError::MalformedField {
        field,
        value: format!("{},{}", value, hemisphere),
    };
    if value.len() < degree_digits + 2 || !value.is_char_boundary(degree_digits) {
        return Err(malformed());
    }
    let (degree_field, minute_field) = value.split_at(degree_digits);
    if !degree_field.bytes().all(|b| b.is_ascii_digit())
        || !minute_field.starts_with(|c: char| c.is_ascii_digit())
    {
        return Err(malformed());
    }
    let degrees: f64 = degree_field.parse().map_err(|_| malformed())?;
    let minutes: f64 = minute_field.parse().map_err(|_| malformed())?;
    if !(0.0..60.0).contains(&minutes) {
        return Err(malformed());
    }
    let magnitude = degrees + minutes / 60.0;
    let (limit, signed) = match (hemisphere, field) {
        ("N", "latitude") => (90.0, magnitude),
        ("S", "latitude") => (90.0, -magnitude),
        ("E", "longitude") => (180.0, magnitude),
        ("W", "longitude") => (180.0, -magnitude),
        _ => return Err(malformed()),
    };
    if magnitude > limit {
        return Err(malformed());
    }
    Ok(Some(signed))
}
