//! Data records and the extraction of position samples.

use chrono::{DateTime, Utc};
use tracing::trace;

use super::{EndOfSlice, definition::FieldSpec, definition::MessageDefinition, take_slice};

/// Global message number of GPS `record` messages.
pub const RECORD_MESSAGE: u16 = 20;

/// Field numbers interpreted within `record` messages.
pub mod field {
    pub const POSITION_LAT: u8 = 0;
    pub const POSITION_LONG: u8 = 1;
    pub const ALTITUDE: u8 = 2;
    pub const TIMESTAMP: u8 = 253;
}

/// Seconds between the Unix epoch and the FIT epoch (1989-12-31T00:00:00Z).
pub const FIT_EPOCH_OFFSET: i64 = 631_065_600;

/// Degrees per semicircle.
const SEMICIRCLE_DEGREES: f64 = 180.0 / 2_147_483_648.0;

/// The base type of a declared field.
///
/// Only the types carrying timestamps, positions, and altitudes are given
/// dedicated widths and 'invalid' markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseType {
    /// `uint16`
    U16,
    /// `sint32`
    I32,
    /// `uint32`
    U32,
    /// Any other base type, read without an 'invalid' marker.
    Other(u8),
}

impl From<u8> for BaseType {
    fn from(r: u8) -> Self {
        match r {
            0x84 => BaseType::U16,
            0x85 => BaseType::I32,
            0x86 => BaseType::U32,
            _ => BaseType::Other(r),
        }
    }
}

/// Read a raw field value of a base type.
///
/// Returns `None` if the field held its 'invalid' marker value. Types without
/// a fast path, and fields too narrow for their declared type, fall back to an
/// unsigned accumulation of every field byte, with no marker check.
pub fn read_raw(r: &[u8], base_type: BaseType, is_little_endian: bool) -> Option<i64> {
    macro_rules! fast_path {
        ($t:ident) => {
            if let Some(&bytes) = r.first_chunk() {
                let x = if is_little_endian {
                    $t::from_le_bytes(bytes)
                } else {
                    $t::from_be_bytes(bytes)
                };

                return if x != $t::MAX { Some(i64::from(x)) } else { None };
            }
        };
    }

    match base_type {
        BaseType::U16 => fast_path!(u16),
        BaseType::I32 => fast_path!(i32),
        BaseType::U32 => fast_path!(u32),
        BaseType::Other(t) => trace!(base_type = t, "Reading field of unsupported base type"),
    }

    Some(accumulate(r, is_little_endian) as i64)
}

/// Fallback for base types without a fast path.
fn accumulate(r: &[u8], is_little_endian: bool) -> u64 {
    let push = |acc: u64, b: &u8| (acc << 8) | u64::from(*b);

    if is_little_endian {
        r.iter().rev().fold(0, push)
    } else {
        r.iter().fold(0, push)
    }
}

/// Convert semicircles to degrees.
pub fn degrees(semicircles: i64) -> f64 {
    semicircles as f64 * SEMICIRCLE_DEGREES
}

/// Convert a scaled and offset altitude to metres.
pub fn metres(raw: i64) -> f64 {
    raw as f64 / 5.0 - 500.0
}

/// Convert seconds since the FIT epoch to a point in time.
pub fn fit_time(seconds: i64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(seconds.checked_add(FIT_EPOCH_OFFSET)?, 0)
}

/// Values extracted from a single `record` message.
///
/// Fields absent from the message, or holding their 'invalid' marker, are
/// `None`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: Option<DateTime<Utc>>,
    /// Degrees.
    pub longitude: Option<f64>,
    /// Degrees.
    pub latitude: Option<f64>,
    /// Metres.
    pub altitude: Option<f64>,
}

impl Sample {
    /// The position of this sample as `(longitude, latitude)`, if both are
    /// known.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.longitude?, self.latitude?))
    }
}

/// Running state carried between data records of one document.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct DecoderState {
    /// Seconds since the FIT epoch of the latest full or compressed timestamp.
    pub timestamp: i64,
    /// Low five bits of the latest timestamp.
    pub time_offset: u8,
    /// Metres.
    pub altitude: Option<f64>,
}

impl DecoderState {
    /// Rebase compressed timestamps on a full timestamp.
    pub fn set_timestamp(&mut self, timestamp: i64) {
        self.timestamp = timestamp;
        self.time_offset = timestamp.rem_euclid(32) as u8;
    }

    /// Advance the timestamp by the rollover-aware difference between a
    /// compressed time offset and the previous one.
    ///
    /// Returns the new timestamp.
    pub fn advance_timestamp(&mut self, time_offset: u8) -> i64 {
        let delta = time_offset.wrapping_sub(self.time_offset) & 0x1F;
        self.timestamp = self.timestamp.wrapping_add(i64::from(delta));
        self.time_offset = time_offset;
        self.timestamp
    }
}

/// Decode a `record` data record whose header byte sits at `offset`.
///
/// `time_offset` is the five-bit field of a compressed timestamp header, if
/// the record carried one.
pub fn decode_record(
    r: &[u8],
    offset: usize,
    definition: &MessageDefinition,
    time_offset: Option<u8>,
    state: &mut DecoderState,
) -> Result<Sample, EndOfSlice> {
    let content = take_slice(r, offset + 1, definition.data_size())?;

    let mut sample = Sample::default();

    match time_offset {
        None => {
            let timestamp = definition
                .declared_fields()
                .find_map(|(at, f)| match *f {
                    FieldSpec::Declared {
                        number: field::TIMESTAMP,
                        size,
                        base_type,
                        is_little_endian,
                    } => Some(read_raw(
                        &content[at..at + size as usize],
                        base_type,
                        is_little_endian,
                    )),
                    _ => None,
                })
                .flatten();

            if let Some(timestamp) = timestamp {
                state.set_timestamp(timestamp);
            }
        }
        Some(time_offset) => {
            let timestamp = state.advance_timestamp(time_offset);
            sample.timestamp = fit_time(timestamp);
        }
    }

    let mut at = 0;

    for f in &definition.fields {
        let size = f.size();

        // Developer fields are stepped over.
        if let FieldSpec::Declared {
            number,
            base_type,
            is_little_endian,
            ..
        } = *f
        {
            let value = match number {
                field::TIMESTAMP | field::POSITION_LAT | field::POSITION_LONG | field::ALTITUDE => {
                    read_raw(&content[at..at + size], base_type, is_little_endian)
                }
                _ => None,
            };

            if let Some(value) = value {
                match number {
                    field::TIMESTAMP => sample.timestamp = fit_time(value),
                    field::POSITION_LAT => sample.latitude = Some(degrees(value)),
                    field::POSITION_LONG => sample.longitude = Some(degrees(value)),
                    field::ALTITUDE => {
                        let altitude = metres(value);
                        state.altitude = Some(altitude);
                        sample.altitude = Some(altitude);
                    }
                    _ => {}
                }
            }
        }

        at += size;
    }

    Ok(sample)
}
