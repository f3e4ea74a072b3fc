//! Output tracks.

use alloc::vec::Vec;

use crate::sans::data::Sample;

/// A single track point.
///
/// With the `serde` feature, serializes as the GeoJSON position
/// `[longitude, latitude, altitude, unix_seconds]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    longitude: f64,
    latitude: f64,
    altitude: f64,
    timestamp: i64,
}

impl Coordinate {
    /// Create a point from degrees, metres, and Unix seconds.
    pub fn new(longitude: f64, latitude: f64, altitude: f64, timestamp: i64) -> Self {
        Self {
            longitude,
            latitude,
            altitude,
            timestamp,
        }
    }

    /// Degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Metres.
    pub fn altitude(&self) -> f64 {
        self.altitude
    }

    /// Seconds since the Unix epoch, or zero if the sample had no timestamp.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Coordinate {
    fn serialize<S: serde::Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeTuple;

        let mut t = s.serialize_tuple(4)?;
        t.serialize_element(&self.longitude)?;
        t.serialize_element(&self.latitude)?;
        t.serialize_element(&self.altitude)?;
        t.serialize_element(&self.timestamp)?;
        t.end()
    }
}

/// A GeoJSON-compatible `LineString` of track points, in document order.
#[derive(Debug, Default, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename = "LineString")
)]
pub struct Geometry {
    coordinates: Vec<Coordinate>,
}

impl Geometry {
    /// Track points in document order.
    pub fn coordinates(&self) -> &[Coordinate] {
        &self.coordinates
    }

    /// Take ownership of the track points.
    pub fn into_coordinates(self) -> Vec<Coordinate> {
        self.coordinates
    }

    /// Number of track points.
    pub fn len(&self) -> usize {
        self.coordinates.len()
    }

    /// Whether the track has no points.
    pub fn is_empty(&self) -> bool {
        self.coordinates.is_empty()
    }
}

/// Assembles samples into a [`Geometry`].
#[derive(Debug, Default)]
pub struct TrackBuilder {
    coordinates: Vec<Coordinate>,
}

impl TrackBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a sample if it carries a position.
    ///
    /// A sample without an altitude takes `last_altitude`, the latest altitude
    /// read from the document, or zero. Returns whether a point was added.
    pub fn push(&mut self, sample: &Sample, last_altitude: Option<f64>) -> bool {
        let Some((longitude, latitude)) = sample.position() else {
            return false;
        };

        self.coordinates.push(Coordinate {
            longitude,
            latitude,
            altitude: sample.altitude.or(last_altitude).unwrap_or(0.0),
            timestamp: sample.timestamp.map_or(0, |t| t.timestamp()),
        });

        true
    }

    /// Finish the track.
    ///
    /// A first point at exactly zero altitude borrows the altitude of the
    /// second point. No other point is adjusted.
    pub fn finish(mut self) -> Geometry {
        if let [first, second, ..] = self.coordinates.as_mut_slice()
            && first.altitude == 0.0
            && second.altitude != 0.0
        {
            first.altitude = second.altitude;
        }

        Geometry {
            coordinates: self.coordinates,
        }
    }
}
