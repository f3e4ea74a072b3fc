#![no_std]

//! Extracts GPS tracks from Garmin's Flexible and Interoperable Data Transfer
//! protocol.
//!
//! Fitline reads the position, altitude, and timestamp fields of `record`
//! messages from a FIT document held in memory, and assembles them into a
//! GeoJSON-compatible `LineString`. All other messages are stepped over
//! without being decoded, and checksums are not verified.
//!
//! Most users need only [`decode`]. The pipeline stages are exposed in the
//! [`sans`] module for applications needing the samples themselves, or finer
//! control over decoding.
//!
//! ```
//! let data = std::fs::read("activity.fit")?;
//! let track = fitline::decode(&data)?;
//!
//! for point in track.coordinates() {
//!     println!("{} {}", point.longitude(), point.latitude());
//! }
//! ```
//!
//! ## Cargo Features
//!
//! The following crate feature flags are available:
//!
//! - `std`: enable reader-based decoder (default).
//! - `serde`: serialize tracks as GeoJSON geometry objects.

extern crate alloc;

pub mod avec;
pub mod geometry;
pub mod sans;

#[cfg(feature = "std")]
pub use avec::decode_reader;
pub use avec::{decode_slice as decode, slice::Error};
pub use geometry::{Coordinate, Geometry};
