//! Convenience interfaces for decoding whole documents.
//!
//! The functions in this module drive the stages in [`crate::sans`] over a
//! complete document held in memory, assembling `record` samples into a
//! [`Geometry`](crate::Geometry).

#[cfg(feature = "std")]
pub mod reader;
pub mod slice;

#[cfg(feature = "std")]
pub use reader::decode as decode_reader;
pub use slice::decode as decode_slice;
