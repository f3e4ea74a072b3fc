//! Pure stages of the decoding pipeline.
//!
//! Each stage works on an immutable byte slice holding a whole document and an
//! offset into it, returning the offset of the next unit to decode. No stage
//! performs I/O. Per-document mutable state (the local message registry and
//! the running timestamp) lives in a [`Session`], which must be created fresh
//! for every document.
//!
//! See [`crate::avec`] for functions driving these stages over a full
//! document.
//!
//! # Architecture
//!
//! - [`header`] validates the document header and splits record header bytes
//!   into definition and data variants.
//! - [`definition`] reads definition messages into [`MessageDefinition`]
//!   values, stored per local message type.
//! - [`data`] resolves data messages against those definitions and extracts
//!   position samples from GPS `record` messages.
//! - [`session`] ties these together, dispatching one record at a time.
//!
//! [`MessageDefinition`]: definition::MessageDefinition

use thiserror::Error;

pub mod data;
pub mod definition;
pub mod header;
pub mod session;

pub use session::Session;

/// An error reading past the end of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Unexpectedly reached the end of the slice ({needed} bytes needed at offset {offset}).")]
pub struct EndOfSlice {
    /// Offset of the first byte that could not be read.
    pub offset: usize,
    /// Number of bytes requested.
    pub needed: usize,
}

/// Take an exact number of bytes from an offset in a slice, advancing the offset.
pub(crate) fn take<const N: usize>(r: &[u8], i: &mut usize) -> Result<[u8; N], EndOfSlice> {
    let s = *i;
    let bytes = r
        .get(s..)
        .and_then(|tail| tail.first_chunk::<N>())
        .ok_or(EndOfSlice {
            offset: s,
            needed: N,
        })?;

    *i += N;

    Ok(*bytes)
}

/// Borrow `len` bytes from an offset in a slice.
pub(crate) fn take_slice(r: &[u8], offset: usize, len: usize) -> Result<&[u8], EndOfSlice> {
    offset
        .checked_add(len)
        .and_then(|end| r.get(offset..end))
        .ok_or(EndOfSlice {
            offset,
            needed: len,
        })
}
