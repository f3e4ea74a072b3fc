//! Reader-based decoder implementation.
//!
//! _Requires Cargo feature `std`._

use std::{io::Read, vec::Vec};

use thiserror::Error;

use crate::geometry::Geometry;

extern crate std;

/// Errors occurring while decoding from a reader.
#[derive(Debug, Error)]
pub enum Error {
    /// An error from the supplied reader.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// An error decoding the document read.
    #[error(transparent)]
    Decode(#[from] super::slice::Error),
}

/// Read a whole document from a reader, then decode its track.
///
/// This method is also re-exported as `fitline::decode_reader`.
///
/// _Requires Cargo feature `std`._
pub fn decode(r: &mut impl Read) -> Result<Geometry, Error> {
    let mut buf = Vec::new();
    r.read_to_end(&mut buf)?;

    Ok(super::slice::decode(&buf)?)
}
