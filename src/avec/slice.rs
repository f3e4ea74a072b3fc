//! Slice-based decoder implementation.

use alloc::vec::Vec;

use thiserror::Error;
use tracing::{debug, warn};

use crate::{
    geometry::{Geometry, TrackBuilder},
    sans::{
        EndOfSlice, Session,
        data::Sample,
        header::{DocumentHeader, HeaderError},
        session::RecordError,
    },
};

/// Errors occurring while decoding from a slice.
///
/// Every error aborts decoding; no partial track is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// Incorrect file header.
    #[error("Incorrect file header: {0}")]
    MalformedHeader(#[from] HeaderError),
    /// A data record referenced a local message type with no prior definition.
    #[error("No definition for local message type {0}.")]
    MissingMessageDefinition(u8),
    /// A record extended past the end of the slice.
    #[error(transparent)]
    EndOfSlice(#[from] EndOfSlice),
}

impl From<RecordError> for Error {
    fn from(err: RecordError) -> Self {
        match err {
            RecordError::MissingMessageDefinition(local) => Self::MissingMessageDefinition(local),
            RecordError::EndOfSlice(err) => Self::EndOfSlice(err),
        }
    }
}

impl Error {
    /// Whether the document header was rejected.
    pub fn is_malformed_header(&self) -> bool {
        matches!(self, Self::MalformedHeader(_))
    }

    /// Whether a data record referenced an undefined local message type.
    pub fn is_missing_definition(&self) -> bool {
        matches!(self, Self::MissingMessageDefinition(_))
    }
}

/// Decode the track of a document.
///
/// This method is also re-exported as `fitline::decode`.
#[tracing::instrument(name = "decode_fit", level = "debug", skip_all, fields(len = r.len()))]
pub fn decode(r: &[u8]) -> Result<Geometry, Error> {
    let mut track = TrackBuilder::new();

    walk(r, |sample, session| {
        track.push(sample, session.last_altitude());
    })?;

    let geometry = track.finish();
    debug!(coordinates = geometry.len(), "Decoded track");

    Ok(geometry)
}

/// Decode the track of a document, treating any error as an empty track.
///
/// Errors are logged at `warn` level.
pub fn decode_or_empty(r: &[u8]) -> Geometry {
    decode(r).unwrap_or_else(|err| {
        warn!(%err, "Discarding track of undecodable document");
        Geometry::default()
    })
}

/// Decode the samples of every `record` message of a document, in order.
///
/// Unlike [`decode`], samples without a position are kept, and no altitude is
/// filled in.
pub fn decode_samples(r: &[u8]) -> Result<Vec<Sample>, Error> {
    let mut samples = Vec::new();
    walk(r, |sample, _| samples.push(*sample))?;
    Ok(samples)
}

/// Dispatch every record of a document, publishing samples to a receiver.
fn walk(r: &[u8], mut o: impl FnMut(&Sample, &Session)) -> Result<(), Error> {
    let header = DocumentHeader::validate(r)?;

    let mut session = Session::new();

    let mut i = header.data_start();
    let end = header.data_end(); // Offset to the end of the record section.

    while i < end {
        let (next, sample) = session.step(r, i)?;

        if let Some(sample) = sample {
            o(&sample, &session);
        }

        i = next;
    }

    Ok(())
}
