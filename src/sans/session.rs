//! Record dispatch over a single document.

use either::Either::{Left, Right};
use thiserror::Error;
use tracing::{debug, trace};

use super::{
    EndOfSlice,
    data::{self, DecoderState, RECORD_MESSAGE, Sample},
    definition::{self, Definitions},
    header::record_header,
    take, take_slice,
};

/// An error decoding a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RecordError {
    /// A data record referenced a local message type with no prior definition.
    #[error("No definition for local message type {0}.")]
    MissingMessageDefinition(u8),
    #[error(transparent)]
    EndOfSlice(#[from] EndOfSlice),
}

/// Mutable state for decoding one document.
///
/// A session starts with no definitions and a zero timestamp, and must not be
/// reused across documents.
#[derive(Debug, Default)]
pub struct Session {
    definitions: Definitions,
    state: DecoderState,
}

impl Session {
    /// Create a session with no definitions and a zero timestamp.
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest altitude read from any `record` message, in metres.
    pub fn last_altitude(&self) -> Option<f64> {
        self.state.altitude
    }

    /// The running timestamp and compressed time offset.
    pub fn state(&self) -> &DecoderState {
        &self.state
    }

    /// Decode the record whose header byte sits at `offset`.
    ///
    /// Returns the offset of the following record, and for `record` data
    /// messages, the extracted sample.
    pub fn step(
        &mut self,
        r: &[u8],
        offset: usize,
    ) -> Result<(usize, Option<Sample>), RecordError> {
        let [byte] = take::<1>(r, &mut { offset })?;

        let (next, sample) = match record_header(byte) {
            Left(header) => {
                let (definition, next) = definition::decode(r, offset, header)?;

                debug!(
                    local_message = header.local_message,
                    global_message = definition.global_message,
                    fields = definition.fields.len(),
                    "Defined local message type"
                );

                self.definitions.insert(header.local_message, definition);

                (next, None)
            }
            Right(header) => {
                let definition = self
                    .definitions
                    .get(header.local_message)
                    .ok_or(RecordError::MissingMessageDefinition(header.local_message))?;

                let size = definition.data_size();
                let next = offset + 1 + size;

                if definition.global_message != RECORD_MESSAGE {
                    trace!(
                        global_message = definition.global_message,
                        "Skipping data message"
                    );

                    take_slice(r, offset + 1, size)?;

                    (next, None)
                } else {
                    let sample = data::decode_record(
                        r,
                        offset,
                        definition,
                        header.time_offset,
                        &mut self.state,
                    )?;

                    (next, Some(sample))
                }
            }
        };

        debug_assert!(next > offset);

        Ok((next, sample))
    }
}
