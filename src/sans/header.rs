//! Document and record headers.

use either::Either::{self, Left, Right};
use tartan_bitfield::bitfield;
use thiserror::Error;
use tracing::debug;
use zerocopy::FromBytes;

/// Length of the shortest document header.
pub const MIN_HEADER_LENGTH: usize = 12;

/// An error validating a document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Fewer bytes than the shortest header.
    #[error("Document too short for a header ({0} bytes).")]
    TooShort(usize),
    /// Unknown header length.
    #[error("Unknown header length ({0}).")]
    UnknownHeaderLength(u8),
    /// Incorrect filetype marker.
    #[error("Incorrect file type marker.")]
    NotFitData,
}

/// Facts derived from a valid document header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader {
    /// Length of the header itself, either 12 or 14 bytes.
    pub header_size: u8,
    /// Number of record bytes following the header.
    pub data_size: u32,
}

impl DocumentHeader {
    /// Validate the header at the start of a document.
    ///
    /// The header checksum carried by 14-byte headers is never read.
    pub fn validate(r: &[u8]) -> Result<Self, HeaderError> {
        #[repr(C, packed)]
        #[derive(FromBytes)]
        struct FileHeader {
            header_size: u8,
            _protocol_version: u8,
            _profile_version: [u8; 2],
            data_size: [u8; 4],
            data_type: [u8; 4],
        }

        let bytes: [u8; MIN_HEADER_LENGTH] = *r
            .first_chunk()
            .ok_or(HeaderError::TooShort(r.len()))?;

        let FileHeader {
            header_size,
            data_size,
            data_type,
            ..
        } = zerocopy::transmute!(bytes);

        if !matches!(header_size, 12 | 14) {
            Err(HeaderError::UnknownHeaderLength(header_size))?;
        }

        if &data_type != b".FIT" {
            Err(HeaderError::NotFitData)?;
        }

        let header = Self {
            header_size,
            data_size: u32::from_le_bytes(data_size),
        };

        debug!(
            header_size = header.header_size,
            data_size = header.data_size,
            "Accepted document header"
        );

        Ok(header)
    }

    /// Offset of the first record.
    pub fn data_start(&self) -> usize {
        self.header_size as usize
    }

    /// Offset one past the last record byte.
    pub fn data_end(&self) -> usize {
        self.data_start().saturating_add(self.data_size as usize)
    }
}

/// Header of a definition record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefinitionHeader {
    /// Local message type being defined, from 0 to 15.
    pub local_message: u8,
    /// Whether developer field definitions follow the declared fields.
    pub has_developer_data: bool,
}

/// Header of a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataHeader {
    /// Local message type whose definition lays out this record.
    pub local_message: u8,
    /// The five-bit time offset of a compressed timestamp header.
    pub time_offset: Option<u8>,
}

/// Split a record header byte into its definition or data variant.
///
/// Compressed timestamp headers are always data records, addressing local
/// message types 0 to 3 only.
pub fn record_header(r: u8) -> Either<DefinitionHeader, DataHeader> {
    bitfield! {
        struct RecordHeader(u8) {
            [7] is_compressed,
        }
    }

    if RecordHeader(r).is_compressed() {
        bitfield! {
            struct CompressedHeader(u8) {
                [0..5] time_offset: u8,
                [5..7] local_message: u8,
            }
        }

        let header = CompressedHeader(r);

        Right(DataHeader {
            local_message: header.local_message(),
            time_offset: Some(header.time_offset()),
        })
    } else {
        bitfield! {
            struct NormalHeader(u8) {
                [0..4] local_message: u8,
                [5] is_developer,
                [6] is_definition,
            }
        }

        let header = NormalHeader(r);

        if header.is_definition() {
            Left(DefinitionHeader {
                local_message: header.local_message(),
                has_developer_data: header.is_developer(),
            })
        } else {
            Right(DataHeader {
                local_message: header.local_message(),
                time_offset: None,
            })
        }
    }
}
