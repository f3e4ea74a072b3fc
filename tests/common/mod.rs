#![allow(dead_code)]

//! Synthesizes FIT documents for tests.

pub const UINT8: u8 = 0x02;
pub const SINT16: u8 = 0x83;
pub const UINT16: u8 = 0x84;
pub const SINT32: u8 = 0x85;
pub const UINT32: u8 = 0x86;

pub const TIMESTAMP: u8 = 253;
pub const POSITION_LAT: u8 = 0;
pub const POSITION_LONG: u8 = 1;
pub const ALTITUDE: u8 = 2;

pub const FILE_ID: u16 = 0;
pub const RECORD: u16 = 20;
pub const EVENT: u16 = 21;

/// Seconds between the Unix and FIT epochs.
pub const EPOCH: i64 = 631_065_600;

/// Semicircles per degree.
pub const SEMICIRCLES: f64 = 2_147_483_648.0 / 180.0;

/// `timestamp`, `position_lat`, and `position_long`, all little-endian.
pub const POSITION_FIELDS: [(u8, u8, u8); 3] = [
    (TIMESTAMP, 4, UINT32),
    (POSITION_LAT, 4, SINT32),
    (POSITION_LONG, 4, SINT32),
];

/// [`POSITION_FIELDS`] followed by `altitude`.
pub const ALTITUDE_FIELDS: [(u8, u8, u8); 4] = [
    (TIMESTAMP, 4, UINT32),
    (POSITION_LAT, 4, SINT32),
    (POSITION_LONG, 4, SINT32),
    (ALTITUDE, 2, UINT16),
];

pub struct FitBuilder {
    header_size: u8,
    magic: [u8; 4],
    records: Vec<u8>,
}

impl FitBuilder {
    pub fn new() -> Self {
        Self {
            header_size: 14,
            magic: *b".FIT",
            records: vec![],
        }
    }

    pub fn header_size(mut self, header_size: u8) -> Self {
        self.header_size = header_size;
        self
    }

    pub fn magic(mut self, magic: &[u8; 4]) -> Self {
        self.magic = *magic;
        self
    }

    /// Append a little-endian definition record.
    pub fn definition(self, local: u8, global: u16, fields: &[(u8, u8, u8)]) -> Self {
        self.definition_with(local, global, false, fields, None)
    }

    /// Append a definition record, with developer field sizes if present.
    pub fn definition_with(
        mut self,
        local: u8,
        global: u16,
        big_endian: bool,
        fields: &[(u8, u8, u8)],
        developer: Option<&[u8]>,
    ) -> Self {
        let header = 0x40 | local | if developer.is_some() { 0x20 } else { 0 };
        self.records.push(header);
        self.records.push(0);
        self.records.push(big_endian as u8);

        if big_endian {
            self.records.extend_from_slice(&global.to_be_bytes());
        } else {
            self.records.extend_from_slice(&global.to_le_bytes());
        }

        self.records.push(fields.len() as u8);
        for &(number, size, base_type) in fields {
            self.records.extend_from_slice(&[number, size, base_type]);
        }

        if let Some(developer) = developer {
            self.records.push(developer.len() as u8);
            for (i, &size) in developer.iter().enumerate() {
                self.records.extend_from_slice(&[i as u8, size, 0]);
            }
        }

        self
    }

    /// Append a data record with a normal header.
    pub fn data(mut self, local: u8, content: &[u8]) -> Self {
        self.records.push(local & 0x0F);
        self.records.extend_from_slice(content);
        self
    }

    /// Append a data record with a compressed timestamp header.
    pub fn compressed(mut self, local: u8, time_offset: u8, content: &[u8]) -> Self {
        self.records
            .push(0x80 | ((local & 0x03) << 5) | (time_offset & 0x1F));
        self.records.extend_from_slice(content);
        self
    }

    /// Append raw bytes to the record section.
    pub fn raw(mut self, bytes: &[u8]) -> Self {
        self.records.extend_from_slice(bytes);
        self
    }

    /// Build the document, followed by a (zero, unchecked) CRC.
    pub fn build(&self) -> Vec<u8> {
        let mut out = vec![self.header_size, 0x20];
        out.extend_from_slice(&2132u16.to_le_bytes());
        out.extend_from_slice(&(self.records.len() as u32).to_le_bytes());
        out.extend_from_slice(&self.magic);
        if self.header_size == 14 {
            out.extend_from_slice(&[0, 0]);
        }
        out.extend_from_slice(&self.records);
        out.extend_from_slice(&[0, 0]);
        out
    }
}

/// Content of a data record for [`POSITION_FIELDS`].
pub fn position(timestamp: u32, lat: i32, long: i32) -> Vec<u8> {
    let mut out = vec![];
    out.extend_from_slice(&timestamp.to_le_bytes());
    out.extend_from_slice(&lat.to_le_bytes());
    out.extend_from_slice(&long.to_le_bytes());
    out
}

/// Content of a data record for [`ALTITUDE_FIELDS`].
pub fn position_altitude(timestamp: u32, lat: i32, long: i32, altitude: u16) -> Vec<u8> {
    let mut out = position(timestamp, lat, long);
    out.extend_from_slice(&altitude.to_le_bytes());
    out
}

/// Raw altitude for a height in metres.
pub fn raw_altitude(metres: f64) -> u16 {
    ((metres + 500.0) * 5.0).round() as u16
}
