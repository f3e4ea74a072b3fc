//! Definition records and the local message registry.

use alloc::vec::Vec;

use zerocopy::FromBytes;

use super::{EndOfSlice, data::BaseType, header::DefinitionHeader, take};

/// Number of local message types addressable by a record header.
pub const LOCAL_MESSAGE_TYPES: usize = 16;

/// The layout of a single field within a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldSpec {
    /// A field from the global profile.
    Declared {
        number: u8,
        size: u8,
        base_type: BaseType,
        is_little_endian: bool,
    },
    /// A developer field. Only its width is kept, to step over its content.
    Developer { size: u8 },
}

impl FieldSpec {
    /// Number of bytes this field occupies in a data record.
    pub fn size(&self) -> usize {
        match *self {
            FieldSpec::Declared { size, .. } | FieldSpec::Developer { size } => size as usize,
        }
    }
}

/// A decoded definition record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageDefinition {
    pub global_message: u16,
    pub is_little_endian: bool,
    /// Declared fields in order, followed by any developer fields.
    pub fields: Vec<FieldSpec>,
}

impl MessageDefinition {
    /// Number of content bytes in a data record of this definition, excluding
    /// its header byte.
    pub fn data_size(&self) -> usize {
        self.fields.iter().map(FieldSpec::size).sum()
    }

    /// Declared fields paired with their offsets into a data record.
    pub fn declared_fields(&self) -> impl Iterator<Item = (usize, &FieldSpec)> {
        self.fields
            .iter()
            .scan(0, |offset, field| {
                let at = *offset;
                *offset += field.size();
                Some((at, field))
            })
            .filter(|(_, field)| matches!(field, FieldSpec::Declared { .. }))
    }
}

/// Definitions in effect for each local message type.
#[derive(Debug, Default)]
pub struct Definitions([Option<MessageDefinition>; LOCAL_MESSAGE_TYPES]);

impl Definitions {
    /// Retrieve the definition for a local message type, if one was read.
    pub fn get(&self, local_message: u8) -> Option<&MessageDefinition> {
        self.0.get(local_message as usize)?.as_ref()
    }

    /// Store a definition, replacing and returning any earlier one for the same
    /// local message type.
    pub fn insert(
        &mut self,
        local_message: u8,
        definition: MessageDefinition,
    ) -> Option<MessageDefinition> {
        self.0
            .get_mut(local_message as usize)
            .and_then(|slot| slot.replace(definition))
    }
}

#[repr(C, packed)]
#[derive(Debug, FromBytes)]
struct DefinitionMessage {
    _reserved: u8,
    architecture: u8,
    global_message: [u8; 2],
    fields: u8,
}

#[repr(C, packed)]
#[derive(FromBytes)]
struct FieldHeader {
    field: u8,
    size: u8,
    base_type: u8,
}

/// Decode the definition record whose header byte sits at `offset`.
///
/// Returns the definition, and the offset of the following record.
pub fn decode(
    r: &[u8],
    offset: usize,
    header: DefinitionHeader,
) -> Result<(MessageDefinition, usize), EndOfSlice> {
    let i = &mut (offset + 1);

    let DefinitionMessage {
        architecture,
        global_message,
        fields,
        ..
    } = zerocopy::transmute!(take::<5>(r, i)?);

    let is_little_endian = architecture == 0;
    let global_message = if is_little_endian {
        u16::from_le_bytes(global_message)
    } else {
        u16::from_be_bytes(global_message)
    };

    let mut specs = Vec::with_capacity(fields as usize);

    for _ in 0..fields {
        let FieldHeader {
            field,
            size,
            base_type,
        } = zerocopy::transmute!(take::<3>(r, i)?);

        specs.push(FieldSpec::Declared {
            number: field,
            size,
            base_type: BaseType::from(base_type),
            is_little_endian,
        });
    }

    if header.has_developer_data {
        let [developer_fields] = take::<1>(r, i)?;

        for _ in 0..developer_fields {
            // Field number and developer data index are not interpreted.
            let [_, size, _] = take::<3>(r, i)?;
            specs.push(FieldSpec::Developer { size });
        }
    }

    let definition = MessageDefinition {
        global_message,
        is_little_endian,
        fields: specs,
    };

    Ok((definition, *i))
}
