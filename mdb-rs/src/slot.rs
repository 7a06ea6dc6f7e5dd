//! Record-slot scanner: walks the data region in fixed 128-byte slots and
//! recognizes valid record slots by `(kind, table-id, size)` plausibility.

use crate::header::Generation;
use crate::reader::ByteReader;
use crate::record::{self, Record};

/// Deterministic offset of the first data-region slot. The engine places
/// its first object page here, after the header/root/dictionary regions;
/// scanning from 0 would confuse dictionary pages with records.
pub const DATA_REGION_ORIGIN: usize = 0x2C00;
/// The engine's object-slot size for fixed records in this database.
pub const SLOT_SIZE: usize = 128;
/// Extra tail bytes handed to the decoder past the nominal slot boundary,
/// so field reads for the largest offset table (134 bytes) don't run past
/// what was read from the slot.
const SLOT_TAIL: usize = 64;

pub const TABLE_SINGLE_EX: u16 = 3;
pub const TABLE_GROUPED_EX: u16 = 4;

fn expected_size(generation: Generation, table_id: u16) -> Option<u32> {
    match (generation, table_id) {
        (Generation::GNew, TABLE_SINGLE_EX) => Some(134),
        (Generation::GNew, TABLE_GROUPED_EX) => Some(73),
        (Generation::GOld, TABLE_SINGLE_EX) => Some(78),
        (Generation::GOld, TABLE_GROUPED_EX) => Some(57),
        _ => None,
    }
}

/// A record body as handed to the table decoders: spans from the end of
/// the 8-byte slot header and 8-byte object-identifier prefix through the
/// rest of the slot plus tail bytes. Unpacked field offsets are measured
/// from the start of the record body proper (i.e. *after* both the slot
/// header and the object-identifier), so every accessor adds 16 before
/// reading — see spec §6 ("each slot prefixed by an 8-byte slot header
/// ... followed by an 8-byte object-identifier, then the record body")
/// and §4.4 ("hand the body `buf[slot+16:slot+192]`").
pub struct RecordBody<'a> {
    reader: ByteReader<'a>,
    base: usize,
}

impl<'a> RecordBody<'a> {
    const ID_PREFIX_LEN: usize = 16;

    pub fn new(buf: &'a [u8], slot_start: usize) -> Self {
        RecordBody {
            reader: ByteReader::new(buf),
            base: slot_start,
        }
    }

    pub fn u8(&self, unpacked_offset: usize) -> u8 {
        self.reader.read_u8(self.base + Self::ID_PREFIX_LEN + unpacked_offset)
    }

    pub fn u16(&self, unpacked_offset: usize) -> u16 {
        self.reader.read_u16(self.base + Self::ID_PREFIX_LEN + unpacked_offset)
    }

    pub fn u32(&self, unpacked_offset: usize) -> u32 {
        self.reader.read_u32(self.base + Self::ID_PREFIX_LEN + unpacked_offset)
    }

    pub fn u64(&self, unpacked_offset: usize) -> u64 {
        self.reader.read_u64(self.base + Self::ID_PREFIX_LEN + unpacked_offset)
    }

    pub fn f32(&self, unpacked_offset: usize) -> f32 {
        self.reader.read_f32(self.base + Self::ID_PREFIX_LEN + unpacked_offset)
    }

    pub fn bytes(&self, unpacked_offset: usize, len: usize) -> Vec<u8> {
        self.reader.read_bytes(self.base + Self::ID_PREFIX_LEN + unpacked_offset, len)
    }
}

/// A recognized record slot, ready to be handed to a table decoder.
#[derive(Debug, Clone, Copy)]
pub struct SlotCandidate {
    pub offset: usize,
    pub table_id: u16,
    pub rec_size: u32,
}

/// Walks the data region in 128-byte strides, starting at
/// [`DATA_REGION_ORIGIN`], yielding every accepted `(single_ex|grouped_ex)`
/// record slot already decoded into a [`Record`].
pub struct SlotScanner<'a> {
    buf: &'a [u8],
    generation: Generation,
}

impl<'a> SlotScanner<'a> {
    pub fn new(buf: &'a [u8], generation: Generation) -> Self {
        SlotScanner { buf, generation }
    }

    /// Slot offsets that pass the `(kind, table-id, size)` plausibility
    /// check, without decoding their bodies yet.
    pub fn candidates(&self) -> Vec<SlotCandidate> {
        if matches!(self.generation, Generation::Legacy) {
            return Vec::new();
        }

        let reader = ByteReader::new(self.buf);
        let mut out = Vec::new();

        if self.buf.len() < SLOT_SIZE {
            return out;
        }

        let mut offset = DATA_REGION_ORIGIN;
        while offset + SLOT_SIZE <= self.buf.len() {
            let kind_lo = reader.read_u8(offset) & 0x0F;
            let table_id = reader.read_u16(offset + 2);
            let rec_size = reader.read_u32(offset + 4);

            if kind_lo == 0 && (table_id == TABLE_SINGLE_EX || table_id == TABLE_GROUPED_EX) && rec_size > 40 && rec_size < 200 {
                if let Some(expected) = expected_size(self.generation, table_id) {
                    if rec_size.abs_diff(expected) <= 20 {
                        out.push(SlotCandidate { offset, table_id, rec_size });
                    }
                }
            }

            offset += SLOT_SIZE;
        }

        out
    }

    /// Decodes every accepted slot into a [`Record`].
    pub fn records(&self) -> Vec<Record> {
        self.candidates()
            .into_iter()
            .filter_map(|candidate| {
                let max_tail = (self.buf.len().saturating_sub(candidate.offset)).min(SLOT_SIZE + SLOT_TAIL);
                let body = RecordBody::new(&self.buf[..candidate.offset + max_tail], candidate.offset);
                match candidate.table_id {
                    TABLE_SINGLE_EX => Some(Record::SingleEx(record::decode_single_ex(&body, self.generation))),
                    TABLE_GROUPED_EX => Some(Record::GroupedEx(record::decode_grouped_ex(&body))),
                    _ => None,
                }
            })
            .collect()
    }
}
