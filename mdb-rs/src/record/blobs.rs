//! Fixed 16-byte embedded blobs carried inline in `single_ex`/`grouped_ex`
//! records. Neither is a real BLOB page reference (see Non-goals: no BLOB
//! reassembly) — both are packed scalars read straight out of the slot.

use crate::reader::ByteReader;

/// GUSI blob: `session_id: u32` at byte 0, `recording_id: u32` at byte 8.
/// Bytes 4..8 and 12..16 are unused padding in every sample observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GusiBlob {
    pub session_id: u32,
    pub recording_id: u32,
}

impl GusiBlob {
    pub fn from_bytes(raw: &[u8; 16]) -> Self {
        let reader = ByteReader::new(raw);
        GusiBlob {
            session_id: reader.read_u32(0),
            recording_id: reader.read_u32(8),
        }
    }
}

/// Content blob: two `u64` halves, rendered as a 32-hex-digit content id
/// (high half first) rather than exposed as a pair of integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentBlob {
    pub high: u64,
    pub low: u64,
}

impl ContentBlob {
    pub fn from_bytes(raw: &[u8; 16]) -> Self {
        let reader = ByteReader::new(raw);
        ContentBlob {
            high: reader.read_u64(0),
            low: reader.read_u64(8),
        }
    }

    pub fn content_id(&self) -> String {
        format!("{:016x}{:016x}", self.high, self.low)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gusi_blob_reads_session_and_recording() {
        let mut raw = [0u8; 16];
        raw[0..4].copy_from_slice(&42u32.to_le_bytes());
        raw[8..12].copy_from_slice(&7u32.to_le_bytes());
        let blob = GusiBlob::from_bytes(&raw);
        assert_eq!(blob.session_id, 42);
        assert_eq!(blob.recording_id, 7);
    }

    #[test]
    fn content_blob_renders_32_hex_digits() {
        let mut raw = [0u8; 16];
        raw[0..8].copy_from_slice(&1u64.to_le_bytes());
        raw[8..16].copy_from_slice(&2u64.to_le_bytes());
        let blob = ContentBlob::from_bytes(&raw);
        assert_eq!(blob.content_id().len(), 32);
        assert_eq!(blob.content_id(), "00000000000000010000000000000002");
    }
}
