//! Integration tests implementing the six literal scenarios from the
//! project's scenario catalog, each against a synthetic in-memory mdb
//! byte buffer (no real `.db` fixture files are available in this
//! environment).

use mdb_rs::derive::{duration_seconds, size_mb};
use mdb_rs::{Generation, McoDb, McoError};

const MAGIC: [u8; 12] = [0x00, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x07];
const VERSION_OFFSET: usize = 0x0C10;
const DATA_REGION_ORIGIN: usize = 0x2C00;
const SLOT_SIZE: usize = 128;
const ID_PREFIX_LEN: usize = 16;

fn base_buffer(size: usize) -> Vec<u8> {
    let mut buf = vec![0u8; size];
    buf[0..12].copy_from_slice(&MAGIC);
    buf
}

fn put_version(buf: &mut [u8], major: u16, minor: u16, build: u16) {
    buf[VERSION_OFFSET..VERSION_OFFSET + 2].copy_from_slice(&major.to_le_bytes());
    buf[VERSION_OFFSET + 2..VERSION_OFFSET + 4].copy_from_slice(&minor.to_le_bytes());
    buf[VERSION_OFFSET + 4..VERSION_OFFSET + 6].copy_from_slice(&build.to_le_bytes());
}

fn put_marker(buf: &mut [u8], at: usize, marker: &[u8]) {
    buf[at..at + marker.len()].copy_from_slice(marker);
}

/// Writes a record at the given slot offset, with the given field
/// offset/value pairs applied relative to the record body (after the
/// 8-byte slot header and 8-byte object-id prefix, per spec.md §6).
struct SlotBuilder<'a> {
    buf: &'a mut [u8],
    slot_offset: usize,
}

impl<'a> SlotBuilder<'a> {
    fn new(buf: &'a mut [u8], slot_offset: usize, table_id: u16, rec_size: u32) -> Self {
        buf[slot_offset] = 0x00; // kind_lo = 0 (DATA)
        buf[slot_offset + 2..slot_offset + 4].copy_from_slice(&table_id.to_le_bytes());
        buf[slot_offset + 4..slot_offset + 8].copy_from_slice(&rec_size.to_le_bytes());
        SlotBuilder { buf, slot_offset }
    }

    fn field_offset(&self, unpacked_offset: usize) -> usize {
        self.slot_offset + ID_PREFIX_LEN + unpacked_offset
    }

    fn u64(&mut self, unpacked_offset: usize, value: u64) {
        let at = self.field_offset(unpacked_offset);
        self.buf[at..at + 8].copy_from_slice(&value.to_le_bytes());
    }

    fn u32(&mut self, unpacked_offset: usize, value: u32) {
        let at = self.field_offset(unpacked_offset);
        self.buf[at..at + 4].copy_from_slice(&value.to_le_bytes());
    }

    fn bytes(&mut self, unpacked_offset: usize, data: &[u8]) {
        let at = self.field_offset(unpacked_offset);
        self.buf[at..at + data.len()].copy_from_slice(data);
    }
}

#[test]
fn scenario_1_valid_g_new_single_video() {
    let mut buf = base_buffer(DATA_REGION_ORIGIN + SLOT_SIZE + 64 + 0x100);
    put_version(&mut buf, 7, 1, 1793);
    put_marker(&mut buf, 0x200, b"camera_model\0");
    put_marker(&mut buf, 0x220, b"vmoment\0");

    {
        let mut slot = SlotBuilder::new(&mut buf, DATA_REGION_ORIGIN, 3, 134);
        slot.u64(0, 123_456); // duration
        slot.u64(8, 42_949_672_960); // size
        slot.u64(16, 0x0100_0000_6400_0001); // file_handle
        slot.bytes(97, b"HERO11");
        slot.bytes(97 + 6, &[0x00]);
        slot.bytes(97 + 7, b"Black");
        // ctm @52: year_offset=20 (-> 2000), month=6, day=15, minute=45, hour=13, second=30
        slot.bytes(52, &[20, 0, 6, 15, 45, 13, 30]);
    }

    let db = McoDb::from_bytes(buf).expect("should decode");
    assert!(db.header_valid);
    assert_eq!(db.generation, Generation::GNew);
    assert_eq!(db.version.expect("version should be detected").major, 7);
    assert_eq!(db.records.len(), 1);

    let mdb_rs::Record::SingleEx(rec) = &db.records[0] else {
        panic!("expected a single_ex record");
    };
    assert_eq!(duration_seconds(rec.duration_ms), 123.456);
    assert_eq!(size_mb(rec.size_bytes), 40960.00);
    assert_eq!(rec.file_handle.directory(), 100);
    assert_eq!(rec.file_handle.estimated_path(), "100GOPRO/GX00001.MP4");
    let extended = rec.extended.as_ref().expect("G_NEW record carries extended fields");
    assert_eq!(extended.camera_model.as_deref(), Some("HERO11 Black"));
    let ctm = rec.ctm.expect("ctm should be present for non-zero year");
    assert_eq!(ctm.year, 2000);
    assert_eq!(ctm.month, 6);
    assert_eq!(ctm.day, 15);
    assert_eq!(ctm.hour, 13);
    assert_eq!(ctm.minute, 45);
    assert_eq!(ctm.second, 30);
}

#[test]
fn scenario_2_truncated_file_is_too_small() {
    let buf = vec![0u8; 100];
    let err = McoDb::from_bytes(buf).unwrap_err();
    assert!(matches!(err, McoError::FileTooSmall { size: 100, .. }));
}

#[test]
fn scenario_3_magic_mismatch_continues_decoding() {
    let mut buf = base_buffer(DATA_REGION_ORIGIN + SLOT_SIZE + 64);
    buf[0] = 0x01; // flip first magic byte
    put_version(&mut buf, 7, 1, 1793);

    let db = McoDb::from_bytes(buf).expect("should still decode");
    assert!(!db.header_valid);
    assert_eq!(db.version.expect("version pattern still present").major, 7);
}

#[test]
fn scenario_4_g_old_file_decodes_without_camera_model() {
    let mut buf = base_buffer(DATA_REGION_ORIGIN + SLOT_SIZE + 64 + 0x100);
    put_marker(&mut buf, 0x200, b"vtag\0");

    {
        let mut slot = SlotBuilder::new(&mut buf, DATA_REGION_ORIGIN, 3, 78);
        slot.u64(0, 60_000);
        slot.u64(8, 1024);
        slot.u32(24, 1);
    }

    let db = McoDb::from_bytes(buf).expect("should decode");
    assert_eq!(db.generation, Generation::GOld);
    assert_eq!(db.records.len(), 1);
    let mdb_rs::Record::SingleEx(rec) = &db.records[0] else {
        panic!("expected a single_ex record");
    };
    assert_eq!(rec.generation, Generation::GOld);
    assert!(rec.extended.is_none());
}

#[test]
fn scenario_5_grouped_ex_zero_duration_fps_absent() {
    let mut buf = base_buffer(DATA_REGION_ORIGIN + SLOT_SIZE + 64 + 0x100);
    put_marker(&mut buf, 0x200, b"camera_model\0");

    {
        let mut slot = SlotBuilder::new(&mut buf, DATA_REGION_ORIGIN, 4, 73);
        // frame_rate_timescale_indicator @35, frame_rate_duration_indicator @34
        let id_at = |off: usize| DATA_REGION_ORIGIN + ID_PREFIX_LEN + off;
        buf[id_at(35)] = 1; // timescale present
        buf[id_at(34)] = 1; // duration present, but value left at 0
        let ts_at = id_at(8);
        buf[ts_at..ts_at + 4].copy_from_slice(&30_000u32.to_le_bytes());
    }

    let db = McoDb::from_bytes(buf).expect("should decode");
    let mdb_rs::Record::GroupedEx(rec) = &db.records[0] else {
        panic!("expected a grouped_ex record");
    };
    assert_eq!(rec.frame_rate_duration, Some(0));
    assert_eq!(rec.fps(), None);
}

#[test]
fn grouped_ex_grp_ctm_datetime_is_decoded_correctly() {
    let mut buf = base_buffer(DATA_REGION_ORIGIN + SLOT_SIZE + 64 + 0x100);
    put_marker(&mut buf, 0x200, b"camera_model\0");

    {
        let mut slot = SlotBuilder::new(&mut buf, DATA_REGION_ORIGIN, 4, 73);
        // grp_ctm @20: year_offset=20 (-> 2000), month=6, day=15, minute=45, hour=13, second=30
        slot.bytes(20, &[20, 0, 6, 15, 45, 13, 30]);
    }

    let db = McoDb::from_bytes(buf).expect("should decode");
    let mdb_rs::Record::GroupedEx(rec) = &db.records[0] else {
        panic!("expected a grouped_ex record");
    };
    let grp_ctm = rec.grp_ctm.expect("grp_ctm should be present for non-zero year");
    assert_eq!(grp_ctm.year, 2000);
    assert_eq!(grp_ctm.month, 6);
    assert_eq!(grp_ctm.day, 15);
    assert_eq!(grp_ctm.hour, 13);
    assert_eq!(grp_ctm.minute, 45);
    assert_eq!(grp_ctm.second, 30);
}

#[test]
fn bounds_safety_across_representative_truncated_lengths() {
    for len in [0usize, 1, 0x400, 0x500, 0x501, 0x2C00 + 37] {
        let buf = vec![0xAAu8; len];
        let _ = McoDb::from_bytes(buf);
    }
}

#[test]
fn scenario_6_datetime_year_zero_is_absent() {
    let mut buf = base_buffer(DATA_REGION_ORIGIN + SLOT_SIZE + 64 + 0x100);
    put_marker(&mut buf, 0x200, b"camera_model\0");

    // ctm @52 left entirely zeroed -> year byte 0 -> absent.
    let _slot = SlotBuilder::new(&mut buf, DATA_REGION_ORIGIN, 3, 134);

    let db = McoDb::from_bytes(buf).expect("should decode");
    let mdb_rs::Record::SingleEx(rec) = &db.records[0] else {
        panic!("expected a single_ex record");
    };
    assert_eq!(rec.ctm, None);
}
