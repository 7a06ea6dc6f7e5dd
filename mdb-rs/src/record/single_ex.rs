//! `single_ex` (table id 3): one media-file entry. G_NEW carries camera
//! model/sub model and a handful of counters that G_OLD's compact layout
//! doesn't have at all; those live in [`SingleExExtended`] and are `None`
//! for G_OLD records rather than zeroed placeholders in a flat struct.

use crate::derive::FileHandle;
use crate::header::Generation;
use crate::record::cstring::cstring_cleaned;
use crate::record::datetime::Datetime;
use crate::slot::RecordBody;

/// G_NEW-only fields. Absent entirely (not zeroed) on a G_OLD record.
#[derive(Debug, Clone, PartialEq)]
pub struct SingleExExtended {
    pub max_moment_score: f32,
    pub moment_cnt: u16,
    pub grp_no: u16,
    pub total_tag_cnt: u16,
    pub dir_no: u16,
    pub protune_option: u8,
    pub aud_option: u8,
    pub has_eis: bool,
    pub f_meta_present: bool,
    pub projection: u8,
    pub lens_config: u8,
    pub camera_model: Option<String>,
    pub sub_model: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SingleEx {
    pub generation: Generation,
    pub duration_ms: u64,
    pub size_bytes: u64,
    pub file_handle: FileHandle,
    pub media_status: u32,
    pub file_type_ex: u32,
    pub tag_cnt: u16,
    pub chp_cnt: u16,
    pub ctm: Option<Datetime>,
    pub latm: Option<Datetime>,
    pub last_scan_time: Option<Datetime>,
    pub has_hdr: bool,
    pub is_clip: bool,
    pub file_scanned: bool,
    pub avc_level: u8,
    pub avc_profile: u8,
    pub extended: Option<SingleExExtended>,
}

/// G_NEW unpacked-offset table, from the fixed schema (§3/§4.5).
mod g_new_offsets {
    pub const DURATION: usize = 0;
    pub const SIZE: usize = 8;
    pub const FILE_HANDLE: usize = 16;
    pub const MEDIA_STATUS: usize = 24;
    pub const FILE_TYPE_EX: usize = 36;
    pub const MAX_MOMENT_SCORE: usize = 40;
    pub const MOMENT_CNT: usize = 50;
    pub const CTM: usize = 52;
    pub const TAG_CNT: usize = 60;
    pub const CHP_CNT: usize = 62;
    pub const GRP_NO: usize = 64;
    pub const LATM: usize = 66;
    pub const TOTAL_TAG_CNT: usize = 74;
    pub const DIR_NO: usize = 76;
    pub const LAST_SCAN_TIME: usize = 78;
    pub const HAS_HDR: usize = 85;
    pub const IS_CLIP: usize = 86;
    pub const FILE_SCANNED: usize = 87;
    pub const AVC_LEVEL: usize = 88;
    pub const AVC_PROFILE: usize = 89;
    pub const PROTUNE_OPTION: usize = 90;
    pub const AUD_OPTION: usize = 91;
    pub const HAS_EIS: usize = 92;
    pub const F_META_PRESENT: usize = 93;
    pub const PROJECTION: usize = 94;
    pub const LENS_CONFIG: usize = 96;
    pub const CAMERA_MODEL: usize = 97;
    pub const CAMERA_MODEL_LEN: usize = 30;
    pub const SUB_MODEL: usize = 128;
    pub const SUB_MODEL_LEN: usize = 16;
}

/// G_OLD has no documented offset table upstream beyond "same semantic
/// fields up to avc_profile, no camera_model/sub_model/dir_no/grp_no/
/// moment_cnt/total_tag_cnt/max_moment_score/GPS/orientation" (§3). This
/// packs the surviving fields densely in the same field order, landing
/// within the 78±20 slot-size tolerance used by the slot scanner.
mod g_old_offsets {
    pub const DURATION: usize = 0;
    pub const SIZE: usize = 8;
    pub const FILE_HANDLE: usize = 16;
    pub const MEDIA_STATUS: usize = 24;
    pub const FILE_TYPE_EX: usize = 28;
    pub const CTM: usize = 32;
    pub const TAG_CNT: usize = 40;
    pub const CHP_CNT: usize = 42;
    pub const LATM: usize = 44;
    pub const LAST_SCAN_TIME: usize = 52;
    pub const HAS_HDR: usize = 60;
    pub const IS_CLIP: usize = 61;
    pub const FILE_SCANNED: usize = 62;
    pub const AVC_LEVEL: usize = 63;
    pub const AVC_PROFILE: usize = 64;
}

fn datetime_at(body: &RecordBody<'_>, unpacked_offset: usize) -> Option<Datetime> {
    Datetime::from_bytes(&body.bytes(unpacked_offset, 7))
}

pub fn decode(body: &RecordBody<'_>, generation: Generation) -> SingleEx {
    match generation {
        Generation::GOld => decode_g_old(body),
        _ => decode_g_new(body),
    }
}

fn decode_g_new(body: &RecordBody<'_>) -> SingleEx {
    use g_new_offsets as o;

    let model_raw = body.bytes(o.CAMERA_MODEL, o.CAMERA_MODEL_LEN);
    let sub_raw = body.bytes(o.SUB_MODEL, o.SUB_MODEL_LEN);

    let extended = SingleExExtended {
        max_moment_score: body.f32(o.MAX_MOMENT_SCORE),
        moment_cnt: body.u16(o.MOMENT_CNT),
        grp_no: body.u16(o.GRP_NO),
        total_tag_cnt: body.u16(o.TOTAL_TAG_CNT),
        dir_no: body.u16(o.DIR_NO),
        protune_option: body.u8(o.PROTUNE_OPTION),
        aud_option: body.u8(o.AUD_OPTION),
        has_eis: body.u8(o.HAS_EIS) != 0,
        f_meta_present: body.u8(o.F_META_PRESENT) != 0,
        projection: body.u8(o.PROJECTION),
        lens_config: body.u8(o.LENS_CONFIG),
        camera_model: cstring_cleaned(&model_raw, 2),
        sub_model: cstring_cleaned(&sub_raw, 2),
    };

    SingleEx {
        generation: Generation::GNew,
        duration_ms: body.u64(o.DURATION),
        size_bytes: body.u64(o.SIZE),
        file_handle: FileHandle::from_raw(body.u64(o.FILE_HANDLE)),
        media_status: body.u32(o.MEDIA_STATUS),
        file_type_ex: body.u32(o.FILE_TYPE_EX),
        tag_cnt: body.u16(o.TAG_CNT),
        chp_cnt: body.u16(o.CHP_CNT),
        ctm: datetime_at(body, o.CTM),
        latm: datetime_at(body, o.LATM),
        last_scan_time: datetime_at(body, o.LAST_SCAN_TIME),
        has_hdr: body.u8(o.HAS_HDR) != 0,
        is_clip: body.u8(o.IS_CLIP) != 0,
        file_scanned: body.u8(o.FILE_SCANNED) != 0,
        avc_level: body.u8(o.AVC_LEVEL),
        avc_profile: body.u8(o.AVC_PROFILE),
        extended: Some(extended),
    }
}

fn decode_g_old(body: &RecordBody<'_>) -> SingleEx {
    use g_old_offsets as o;

    SingleEx {
        generation: Generation::GOld,
        duration_ms: body.u64(o.DURATION),
        size_bytes: body.u64(o.SIZE),
        file_handle: FileHandle::from_raw(body.u64(o.FILE_HANDLE)),
        media_status: body.u32(o.MEDIA_STATUS),
        file_type_ex: body.u32(o.FILE_TYPE_EX),
        tag_cnt: body.u16(o.TAG_CNT),
        chp_cnt: body.u16(o.CHP_CNT),
        ctm: datetime_at(body, o.CTM),
        latm: datetime_at(body, o.LATM),
        last_scan_time: datetime_at(body, o.LAST_SCAN_TIME),
        has_hdr: body.u8(o.HAS_HDR) != 0,
        is_clip: body.u8(o.IS_CLIP) != 0,
        file_scanned: body.u8(o.FILE_SCANNED) != 0,
        avc_level: body.u8(o.AVC_LEVEL),
        avc_profile: body.u8(o.AVC_PROFILE),
        extended: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::SLOT_SIZE;

    fn g_new_slot() -> Vec<u8> {
        let mut buf = vec![0u8; 16 + SLOT_SIZE + 64];
        let base = 16; // slot header + object-id prefix
        buf[base + g_new_offsets::DURATION..base + g_new_offsets::DURATION + 8].copy_from_slice(&123_456u64.to_le_bytes());
        buf[base + g_new_offsets::SIZE..base + g_new_offsets::SIZE + 8].copy_from_slice(&42_949_672_960u64.to_le_bytes());
        buf[base + g_new_offsets::FILE_HANDLE..base + g_new_offsets::FILE_HANDLE + 8]
            .copy_from_slice(&0x0100_0000_6400_0001u64.to_le_bytes());
        let model_off = base + g_new_offsets::CAMERA_MODEL;
        buf[model_off..model_off + 6].copy_from_slice(b"HERO11");
        buf[model_off + 6] = 0x00;
        buf[model_off + 7..model_off + 12].copy_from_slice(b"Black");
        buf
    }

    #[test]
    fn decodes_scenario_one_single_ex() {
        let buf = g_new_slot();
        let body = RecordBody::new(&buf, 0);
        let rec = decode(&body, Generation::GNew);
        assert_eq!(rec.duration_ms, 123_456);
        assert_eq!(crate::derive::duration_seconds(rec.duration_ms), 123.456);
        assert_eq!(rec.size_bytes, 42_949_672_960);
        assert_eq!(crate::derive::size_mb(rec.size_bytes), 40960.0);
        assert_eq!(rec.file_handle.directory(), 100);
        assert_eq!(rec.file_handle.file_number(), 1);
        assert_eq!(rec.file_handle.estimated_path(), "100GOPRO/GX00001.MP4");
        let extended = rec.extended.expect("G_NEW record should carry extended fields");
        assert_eq!(extended.camera_model.as_deref(), Some("HERO11 Black"));
    }

    #[test]
    fn g_old_has_no_extended_fields() {
        let buf = vec![0u8; 16 + SLOT_SIZE + 64];
        let body = RecordBody::new(&buf, 0);
        let rec = decode(&body, Generation::GOld);
        assert_eq!(rec.extended, None);
    }

    #[test]
    fn datetime_absent_when_year_byte_zero() {
        let buf = vec![0u8; 16 + SLOT_SIZE + 64];
        let body = RecordBody::new(&buf, 0);
        let rec = decode(&body, Generation::GNew);
        assert_eq!(rec.ctm, None);
    }

    #[test]
    fn decodes_populated_ctm_datetime() {
        let mut buf = g_new_slot();
        let base = 16;
        let ctm_off = base + g_new_offsets::CTM;
        // year_offset=20 (-> 2000), month=6, day=15, minute=45, hour=13, second=30
        buf[ctm_off..ctm_off + 7].copy_from_slice(&[20, 0, 6, 15, 45, 13, 30]);

        let body = RecordBody::new(&buf, 0);
        let rec = decode(&body, Generation::GNew);
        let ctm = rec.ctm.expect("ctm should be present for non-zero year");
        assert_eq!(ctm.year, 2000);
        assert_eq!(ctm.month, 6);
        assert_eq!(ctm.day, 15);
        assert_eq!(ctm.hour, 13);
        assert_eq!(ctm.minute, 45);
        assert_eq!(ctm.second, 30);
    }
}
