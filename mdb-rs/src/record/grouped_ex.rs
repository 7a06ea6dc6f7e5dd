//! `grouped_ex` (table id 4): a video-group entry — chapters or
//! timelapse segments sharing one clip. One offset table serves both
//! generations (the fixed schema gives only one); G_OLD records are
//! simply shorter, so fields past the truncated body read as absent via
//! their indicator bytes rather than via a second offset table.

use crate::record::blobs::{ContentBlob, GusiBlob};
use crate::record::datetime::Datetime;
use crate::slot::RecordBody;

#[derive(Debug, Clone, PartialEq)]
pub struct GroupedEx {
    pub file_handle: u64,
    pub frame_rate_timescale: Option<u32>,
    pub frame_rate_duration: Option<u32>,
    pub n_elems: u32,
    pub grp_ctm: Option<Datetime>,
    pub grp_no: Option<u16>,
    pub width: u16,
    pub height: u16,
    pub gusi_blob: GusiBlob,
    pub f_is_subsample: Option<bool>,
    pub f_is_progressive: Option<bool>,
    pub content_blob: ContentBlob,
}

impl GroupedEx {
    pub fn fps(&self) -> Option<f64> {
        match (self.frame_rate_timescale, self.frame_rate_duration) {
            (Some(timescale), Some(duration)) if duration > 0 => Some(timescale as f64 / duration as f64),
            _ => None,
        }
    }

    pub fn resolution(&self) -> Option<String> {
        crate::derive::resolution_string(self.width, self.height)
    }
}

mod offsets {
    pub const FILE_HANDLE: usize = 0;
    pub const FRAME_RATE_TIMESCALE: usize = 8;
    pub const FRAME_RATE_DURATION: usize = 12;
    pub const N_ELEMS: usize = 16;
    pub const GRP_CTM: usize = 20;
    pub const GRP_NO: usize = 28;
    pub const WIDTH: usize = 30;
    pub const HEIGHT: usize = 32;
    pub const FRAME_RATE_DURATION_INDICATOR: usize = 34;
    pub const FRAME_RATE_TIMESCALE_INDICATOR: usize = 35;
    pub const GUSI_BLOB: usize = 36;
    pub const F_IS_SUBSAMPLE: usize = 52;
    pub const F_IS_PROGRESSIVE: usize = 53;
    pub const F_IS_PROGRESSIVE_INDICATOR: usize = 54;
    pub const GRP_NO_INDICATOR: usize = 55;
    pub const F_IS_SUBSAMPLE_INDICATOR: usize = 56;
    pub const CONTENT_BLOB: usize = 57;
}

pub fn decode(body: &RecordBody<'_>) -> GroupedEx {
    use offsets as o;

    let frame_rate_timescale_present = body.u8(o.FRAME_RATE_TIMESCALE_INDICATOR) != 0;
    let frame_rate_duration_present = body.u8(o.FRAME_RATE_DURATION_INDICATOR) != 0;
    let grp_no_present = body.u8(o.GRP_NO_INDICATOR) != 0;
    let f_is_progressive_present = body.u8(o.F_IS_PROGRESSIVE_INDICATOR) != 0;
    let f_is_subsample_present = body.u8(o.F_IS_SUBSAMPLE_INDICATOR) != 0;

    let gusi_raw: [u8; 16] = body.bytes(o.GUSI_BLOB, 16).try_into().expect("read_bytes always returns requested length");
    let content_raw: [u8; 16] = body.bytes(o.CONTENT_BLOB, 16).try_into().expect("read_bytes always returns requested length");

    GroupedEx {
        file_handle: body.u64(o.FILE_HANDLE),
        frame_rate_timescale: frame_rate_timescale_present.then(|| body.u32(o.FRAME_RATE_TIMESCALE)),
        frame_rate_duration: frame_rate_duration_present.then(|| body.u32(o.FRAME_RATE_DURATION)),
        n_elems: body.u32(o.N_ELEMS),
        grp_ctm: Datetime::from_bytes(&body.bytes(o.GRP_CTM, 7)),
        grp_no: grp_no_present.then(|| body.u16(o.GRP_NO)),
        width: body.u16(o.WIDTH),
        height: body.u16(o.HEIGHT),
        gusi_blob: GusiBlob::from_bytes(&gusi_raw),
        f_is_subsample: f_is_subsample_present.then(|| body.u8(o.F_IS_SUBSAMPLE) != 0),
        f_is_progressive: f_is_progressive_present.then(|| body.u8(o.F_IS_PROGRESSIVE) != 0),
        content_blob: ContentBlob::from_bytes(&content_raw),
    }
}
