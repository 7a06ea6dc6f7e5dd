//! Page-structure walker: iterates the file in page-sized strides and
//! classifies each page's fixed 8-byte header. Pure: no I/O, no allocation
//! beyond the returned iterator/vectors, no mutation of earlier output.

use std::fmt;

use crate::reader::ByteReader;

/// Closed set of page kinds (low 4 bits of the header's first byte).
/// Values `9` and `13` are observed in the wild but undocumented; they are
/// surfaced as `Reserved` and never decoded further, per the source's own
/// tentative naming (`HASH_OVF`, `UNKNOWN_13`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    Data,
    Extension,
    BtreeLeaf,
    BtreeNode,
    AutoidHash,
    AutoidOvf,
    BlobHead,
    BlobCont,
    IndexDir,
    Trans,
    Freelist,
    Fixrec,
    StringExt,
    Temp,
    Reserved(u8),
}

impl PageKind {
    pub fn from_nibble(nibble: u8) -> PageKind {
        match nibble & 0x0F {
            0 => PageKind::Data,
            1 => PageKind::Extension,
            2 => PageKind::BtreeLeaf,
            3 => PageKind::BtreeNode,
            4 => PageKind::AutoidHash,
            5 => PageKind::AutoidOvf,
            6 => PageKind::BlobHead,
            7 => PageKind::BlobCont,
            8 => PageKind::IndexDir,
            10 => PageKind::Trans,
            11 => PageKind::Freelist,
            12 => PageKind::Fixrec,
            14 => PageKind::StringExt,
            15 => PageKind::Temp,
            other => PageKind::Reserved(other),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PageKind::Data => "DATA",
            PageKind::Extension => "EXTENSION",
            PageKind::BtreeLeaf => "BTREE_LEAF",
            PageKind::BtreeNode => "BTREE_NODE",
            PageKind::AutoidHash => "AUTOID_HASH",
            PageKind::AutoidOvf => "AUTOID_OVF",
            PageKind::BlobHead => "BLOB_HEAD",
            PageKind::BlobCont => "BLOB_CONT",
            PageKind::IndexDir => "INDEX_DIR",
            PageKind::Trans => "TRANS",
            PageKind::Freelist => "FREELIST",
            PageKind::Fixrec => "FIXREC",
            PageKind::StringExt => "STRING_EXT",
            PageKind::Temp => "TEMP",
            PageKind::Reserved(9) => "HASH_OVF?",
            PageKind::Reserved(13) => "UNKNOWN_13?",
            PageKind::Reserved(_) => "RESERVED",
        }
    }

    pub fn is_reserved(&self) -> bool {
        matches!(self, PageKind::Reserved(_))
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// High nibble of the header's first byte. Hand-rolled rather than pulling
/// in the `bitflags` crate for a 4-bit set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageFlags(u8);

impl PageFlags {
    pub const COMPACT: u8 = 0x10;
    pub const HAS_BLOBS: u8 = 0x20;
    pub const FLAG_2: u8 = 0x40;
    pub const FLAG_3: u8 = 0x80;

    pub fn from_byte(kind_byte: u8) -> Self {
        PageFlags(kind_byte & 0xF0)
    }

    pub fn bits(&self) -> u8 {
        self.0
    }

    pub fn compact(&self) -> bool {
        self.0 & Self::COMPACT != 0
    }

    pub fn has_blobs(&self) -> bool {
        self.0 & Self::HAS_BLOBS != 0
    }

    pub fn flag_2(&self) -> bool {
        self.0 & Self::FLAG_2 != 0
    }

    pub fn flag_3(&self) -> bool {
        self.0 & Self::FLAG_3 != 0
    }

    /// `FLAG_2`/`FLAG_3` combined with any kind is treated as a suspicious
    /// combination by the diagnostics view (see spec anomalies list).
    pub fn is_suspicious(&self) -> bool {
        self.flag_2() || self.flag_3()
    }
}

/// Fixed 8-byte page header.
#[derive(Debug, Clone, Copy)]
pub struct PageHeader {
    pub kind: PageKind,
    pub flags: PageFlags,
    pub extraflags: u8,
    pub user: u16,
    pub align_data: u32,
}

impl PageHeader {
    fn parse(reader: &ByteReader<'_>, offset: usize) -> Self {
        let kind_byte = reader.read_u8(offset);
        PageHeader {
            kind: PageKind::from_nibble(kind_byte),
            flags: PageFlags::from_byte(kind_byte),
            extraflags: reader.read_u8(offset + 1),
            user: reader.read_u16(offset + 2),
            align_data: reader.read_u32(offset + 4),
        }
    }
}

pub const PAGE_HEADER_SIZE: usize = 8;

/// A single page: its header and the body slice following the header,
/// clipped to whatever the buffer actually contains (the last page of a
/// truncated file may be shorter than `page_size`).
#[derive(Debug, Clone, Copy)]
pub struct Page<'a> {
    pub offset: usize,
    pub header: PageHeader,
    pub body: &'a [u8],
}

impl<'a> Page<'a> {
    /// `EXTENSION`: `user` is a table id, `align_data` a continuation size.
    pub fn extension_info(&self) -> Option<(u16, u32)> {
        matches!(self.header.kind, PageKind::Extension).then(|| (self.header.user, self.header.align_data))
    }

    /// `STRING_EXT`: null-terminated printable-ASCII runs of length >= 2.
    pub fn string_ext_strings(&self) -> Vec<String> {
        if !matches!(self.header.kind, PageKind::StringExt) {
            return Vec::new();
        }
        extract_printable_runs(self.body, 2, usize::MAX, true)
    }

    /// `AUTOID_OVF`: 8-byte values at 8-byte strides that look like
    /// plausible in-file pointers (`0x100..file_size`).
    pub fn autoid_ovf_pointers(&self, file_size: usize) -> Vec<u64> {
        if !matches!(self.header.kind, PageKind::AutoidOvf) {
            return Vec::new();
        }
        let reader = ByteReader::new(self.body);
        let mut out = Vec::new();
        let mut off = 0;
        while off + 8 <= self.body.len() {
            let candidate = reader.read_u64(off);
            if (0x100..file_size as u64).contains(&candidate) {
                out.push(candidate);
            }
            off += 8;
        }
        out
    }

    /// `INDEX_DIR`: `user`, `align_data`, and a 40-byte body preview.
    pub fn index_dir_preview(&self) -> Option<(u16, u32, Vec<u8>)> {
        if !matches!(self.header.kind, PageKind::IndexDir) {
            return None;
        }
        let len = self.body.len().min(40);
        Some((self.header.user, self.header.align_data, self.body[..len].to_vec()))
    }
}

/// Extracts maximal runs of printable ASCII (`0x20..=0x7E`) of at least
/// `min_len` bytes, up to `max_len` runs, optionally requiring a null
/// terminator to end each run.
pub(crate) fn extract_printable_runs(data: &[u8], min_len: usize, max_runs: usize, require_null_term: bool) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current: Vec<u8> = Vec::new();
    let mut terminated = false;

    for &b in data {
        if (0x20..=0x7E).contains(&b) {
            current.push(b);
            terminated = false;
        } else {
            if b == 0x00 {
                terminated = true;
            }
            if current.len() >= min_len && (!require_null_term || terminated) {
                runs.push(String::from_utf8_lossy(&current).to_string());
                if runs.len() >= max_runs {
                    break;
                }
            }
            current.clear();
        }
    }
    if !require_null_term && current.len() >= min_len && runs.len() < max_runs {
        runs.push(String::from_utf8_lossy(&current).to_string());
    }
    runs
}

/// Iterates `buf` in `page_size`-sized strides starting at offset 0.
pub struct PageWalker<'a> {
    buf: &'a [u8],
    page_size: usize,
}

impl<'a> PageWalker<'a> {
    pub fn new(buf: &'a [u8], page_size: u16) -> Self {
        PageWalker {
            buf,
            page_size: page_size as usize,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Lazy, finite, restartable sequence of pages.
    pub fn pages(&self) -> impl Iterator<Item = Page<'a>> + 'a {
        let buf = self.buf;
        let page_size = self.page_size;
        let page_count = if page_size == 0 { 0 } else { buf.len() / page_size.max(1) };

        (0..page_count).map(move |i| {
            let offset = i * page_size;
            let reader = ByteReader::new(buf);
            let header = PageHeader::parse(&reader, offset);
            let body_start = (offset + PAGE_HEADER_SIZE).min(buf.len());
            let body_end = (offset + page_size).min(buf.len());
            let body = &buf[body_start..body_end.max(body_start)];
            Page { offset, header, body }
        })
    }

    /// Filtered view over pages of a single kind.
    pub fn kind(&self, kind: PageKind) -> impl Iterator<Item = Page<'a>> + 'a {
        self.pages().filter(move |p| p.header.kind == kind)
    }
}
