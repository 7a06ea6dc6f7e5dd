//! Read-only decoder for GoPro camera media-index database files
//! (`mdb*.db`), on-disk instances of the McObject eXtremeDB embedded
//! storage engine.
//!
//! [`McoDb::open`] reads a file once and decodes it in a single forward
//! pass: header/version detection, page walk, record-slot scan, record
//! decode, domain derivation. Nothing here writes to the input, replays
//! a transaction log, descends a B-tree index, or reassembles a BLOB —
//! see the module docs on [`slot`] and [`record`] for what is and isn't
//! decoded.

pub mod derive;
pub mod diagnostics;
pub mod errors;
pub mod header;
pub mod page;
pub mod reader;
pub mod record;
pub mod slot;

use std::path::{Path, PathBuf};

pub use derive::FileHandle;
pub use errors::McoError;
pub use header::{EngineVersion, Generation, HeaderInfo};
pub use page::{Page, PageFlags, PageHeader, PageKind, PageWalker};
pub use record::Record;

/// Minimum viable file size; below this, the header region cannot exist.
const MINIMUM_FILE_SIZE: usize = 0x500;

/// Everything decoded from one mdb file: header/version facts and every
/// recognized record. Ownership is flat — this value owns the record
/// vector outright, records own their sub-values by composition.
#[derive(Debug, Clone)]
pub struct McoDb {
    pub path: Option<PathBuf>,
    pub header_valid: bool,
    pub page_size: u16,
    pub generation: Generation,
    pub version: Option<EngineVersion>,
    pub dictionary_offset: u64,
    pub records: Vec<Record>,
    buf: Vec<u8>,
}

impl McoDb {
    /// Reads `path` whole (mdb files are a few hundred KB at most, never
    /// streamed) and decodes it.
    pub fn open(path: &Path) -> Result<Self, McoError> {
        let buf = std::fs::read(path)?;
        let mut db = Self::from_bytes(buf)?;
        db.path = Some(path.to_path_buf());
        Ok(db)
    }

    /// Core entry point; `open` delegates here after reading the file.
    /// Exists standalone so the bounds-safety property can run against
    /// in-memory buffers of arbitrary length without touching the
    /// filesystem.
    pub fn from_bytes(buf: Vec<u8>) -> Result<Self, McoError> {
        if buf.len() < MINIMUM_FILE_SIZE {
            return Err(McoError::FileTooSmall {
                size: buf.len(),
                minimum: MINIMUM_FILE_SIZE,
            });
        }

        let info = HeaderInfo::detect(&buf);
        let records = slot::SlotScanner::new(&buf, info.generation).records();

        Ok(McoDb {
            path: None,
            header_valid: info.header_valid,
            page_size: info.page_size,
            generation: info.generation,
            version: info.version,
            dictionary_offset: info.dictionary_offset,
            records,
            buf,
        })
    }

    /// Lazily walks the page structure over the held buffer. A fresh
    /// walker each call, matching the page walker's restartable-iterator
    /// contract; cheap, since it borrows rather than copies.
    pub fn pages(&self) -> PageWalker<'_> {
        PageWalker::new(&self.buf, self.page_size)
    }

    pub fn diagnostics(&self) -> diagnostics::Diagnostics {
        diagnostics::build(&self.pages())
    }

    /// The raw bytes this value was decoded from. Exposed read-only for
    /// diagnostics (`--hex`, `--strings` in the CLI); never mutated after
    /// decode.
    pub fn raw(&self) -> &[u8] {
        &self.buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_too_small_is_a_hard_error() {
        let buf = vec![0u8; 100];
        let err = McoDb::from_bytes(buf).unwrap_err();
        assert!(matches!(err, McoError::FileTooSmall { size: 100, .. }));
    }

    #[test]
    fn minimum_size_buffer_decodes_with_no_records() {
        let buf = vec![0u8; MINIMUM_FILE_SIZE];
        let db = McoDb::from_bytes(buf).expect("should decode");
        assert!(!db.header_valid);
        assert!(db.records.is_empty());
        assert_eq!(db.generation, Generation::Legacy);
    }

    #[test]
    fn decode_is_deterministic() {
        let buf = vec![0u8; MINIMUM_FILE_SIZE * 2];
        let first = McoDb::from_bytes(buf.clone()).expect("should decode");
        let second = McoDb::from_bytes(buf).expect("should decode");
        assert_eq!(first.header_valid, second.header_valid);
        assert_eq!(first.page_size, second.page_size);
        assert_eq!(first.records, second.records);
    }
}
