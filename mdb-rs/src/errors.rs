//! Hard errors only. Soft conditions (bad magic, unknown version, absent
//! fields) are recorded in the decoded value itself, see [`crate::McoDb`].
use std::fmt;

/// Fatal decode errors. Anything not fatal is folded into `McoDb` fields
/// instead of raised here (soft-error kinds 3-5 in the error taxonomy).
#[derive(Debug)]
pub enum McoError {
    /// Could not read the input path.
    Io(std::io::Error),
    /// File shorter than the minimum viable size (`0x500` bytes).
    FileTooSmall { size: usize, minimum: usize },
}

impl std::error::Error for McoError {}

impl fmt::Display for McoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            McoError::Io(err) => write!(f, "could not read mdb file: {err}"),
            McoError::FileTooSmall { size, minimum } => write!(
                f,
                "file too small to be a valid mdb database: {size} bytes, expected at least {minimum}"
            ),
        }
    }
}

impl From<std::io::Error> for McoError {
    fn from(err: std::io::Error) -> Self {
        McoError::Io(err)
    }
}
