//! Decoded record bodies. A discriminated union over the two table
//! shapes the data region carries (single_ex/grouped_ex), rather than a
//! shared base struct — the fields genuinely don't overlap beyond a
//! handful of scalars.

pub mod blobs;
pub mod cstring;
pub mod datetime;
pub mod grouped_ex;
pub mod single_ex;

pub use blobs::{ContentBlob, GusiBlob};
pub use cstring::cstring_cleaned;
pub use datetime::Datetime;
pub use grouped_ex::GroupedEx;
pub use single_ex::SingleEx;

use crate::header::Generation;
use crate::slot::RecordBody;

#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    SingleEx(SingleEx),
    GroupedEx(GroupedEx),
}

pub fn decode_single_ex(body: &RecordBody<'_>, generation: Generation) -> SingleEx {
    single_ex::decode(body, generation)
}

pub fn decode_grouped_ex(body: &RecordBody<'_>) -> GroupedEx {
    grouped_ex::decode(body)
}
