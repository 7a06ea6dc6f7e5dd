//! Argument parsing. One positional path plus a set of mutually exclusive
//! output modes (spec.md §6); `clap`'s derive API plus an explicit
//! `ArgGroup` enforces "exactly one of" without hand-rolled checks.

use std::path::PathBuf;

use clap::{ArgGroup, Parser};

#[derive(Debug, Parser)]
#[command(
    name = "mdb-cli",
    about = "Decode GoPro media-index database files (mdb*.db)",
    group(ArgGroup::new("mode").args(["json", "dict", "analyze", "strings", "fields", "pages", "hex"]))
)]
pub struct Cli {
    /// Path to an mdb*.db file.
    pub path: PathBuf,

    /// Serialize the decoded model as JSON; absent fields become `null`.
    #[arg(long)]
    pub json: bool,

    /// Print detected engine version, table/index names, struct field lists.
    #[arg(long)]
    pub dict: bool,

    /// Print table locations, index names, string breakdown, pointer counts.
    #[arg(long)]
    pub analyze: bool,

    /// Print `offset: string` for every printable run of 4..=64 chars.
    #[arg(long)]
    pub strings: bool,

    /// Print known field names and their first on-disk offsets.
    #[arg(long)]
    pub fields: bool,

    /// Print the page-kind histogram and a per-page one-liner.
    #[arg(long)]
    pub pages: bool,

    /// Hex + ASCII dump of OFFSET..OFFSET+LENGTH, 16 bytes per row.
    /// Accepts decimal or `0x`-prefixed values.
    #[arg(long, num_args = 2, value_names = ["OFFSET", "LENGTH"], value_parser = parse_numeric)]
    pub hex: Option<Vec<u64>>,
}

fn parse_numeric(s: &str) -> Result<u64, String> {
    if let Some(stripped) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u64::from_str_radix(stripped, 16).map_err(|e| e.to_string())
    } else {
        s.parse::<u64>().map_err(|e| e.to_string())
    }
}
