//! Rendering for each of the CLI's output modes. The core emits neutral
//! Rust values; turning those into JSON, hex dumps, or human summaries is
//! entirely this module's job, not the library's (spec.md §1).

use mdb_rs::derive;
use mdb_rs::page::PageKind;
use mdb_rs::record::{Datetime, Record};
use mdb_rs::McoDb;
use serde_json::{json, Value};

pub fn summary(db: &McoDb) -> String {
    let mut out = String::new();
    out.push_str(&format!("header_valid: {}\n", db.header_valid));
    out.push_str(&format!("page_size:    {}\n", db.page_size));
    out.push_str(&format!("generation:   {}\n", db.generation));
    match &db.version {
        Some(v) => out.push_str(&format!("version:      {v}\n")),
        None => out.push_str("version:      unknown\n"),
    }
    out.push_str(&format!("records:      {}\n", db.records.len()));
    out.push('\n');

    for record in &db.records {
        out.push_str(&record_one_liner(record));
        out.push('\n');
    }
    out
}

fn record_one_liner(record: &Record) -> String {
    match record {
        Record::SingleEx(rec) => {
            let model = rec
                .extended
                .as_ref()
                .and_then(|ext| ext.camera_model.as_deref())
                .unwrap_or("unknown model");
            format!(
                "[single_ex] {} {:.3}s {:.2}MB {}",
                rec.file_handle.estimated_path(),
                derive::duration_seconds(rec.duration_ms),
                derive::size_mb(rec.size_bytes),
                model
            )
        }
        Record::GroupedEx(rec) => {
            let fps = rec.fps().map(|f| format!("{f:.3}fps")).unwrap_or_else(|| "fps absent".to_string());
            let resolution = rec.resolution().unwrap_or_else(|| "resolution absent".to_string());
            format!("[grouped_ex] {resolution} {fps} n_elems={}", rec.n_elems)
        }
    }
}

pub fn json(db: &McoDb) -> Value {
    json!({
        "header_valid": db.header_valid,
        "page_size": db.page_size,
        "generation": db.generation.to_string(),
        "version": db.version.as_ref().map(|v| v.to_string()),
        "dictionary_offset": db.dictionary_offset,
        "records": db.records.iter().map(record_to_json).collect::<Vec<_>>(),
    })
}

fn datetime_to_json(dt: &Option<Datetime>) -> Value {
    match dt {
        Some(dt) => Value::String(dt.to_string()),
        None => Value::Null,
    }
}

fn record_to_json(record: &Record) -> Value {
    match record {
        Record::SingleEx(rec) => {
            let extended = rec.extended.as_ref().map(|ext| {
                json!({
                    "max_moment_score": ext.max_moment_score,
                    "moment_cnt": ext.moment_cnt,
                    "grp_no": ext.grp_no,
                    "total_tag_cnt": ext.total_tag_cnt,
                    "dir_no": ext.dir_no,
                    "protune_option": ext.protune_option,
                    "aud_option": ext.aud_option,
                    "has_eis": ext.has_eis,
                    "f_meta_present": ext.f_meta_present,
                    "projection": ext.projection,
                    "lens_config": ext.lens_config,
                    "camera_model": ext.camera_model,
                    "sub_model": ext.sub_model,
                })
            });
            json!({
                "kind": "single_ex",
                "generation": rec.generation.to_string(),
                "duration_ms": rec.duration_ms,
                "duration_seconds": derive::duration_seconds(rec.duration_ms),
                "size_bytes": rec.size_bytes,
                "size_mb": derive::size_mb(rec.size_bytes),
                "directory": rec.file_handle.directory(),
                "file_number": rec.file_handle.file_number(),
                "type_flag": rec.file_handle.type_flag(),
                "estimated_path": rec.file_handle.estimated_path(),
                "media_status": rec.media_status,
                "file_type": derive::file_type_name(rec.file_type_ex),
                "tag_cnt": rec.tag_cnt,
                "chp_cnt": rec.chp_cnt,
                "ctm": datetime_to_json(&rec.ctm),
                "latm": datetime_to_json(&rec.latm),
                "last_scan_time": datetime_to_json(&rec.last_scan_time),
                "has_hdr": rec.has_hdr,
                "is_clip": rec.is_clip,
                "file_scanned": rec.file_scanned,
                "avc_level": rec.avc_level,
                "avc_profile": rec.avc_profile,
                "extended": extended,
            })
        }
        Record::GroupedEx(rec) => {
            json!({
                "kind": "grouped_ex",
                "file_handle": format!("{:#018x}", rec.file_handle),
                "frame_rate_timescale": rec.frame_rate_timescale,
                "frame_rate_duration": rec.frame_rate_duration,
                "fps": rec.fps(),
                "n_elems": rec.n_elems,
                "grp_ctm": datetime_to_json(&rec.grp_ctm),
                "grp_no": rec.grp_no,
                "resolution": rec.resolution(),
                "gusi_session_id": rec.gusi_blob.session_id,
                "gusi_recording_id": rec.gusi_blob.recording_id,
                "content_id": rec.content_blob.content_id(),
                "f_is_subsample": rec.f_is_subsample,
                "f_is_progressive": rec.f_is_progressive,
            })
        }
    }
}

pub fn dict(db: &McoDb) -> String {
    let mut out = String::new();
    out.push_str(&format!("engine version: {}\n", db.version.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())));
    out.push_str(&format!("generation:     {}\n", db.generation));
    out.push_str(&format!("dictionary @:   {:#x}\n", db.dictionary_offset));
    out.push_str("tables:\n");
    out.push_str("  1 global\n  2 single\n  3 single_ex\n  4 grouped_ex\n");
    out.push_str("struct single_ex:\n");
    out.push_str("  duration, size, file_handle, media_status, file_type_ex, ctm, tag_cnt,\n");
    out.push_str("  chp_cnt, latm, last_scan_time, has_hdr, is_clip, file_scanned, avc_level,\n");
    out.push_str("  avc_profile [+ extended: moment_cnt, grp_no, dir_no, camera_model, sub_model, ...]\n");
    out.push_str("struct grouped_ex:\n");
    out.push_str("  file_handle, frame_rate_timescale, frame_rate_duration, n_elems, grp_ctm,\n");
    out.push_str("  grp_no, width, height, gusi_blob, content_blob, f_is_subsample, f_is_progressive\n");
    out
}

pub fn analyze(db: &McoDb) -> String {
    let diag = db.diagnostics();
    let mut out = String::new();
    out.push_str(&format!("page_size: {}\n", db.page_size));
    out.push_str(&format!("pages: {}\n", diag.kind_histogram.values().sum::<usize>()));
    out.push_str(&format!("records: {}\n", db.records.len()));
    out.push_str(&format!("string_tables: {} entries\n", diag.string_tables.len()));
    out.push_str(&format!("anomalies: {}\n", diag.unknowns.len()));
    for unknown in &diag.unknowns {
        out.push_str(&format!("  @{:#x} kind={} flags={:#04x}\n", unknown.offset, unknown.kind, unknown.flags_bits));
    }
    out
}

pub fn strings(db: &McoDb) -> String {
    let mut out = String::new();
    for page in db.pages().pages() {
        if !matches!(page.header.kind, PageKind::StringExt) {
            continue;
        }
        for string in page.string_ext_strings() {
            if string.len() >= 4 && string.len() <= 64 {
                out.push_str(&format!("{:#x}: {}\n", page.offset, string));
            }
        }
    }
    out
}

pub fn fields() -> String {
    let table: &[(&str, usize)] = &[
        ("duration", 0),
        ("size", 8),
        ("file_handle", 16),
        ("media_status", 24),
        ("file_type_ex", 36),
        ("max_moment_score", 40),
        ("ctm", 52),
        ("latm", 66),
        ("last_scan_time", 78),
        ("camera_model", 97),
        ("sub_model", 128),
    ];
    table.iter().map(|(name, offset)| format!("{name}: {offset:#x}\n")).collect()
}

pub fn pages(db: &McoDb) -> String {
    let diag = db.diagnostics();
    let mut out = String::new();
    for (kind, count) in &diag.kind_histogram {
        out.push_str(&format!("{kind}: {count}\n"));
    }
    out.push('\n');
    for page in db.pages().pages() {
        out.push_str(&format!(
            "@{:#06x} kind={} flags={:#04x} user={} align_data={}\n",
            page.offset, page.header.kind, page.header.flags.bits(), page.header.user, page.header.align_data
        ));
    }
    out
}

pub fn hex(db: &McoDb, offset: usize, length: usize) -> String {
    let buf = db.raw();
    let end = (offset + length).min(buf.len());
    let mut out = String::new();
    let mut addr = offset;
    while addr < end {
        let row_end = (addr + 16).min(end);
        let row = &buf[addr..row_end];

        out.push_str(&format!("{addr:08x}  "));
        for (i, byte) in row.iter().enumerate() {
            out.push_str(&format!("{byte:02x} "));
            if i == 7 {
                out.push(' ');
            }
        }
        for _ in row.len()..16 {
            out.push_str("   ");
        }

        out.push_str(" |");
        for &byte in row {
            let ch = if (0x20..=0x7E).contains(&byte) { byte as char } else { '.' };
            out.push(ch);
        }
        out.push_str("|\n");

        addr = row_end;
    }
    out
}
