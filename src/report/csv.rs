//! CSV rendering: fixed headers, every field quoted

use super::DuplicateAssetCsvRecord;
use crate::analysis::UnusedAssetRecord;
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use miette::{IntoDiagnostic, Result};

const UNUSED_HEADERS: [&str; 6] = ["Asset Id", "Title", "Codename", "Filename", "Url", "App Url"];

const DUPLICATE_HEADERS: [&str; 8] = [
    "Shared filename",
    "Asset Id",
    "Title",
    "Codename",
    "Filename",
    "Url",
    "App Url",
    "Used in item codenames",
];

fn writer() -> Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| e.into_error())
        .into_diagnostic()
}

pub fn unused_assets_csv(records: &[UnusedAssetRecord]) -> Result<Vec<u8>> {
    let mut csv = writer();
    csv.write_record(UNUSED_HEADERS).into_diagnostic()?;

    for record in records {
        csv.write_record([
            &record.id,
            &record.title,
            &record.codename,
            &record.filename,
            &record.url,
            &record.app_url,
        ])
        .into_diagnostic()?;
    }

    finish(csv)
}

pub fn duplicate_assets_csv(records: &[DuplicateAssetCsvRecord]) -> Result<Vec<u8>> {
    let mut csv = writer();
    csv.write_record(DUPLICATE_HEADERS).into_diagnostic()?;

    for record in records {
        let used_in = record.used_in_item_codenames.join(",");
        csv.write_record([
            &record.shared_filename,
            &record.id,
            &record.title,
            &record.codename,
            &record.filename,
            &record.url,
            &record.app_url,
            &used_in,
        ])
        .into_diagnostic()?;
    }

    finish(csv)
}
