use super::DuplicateAssetJsonRecord;
use crate::analysis::UnusedAssetRecord;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;

fn to_json<T: Serialize + ?Sized>(value: &T, pretty: bool) -> Result<Vec<u8>> {
    if pretty {
        serde_json::to_vec_pretty(value).into_diagnostic()
    } else {
        serde_json::to_vec(value).into_diagnostic()
    }
}

/// JSON array of `{id, title, codename, filename, url, appUrl}`
pub fn unused_assets_json(records: &[UnusedAssetRecord], pretty: bool) -> Result<Vec<u8>> {
    to_json(records, pretty)
}

/// JSON array of `{sharedFilename, duplicateAssets: [...]}`
pub fn duplicate_assets_json(records: &[DuplicateAssetJsonRecord], pretty: bool) -> Result<Vec<u8>> {
    to_json(records, pretty)
}
