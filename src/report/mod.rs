mod csv;
mod json;
mod terminal;

pub use self::csv::{duplicate_assets_csv, unused_assets_csv};
pub use json::{duplicate_assets_json, unused_assets_json};
pub use terminal::TerminalReporter;

use crate::analysis::{AppUrlBuilder, AssetUsageSite, DuplicateAssetGroup, UnusedAssetRecord};
use crate::config::Config;
use miette::{IntoDiagnostic, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tracing::{info, warn};

/// One duplicate group as written to the JSON report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAssetJsonRecord {
    pub shared_filename: String,
    pub duplicate_assets: Vec<DuplicateAssetEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateAssetEntry {
    pub id: String,
    pub title: String,
    pub codename: String,
    pub filename: String,
    pub url: String,
    pub app_url: String,
    pub used_in: Vec<AssetUsageSite>,
}

/// One duplicate asset as written to the CSV report
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAssetCsvRecord {
    pub shared_filename: String,
    pub id: String,
    pub title: String,
    pub codename: String,
    pub filename: String,
    pub url: String,
    pub app_url: String,
    pub used_in_item_codenames: Vec<String>,
}

/// Everything one audit run reports
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AuditReport {
    pub unused_assets: Vec<UnusedAssetRecord>,
    pub duplicate_assets: Vec<DuplicateAssetJsonRecord>,
}

impl AuditReport {
    pub fn new(
        unused_assets: Vec<UnusedAssetRecord>,
        groups: &[DuplicateAssetGroup],
        app_urls: &AppUrlBuilder,
    ) -> Self {
        let duplicate_assets = groups
            .iter()
            .map(|group| DuplicateAssetJsonRecord {
                shared_filename: group.shared_filename.clone(),
                duplicate_assets: group
                    .members
                    .iter()
                    .map(|member| DuplicateAssetEntry {
                        id: member.asset.id.clone(),
                        title: member.asset.title.clone().unwrap_or_default(),
                        codename: member.asset.codename.clone(),
                        filename: member.asset.file_name.clone(),
                        url: member.asset.url.clone(),
                        app_url: app_urls.asset_url(&member.asset),
                        used_in: member.used_in.clone(),
                    })
                    .collect(),
            })
            .collect();

        Self {
            unused_assets,
            duplicate_assets,
        }
    }

    /// Flatten duplicate groups into one CSV row per asset
    pub fn duplicate_csv_records(&self) -> Vec<DuplicateAssetCsvRecord> {
        self.duplicate_assets
            .iter()
            .flat_map(|group| {
                group.duplicate_assets.iter().map(|asset| DuplicateAssetCsvRecord {
                    shared_filename: group.shared_filename.clone(),
                    id: asset.id.clone(),
                    title: asset.title.clone(),
                    codename: asset.codename.clone(),
                    filename: asset.filename.clone(),
                    url: asset.url.clone(),
                    app_url: asset.app_url.clone(),
                    used_in_item_codenames: asset
                        .used_in
                        .iter()
                        .map(|site| site.item_codename.clone())
                        .collect(),
                })
            })
            .collect()
    }
}

/// A report file rendered in memory
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub path: PathBuf,
    pub contents: Vec<u8>,
}

/// Writes the CSV and JSON reports of an audit
///
/// Either all four files end up in the output directory or none of them do:
/// reports are rendered in memory, staged as temporary files in the output
/// directory, and only then renamed into place.
pub struct ReportWriter {
    output_dir: PathBuf,
    unused_csv: PathBuf,
    unused_json: PathBuf,
    duplicate_csv: PathBuf,
    duplicate_json: PathBuf,
    pretty_json: bool,
}

impl ReportWriter {
    pub fn new(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            unused_csv: config.unused_assets_path("csv"),
            unused_json: config.unused_assets_path("json"),
            duplicate_csv: config.duplicate_assets_path("csv"),
            duplicate_json: config.duplicate_assets_path("json"),
            pretty_json: config.pretty_json,
        }
    }

    pub fn render(&self, report: &AuditReport) -> Result<Vec<RenderedReport>> {
        let duplicate_rows = report.duplicate_csv_records();

        Ok(vec![
            RenderedReport {
                path: self.unused_csv.clone(),
                contents: unused_assets_csv(&report.unused_assets)?,
            },
            RenderedReport {
                path: self.unused_json.clone(),
                contents: unused_assets_json(&report.unused_assets, self.pretty_json)?,
            },
            RenderedReport {
                path: self.duplicate_csv.clone(),
                contents: duplicate_assets_csv(&duplicate_rows)?,
            },
            RenderedReport {
                path: self.duplicate_json.clone(),
                contents: duplicate_assets_json(&report.duplicate_assets, self.pretty_json)?,
            },
        ])
    }

    /// Render and write all reports, returning the written paths
    pub fn write(&self, report: &AuditReport) -> Result<Vec<PathBuf>> {
        let rendered = self.render(report)?;

        std::fs::create_dir_all(&self.output_dir)
            .into_diagnostic()
            .wrap_err_with(|| {
                format!(
                    "Failed to create output directory {}",
                    self.output_dir.display()
                )
            })?;

        // Stage everything first; unpersisted temp files are removed on drop
        let mut staged = Vec::with_capacity(rendered.len());
        for file in rendered {
            let temp = self
                .stage(&file.contents)
                .wrap_err_with(|| format!("Failed to write {}", file.path.display()))?;
            staged.push((temp, file.path));
        }

        let mut written: Vec<PathBuf> = Vec::with_capacity(staged.len());
        for (temp, path) in staged {
            if let Err(e) = temp.persist(&path) {
                Self::remove_written(&written);
                return Err(e.error)
                    .into_diagnostic()
                    .wrap_err_with(|| format!("Failed to write {}", path.display()));
            }
            info!("File '{}' successfully created", path.display());
            written.push(path);
        }

        Ok(written)
    }

    fn stage(&self, contents: &[u8]) -> Result<NamedTempFile> {
        let mut temp = tempfile::Builder::new()
            .prefix(".assetaudit-")
            .suffix(".tmp")
            .tempfile_in(&self.output_dir)
            .into_diagnostic()?;
        temp.write_all(contents).into_diagnostic()?;
        temp.flush().into_diagnostic()?;
        Ok(temp)
    }

    /// Roll back reports already moved into place
    fn remove_written(written: &[PathBuf]) {
        for path in written {
            if let Err(e) = std::fs::remove_file(path) {
                warn!("Failed to remove partial report {}: {}", path.display(), e);
            }
        }
    }
}
