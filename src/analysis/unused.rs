use serde::{Deserialize, Serialize};

use super::{Progress, Stage, UsageIndex};
use crate::model::Asset;

/// Builds deep links to assets in the Kontent.ai web app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppUrlBuilder {
    host: String,
    environment_id: String,
}

impl AppUrlBuilder {
    /// `host` is the bare domain, e.g. `kontent.ai`; links point to `app.<host>`
    pub fn new(host: impl Into<String>, environment_id: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            environment_id: environment_id.into(),
        }
    }

    pub fn asset_url(&self, asset: &Asset) -> String {
        format!(
            "https://app.{}/{}/content-inventory/assets/asset/{}",
            self.host, self.environment_id, asset.id
        )
    }
}

/// An asset referenced by no language variant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnusedAssetRecord {
    pub id: String,
    pub title: String,
    pub codename: String,
    pub filename: String,
    pub url: String,
    pub app_url: String,
}

impl UnusedAssetRecord {
    pub fn new(asset: &Asset, app_urls: &AppUrlBuilder) -> Self {
        Self {
            id: asset.id.clone(),
            title: asset.title.clone().unwrap_or_default(),
            codename: asset.codename.clone(),
            filename: asset.file_name.clone(),
            url: asset.url.clone(),
            app_url: app_urls.asset_url(asset),
        }
    }
}

/// Assets whose id appears in no element value of any variant, in input order
pub fn find_unused(
    assets: &[Asset],
    usage: &UsageIndex<'_>,
    app_urls: &AppUrlBuilder,
    progress: &dyn Progress,
) -> Vec<UnusedAssetRecord> {
    progress.start(Stage::CheckingUnused, assets.len());

    let unused = assets
        .iter()
        .filter(|asset| {
            progress.advance(&asset.file_name);
            !usage.is_used(asset)
        })
        .map(|asset| UnusedAssetRecord::new(asset, app_urls))
        .collect();

    progress.finish();
    unused
}
