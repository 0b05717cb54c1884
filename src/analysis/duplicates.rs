//! Duplicate asset grouping
//!
//! Assets are duplicates when they share the exact (case-sensitive) file name.
//! Grouping rescans the asset list for every filename not yet grouped, which is
//! quadratic in the number of assets. That is fine for content repositories
//! (hundreds to a few thousand assets) but not for much larger corpora.

use std::collections::HashSet;

use super::{AssetUsageSite, IntegrityError, Progress, Stage, UsageIndex};
use crate::model::Asset;

/// One member of a duplicate group together with where it is used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAssetUsage {
    pub asset: Asset,
    pub used_in: Vec<AssetUsageSite>,
}

/// All assets sharing one filename; always at least two members
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateAssetGroup {
    pub shared_filename: String,
    pub members: Vec<DuplicateAssetUsage>,
}

impl DuplicateAssetGroup {
    pub fn asset_ids(&self) -> impl Iterator<Item = &str> {
        self.members.iter().map(|m| m.asset.id.as_str())
    }
}

/// Group assets sharing a filename, in order of each filename's first asset
pub fn find_duplicates(
    assets: &[Asset],
    usage: &UsageIndex<'_>,
    progress: &dyn Progress,
) -> Result<Vec<DuplicateAssetGroup>, IntegrityError> {
    let mut groups = Vec::new();
    let mut grouped_filenames: HashSet<&str> = HashSet::new();

    progress.start(Stage::CheckingDuplicates, assets.len());

    for asset in assets {
        progress.advance(&asset.file_name);

        // Already emitted as a member of an earlier group
        if grouped_filenames.contains(asset.file_name.as_str()) {
            continue;
        }

        let same_filename: Vec<&Asset> = assets
            .iter()
            .filter(|other| other.id != asset.id)
            .filter(|other| other.file_name == asset.file_name)
            .collect();

        if same_filename.is_empty() {
            continue;
        }

        let members = std::iter::once(asset)
            .chain(same_filename)
            .map(|member| -> Result<DuplicateAssetUsage, IntegrityError> {
                Ok(DuplicateAssetUsage {
                    asset: member.clone(),
                    used_in: usage.find_usage_sites(member)?,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        grouped_filenames.insert(asset.file_name.as_str());
        groups.push(DuplicateAssetGroup {
            shared_filename: asset.file_name.clone(),
            members,
        });
    }

    progress.finish();
    Ok(groups)
}
