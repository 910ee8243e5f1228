/// Release and repository models shared across the VidGrab site crates.
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A downloadable file attached to a release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    pub name: String,
    pub browser_download_url: String,
    #[serde(default)]
    pub download_count: u64,
    #[serde(default)]
    pub size: u64,
}

/// A published release. Only the fields the site displays.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub tag_name: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub published_at: Option<String>,
    #[serde(default)]
    pub prerelease: bool,
    #[serde(default)]
    pub draft: bool,
    /// Missing or null upstream arrays are treated as empty.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub assets: Vec<Asset>,
}

impl Release {
    /// Display title: release name, or the tag when the name is blank.
    pub fn title(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => &self.tag_name,
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<Asset>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<Vec<Asset>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Repository metadata used by the star button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub stargazers_count: u64,
}

/// Live link and counter for one asset of the latest release.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LatestAsset {
    pub url: String,
    pub download_count: u64,
}

/// Cumulative downloads per asset name, across every release.
pub type AggregateTotals = BTreeMap<String, u64>;

/// Assets of the latest release keyed by name.
pub type LatestAssetIndex = BTreeMap<String, LatestAsset>;

/// Payload of the download-counts endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadCounts {
    pub totals: AggregateTotals,
    #[serde(rename = "latestAssets")]
    pub latest_assets: LatestAssetIndex,
}
