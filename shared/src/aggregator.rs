/// Download-counts aggregation across every published release.
///
/// Sums per-asset download counters over the whole release history, credits
/// retired asset names to their successors, and indexes the latest release's
/// live download links.
use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::config::{AggregatorConfig, LegacyRename};
use crate::errors::AggregateError;
use crate::github::ReleaseSource;
use crate::models::{AggregateTotals, DownloadCounts, LatestAsset, LatestAssetIndex, Release};

/// Builds [`DownloadCounts`] snapshots from a [`ReleaseSource`].
#[derive(Clone)]
pub struct ReleaseAggregator {
    source: Arc<dyn ReleaseSource>,
    config: AggregatorConfig,
}

impl ReleaseAggregator {
    pub fn new(source: Arc<dyn ReleaseSource>, config: AggregatorConfig) -> Self {
        Self { source, config }
    }

    /// Produce a fresh snapshot.
    ///
    /// Runs on its own task so a panic anywhere in the aggregation surfaces
    /// as [`AggregateError::Failed`] instead of tearing down the caller.
    pub async fn download_counts(&self) -> Result<DownloadCounts, AggregateError> {
        let this = self.clone();
        match tokio::spawn(async move { this.collect().await }).await {
            Ok(result) => result,
            Err(e) => {
                error!("Download counts task aborted: {}", e);
                Err(AggregateError::Failed(e.to_string()))
            }
        }
    }

    async fn collect(&self) -> Result<DownloadCounts, AggregateError> {
        let (latest, releases) = tokio::join!(
            self.source.latest_release(),
            fetch_all_releases(
                self.source.as_ref(),
                self.config.page_size,
                self.config.page_cap
            ),
        );

        let latest = latest.map_err(|e| {
            warn!("Latest release read failed: {}", e);
            AggregateError::from_latest(e)
        })?;

        let mut totals = sum_totals(&releases);
        apply_legacy_renames(&mut totals, &self.config.renames);
        let latest_assets = index_latest(&latest);

        info!(
            "Aggregated {} releases into {} asset totals ({} latest assets)",
            releases.len(),
            totals.len(),
            latest_assets.len()
        );

        Ok(DownloadCounts {
            totals,
            latest_assets,
        })
    }
}

/// Sequential sweep over the paginated release listing.
///
/// Stops on a short page, on the first failed page (keeping what was already
/// collected), or once `page_cap` pages have been fetched.
pub async fn fetch_all_releases(
    source: &dyn ReleaseSource,
    page_size: usize,
    page_cap: u32,
) -> Vec<Release> {
    let mut releases = Vec::new();

    for page in 1..=page_cap {
        let batch = match source.list_releases(page_size, page).await {
            Ok(batch) => batch,
            Err(e) => {
                warn!(
                    "Release sweep stopped at page {} (status {:?}, {} releases kept): {}",
                    page,
                    e.status(),
                    releases.len(),
                    e
                );
                break;
            }
        };

        let full = batch.len() >= page_size;
        releases.extend(batch);
        if !full {
            debug!("Release sweep finished after {} pages", page);
            break;
        }
        if page == page_cap {
            warn!("Release sweep hit the {} page cap", page_cap);
        }
    }

    releases
}

/// Sum `download_count` per asset name over all releases.
pub fn sum_totals(releases: &[Release]) -> AggregateTotals {
    let mut totals = AggregateTotals::new();
    for asset in releases.iter().flat_map(|r| r.assets.iter()) {
        *totals.entry(asset.name.clone()).or_insert(0) += asset.download_count;
    }
    totals
}

/// Credit each retired asset's total to its successor names.
///
/// The legacy entry itself is left as is. Names with a zero or missing total
/// contribute nothing.
pub fn apply_legacy_renames(totals: &mut AggregateTotals, renames: &[LegacyRename]) {
    for rename in renames {
        let legacy_total = totals.get(&rename.legacy).copied().unwrap_or(0);
        if legacy_total == 0 {
            continue;
        }
        for successor in &rename.successors {
            *totals.entry(successor.clone()).or_insert(0) += legacy_total;
        }
    }
}

/// Index the latest release's assets by name.
pub fn index_latest(latest: &Release) -> LatestAssetIndex {
    latest
        .assets
        .iter()
        .map(|asset| {
            (
                asset.name.clone(),
                LatestAsset {
                    url: asset.browser_download_url.clone(),
                    download_count: asset.download_count,
                },
            )
        })
        .collect()
}
