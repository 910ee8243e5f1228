/// Release-notes parsing and display formatting for the changelog page.
use serde::Serialize;

use crate::models::Release;
use crate::text::{segment, Segment};

/// One line of release notes, classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NoteBlock {
    Heading { content: Vec<Segment> },
    ListItem { content: Vec<Segment> },
    Paragraph { content: Vec<Segment> },
    Spacer,
}

/// Classify each line of a markdown-ish release body.
///
/// Only `## ` headings and `- ` bullets are recognised; everything else is a
/// paragraph, and blank lines become spacers.
pub fn parse_notes(body: &str) -> Vec<NoteBlock> {
    body.lines()
        .map(|line| {
            if let Some(rest) = line.strip_prefix("## ") {
                NoteBlock::Heading { content: segment(rest) }
            } else if let Some(rest) = line.strip_prefix("- ") {
                NoteBlock::ListItem { content: segment(rest) }
            } else if line.trim().is_empty() {
                NoteBlock::Spacer
            } else {
                NoteBlock::Paragraph { content: segment(line) }
            }
        })
        .collect()
}

/// Human-readable size, base 1024, at most two decimals.
pub fn format_bytes(bytes: u64) -> String {
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    let mut exp = 0;
    while exp < UNITS.len() - 1 && bytes >= 1u64 << (10 * (exp + 1)) {
        exp += 1;
    }
    let value = (bytes as f64 / (1u64 << (10 * exp)) as f64 * 100.0).round() / 100.0;
    format!("{} {}", value, UNITS[exp])
}

/// Compact star count: `999`, `1k`, `1.2k`.
pub fn format_stars(count: u64) -> String {
    if count >= 1000 {
        // Halves round up, so 1250 reads as 1.3k.
        let tenths = (count as f64 / 100.0).round() / 10.0;
        let short = format!("{:.1}", tenths);
        let short = short.strip_suffix(".0").unwrap_or(&short);
        format!("{}k", short)
    } else {
        count.to_string()
    }
}

/// Asset as listed on the changelog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AssetSummary {
    pub name: String,
    pub url: String,
    pub size: String,
    pub download_count: u64,
}

/// Release as listed on the changelog page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseSummary {
    pub id: u64,
    pub title: String,
    pub tag_name: String,
    pub published_at: Option<String>,
    pub prerelease: bool,
    pub notes: Vec<NoteBlock>,
    pub assets: Vec<AssetSummary>,
}

impl From<&Release> for ReleaseSummary {
    fn from(release: &Release) -> Self {
        Self {
            id: release.id,
            title: release.title().to_string(),
            tag_name: release.tag_name.clone(),
            published_at: release.published_at.clone(),
            prerelease: release.prerelease,
            notes: release.body.as_deref().map(parse_notes).unwrap_or_default(),
            assets: release
                .assets
                .iter()
                .map(|a| AssetSummary {
                    name: a.name.clone(),
                    url: a.browser_download_url.clone(),
                    size: format_bytes(a.size),
                    download_count: a.download_count,
                })
                .collect(),
        }
    }
}

/// Published (non-draft) releases in upstream order.
pub fn summarize_releases(releases: &[Release]) -> Vec<ReleaseSummary> {
    releases
        .iter()
        .filter(|r| !r.draft)
        .map(ReleaseSummary::from)
        .collect()
}
