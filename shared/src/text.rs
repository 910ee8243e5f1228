/// Inline text segmentation for release notes and FAQ copy.
///
/// Detects URLs (to render as links) and video-quality keywords (to render as
/// badges). Rendering is left to the frontend; we only hand back segments.
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// Quality keywords highlighted as badges.
pub const QUALITY_OPTIONS: &[&str] = &["best", "1080p", "720p", "480p", "audio-only"];

/// One run of inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Segment {
    Text { text: String },
    /// `text` is what was written, `href` always carries a scheme.
    Link { text: String, href: String },
    Quality { text: String },
}

impl Segment {
    fn text(s: &str) -> Self {
        Segment::Text { text: s.to_string() }
    }

    /// The literal text covered by this segment.
    pub fn as_str(&self) -> &str {
        match self {
            Segment::Text { text } => text,
            Segment::Link { text, .. } => text,
            Segment::Quality { text } => text,
        }
    }
}

// ====== REGEX PATTERNS ======

static URL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"https?://\S+|www\.\S+|github\.com/\S+").unwrap()
});

static QUALITY_RE: Lazy<Regex> = Lazy::new(|| {
    let alternatives: Vec<String> = QUALITY_OPTIONS.iter().map(|q| regex::escape(q)).collect();
    // ASCII word boundaries: "ébest" still highlights "best".
    Regex::new(&format!(r"(?i)(?-u:\b)(?:{})(?-u:\b)", alternatives.join("|"))).unwrap()
});

/// Split `text` around every match of `re`, mapping matches with `on_match`.
fn split_with<F>(text: &str, re: &Regex, on_match: F) -> Vec<Segment>
where
    F: Fn(&str) -> Segment,
{
    let mut parts = Vec::new();
    let mut last = 0;

    for m in re.find_iter(text) {
        if m.start() > last {
            parts.push(Segment::text(&text[last..m.start()]));
        }
        parts.push(on_match(m.as_str()));
        last = m.end();
    }

    if last < text.len() {
        parts.push(Segment::text(&text[last..]));
    }

    if parts.is_empty() {
        parts.push(Segment::text(text));
    }
    parts
}

/// Turn bare URLs into link segments.
pub fn split_links(text: &str) -> Vec<Segment> {
    split_with(text, &URL_RE, |found| {
        let href = if found.starts_with("http://") || found.starts_with("https://") {
            found.to_string()
        } else {
            format!("https://{}", found)
        };
        Segment::Link { text: found.to_string(), href }
    })
}

/// Mark quality keywords (whole words, any case).
pub fn split_quality(text: &str) -> Vec<Segment> {
    split_with(text, &QUALITY_RE, |found| Segment::Quality { text: found.to_string() })
}

/// Quality keywords first, then links inside the remaining plain text.
pub fn segment(text: &str) -> Vec<Segment> {
    split_quality(text)
        .into_iter()
        .flat_map(|part| match part {
            Segment::Text { text } => split_links(&text),
            other => vec![other],
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_is_single_segment() {
        let parts = split_links("Nothing to see here");
        assert_eq!(parts, vec![Segment::text("Nothing to see here")]);
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(segment(""), vec![Segment::text("")]);
    }

    #[test]
    fn test_https_link() {
        let parts = split_links("See https://github.com/ellaboevans/vidgrab/releases for builds");
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], Segment::text("See "));
        assert_eq!(
            parts[1],
            Segment::Link {
                text: "https://github.com/ellaboevans/vidgrab/releases".into(),
                href: "https://github.com/ellaboevans/vidgrab/releases".into(),
            }
        );
        assert_eq!(parts[2], Segment::text(" for builds"));
    }

    #[test]
    fn test_scheme_added_for_www_and_github() {
        let parts = split_links("www.example.com and github.com/yt-dlp/yt-dlp");
        let links: Vec<_> = parts
            .iter()
            .filter_map(|p| match p {
                Segment::Link { text, href } => Some((text.as_str(), href.as_str())),
                _ => None,
            })
            .collect();
        assert_eq!(
            links,
            vec![
                ("www.example.com", "https://www.example.com"),
                ("github.com/yt-dlp/yt-dlp", "https://github.com/yt-dlp/yt-dlp"),
            ]
        );
    }

    #[test]
    fn test_quality_whole_words_only() {
        let parts = split_quality("Pick 1080p or Best; not 1080px or bestest");
        let badges: Vec<_> = parts
            .iter()
            .filter(|p| matches!(p, Segment::Quality { .. }))
            .map(|p| p.as_str())
            .collect();
        assert_eq!(badges, vec!["1080p", "Best"]);
    }

    #[test]
    fn test_quality_boundary_is_ascii() {
        let parts = split_quality("ébest");
        assert_eq!(
            parts,
            vec![Segment::text("é"), Segment::Quality { text: "best".into() }]
        );
    }

    #[test]
    fn test_audio_only_keyword() {
        let parts = split_quality("Choose audio-only for music");
        assert_eq!(parts[1], Segment::Quality { text: "audio-only".into() });
    }

    #[test]
    fn test_segment_combines_passes() {
        let parts = segment("Download 720p from https://vidgrab.app now");
        assert_eq!(
            parts,
            vec![
                Segment::text("Download "),
                Segment::Quality { text: "720p".into() },
                Segment::text(" from "),
                Segment::Link { text: "https://vidgrab.app".into(), href: "https://vidgrab.app".into() },
                Segment::text(" now"),
            ]
        );
    }

    #[test]
    fn test_segments_cover_input() {
        let input = "best quality at www.vidgrab.app, 480p fallback";
        let joined: String = segment(input).iter().map(|s| s.as_str()).collect();
        assert_eq!(joined, input);
    }

    #[test]
    fn test_segment_serializes_with_kind() {
        let json = serde_json::to_value(Segment::Quality { text: "best".into() }).unwrap();
        assert_eq!(json, serde_json::json!({ "kind": "quality", "text": "best" }));
    }
}
