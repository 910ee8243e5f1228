/// Error types for the VidGrab site backend.
use thiserror::Error;

/// Errors from a single call against the release-hosting API.
#[derive(Debug, Error)]
pub enum UpstreamError {
    /// The call completed with a non-success HTTP status.
    #[error("Upstream returned HTTP {status}")]
    Status { status: u16, body: String },

    /// The request never produced a response (connect failure, timeout, ...).
    #[error("Upstream request failed: {0}")]
    Transport(String),

    /// The response body was not the JSON shape we expected.
    #[error("Upstream returned invalid JSON: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// HTTP status carried by the error, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            UpstreamError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UpstreamError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            UpstreamError::Decode(e.to_string())
        } else {
            UpstreamError::Transport(e.to_string())
        }
    }
}

/// Fatal outcomes of the download-counts aggregation.
#[derive(Debug, Error)]
pub enum AggregateError {
    /// The latest-release read answered with a non-success status.
    #[error("Latest release unavailable (HTTP {status})")]
    LatestUnavailable { status: u16, detail: String },

    /// Anything else. Carries an internal reason for logs only.
    #[error("Aggregation failed: {0}")]
    Failed(String),
}

impl AggregateError {
    /// Classify a failed latest-release read.
    ///
    /// Only a status answer is reported as "unavailable"; transport and
    /// decode faults become a generic failure.
    pub fn from_latest(err: UpstreamError) -> Self {
        match err {
            UpstreamError::Status { status, body } => AggregateError::LatestUnavailable {
                status,
                detail: body,
            },
            other => AggregateError::Failed(other.to_string()),
        }
    }
}

/// Invalid configuration values.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {key}: {reason}")]
    Invalid { key: &'static str, reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latest_status_maps_to_unavailable() {
        let err = AggregateError::from_latest(UpstreamError::Status {
            status: 404,
            body: "Not Found".into(),
        });
        match err {
            AggregateError::LatestUnavailable { status, detail } => {
                assert_eq!(status, 404);
                assert_eq!(detail, "Not Found");
            }
            other => panic!("Expected LatestUnavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_latest_transport_maps_to_failed() {
        let err = AggregateError::from_latest(UpstreamError::Transport("timed out".into()));
        assert!(matches!(err, AggregateError::Failed(_)));
    }

    #[test]
    fn test_upstream_status_accessor() {
        let err = UpstreamError::Status { status: 503, body: String::new() };
        assert_eq!(err.status(), Some(503));
        assert_eq!(UpstreamError::Decode("x".into()).status(), None);
    }
}
