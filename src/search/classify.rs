//! Classification of yt-dlp failure messages

use crate::extractor::BackendFailure;
use crate::utils::error::YtSearchError;

const NETWORK_MARKERS: &[&str] = &[
    "timeout",
    "timed out",
    "unable to download",
    "connection",
    "network",
    "temporary failure",
    "http error 5",
];

const UNAVAILABLE_MARKERS: &[&str] = &[
    "video unavailable",
    "private video",
    "has been removed",
    "not available",
    "does not exist",
    "account associated",
    "members-only",
    "playlist does not exist",
];

/// Transient network failure
pub fn is_network_error(message: &str) -> bool {
    let lower = message.to_lowercase();
    NETWORK_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// The requested video or playlist cannot be accessed
pub fn is_video_unavailable(message: &str) -> bool {
    let lower = message.to_lowercase();
    UNAVAILABLE_MARKERS.iter().any(|marker| lower.contains(marker))
}

/// Map a backend failure onto the error taxonomy.
///
/// `unavailable` builds the error for inaccessible media (`None` to treat it
/// like any other failure), `other` the error for everything unclassified.
pub fn classify_failure(
    failure: BackendFailure,
    unavailable: Option<fn(String) -> YtSearchError>,
    other: fn(String) -> YtSearchError,
) -> YtSearchError {
    if matches!(failure, BackendFailure::NotInstalled) {
        return YtSearchError::YtDlpNotFound;
    }

    let message = failure.to_string();
    if let Some(unavailable) = unavailable {
        if is_video_unavailable(&message) {
            return unavailable(message);
        }
    }
    if is_network_error(&message) {
        return YtSearchError::Network(message);
    }
    other(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_network_errors() {
        assert!(is_network_error("Connection timeout"));
        assert!(is_network_error("ERROR: Unable to download webpage"));
        assert!(is_network_error("Connection refused"));
        assert!(is_network_error("HTTP Error 503: Service Unavailable"));
        assert!(is_network_error("Temporary failure in name resolution"));
        assert!(!is_network_error("Private video"));
    }

    #[test]
    fn test_unavailable_errors() {
        assert!(is_video_unavailable("Private video"));
        assert!(is_video_unavailable("Video has been removed"));
        assert!(is_video_unavailable("ERROR: [youtube] abc: Video unavailable"));
        assert!(is_video_unavailable("This video is not available in your country"));
        assert!(is_video_unavailable("Join this channel to get access to members-only content"));
        assert!(!is_video_unavailable("Network timeout"));
    }

    #[test]
    fn test_classify_unavailable_before_network() {
        let err = classify_failure(
            BackendFailure::Failed {
                message: "Video unavailable: connection reset".to_string(),
            },
            Some(YtSearchError::VideoNotFound),
            YtSearchError::SearchProvider,
        );
        assert!(matches!(err, YtSearchError::VideoNotFound(_)));
    }

    #[test]
    fn test_classify_without_unavailable_mapping() {
        let err = classify_failure(
            BackendFailure::Failed {
                message: "Private video".to_string(),
            },
            None,
            YtSearchError::SearchProvider,
        );
        assert!(matches!(err, YtSearchError::SearchProvider(_)));
    }

    #[test]
    fn test_classify_timeout_and_missing_binary() {
        let err = classify_failure(
            BackendFailure::Timeout(Duration::from_secs(30)),
            None,
            YtSearchError::Download,
        );
        assert!(matches!(err, YtSearchError::Network(_)));

        let err = classify_failure(BackendFailure::NotInstalled, None, YtSearchError::Download);
        assert!(matches!(err, YtSearchError::YtDlpNotFound));
    }

    #[test]
    fn test_classify_other() {
        let err = classify_failure(
            BackendFailure::InvalidOutput("garbage".to_string()),
            Some(YtSearchError::VideoNotFound),
            YtSearchError::Download,
        );
        assert!(matches!(err, YtSearchError::Download(_)));
    }
}
