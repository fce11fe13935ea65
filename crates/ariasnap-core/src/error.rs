//! Snapshot engine errors.

use std::time::Duration;

use ariasnap_config::ConfigError;
use ariasnap_protocols::FrameError;
use thiserror::Error;

/// Errors surfaced by [`Snapshotter`](crate::Snapshotter).
#[derive(Debug, Error)]
pub enum SnapshotError {
    /// The ref was never issued, or its element is gone.
    #[error("No element matching aria-ref={0}")]
    UnknownRef(String),

    /// The main frame could not be captured.
    #[error("Frame error: {0}")]
    Frame(#[from] FrameError),

    /// The main frame did not answer before the capture deadline.
    #[error("Snapshot timed out after {0:?}")]
    Timeout(Duration),

    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

#[cfg(test)]
mod tests {
    use super::*;
    use ariasnap_protocols::DomError;

    #[test]
    fn test_unknown_ref_display() {
        let err = SnapshotError::UnknownRef("f1e7".to_string());
        assert_eq!(err.to_string(), "No element matching aria-ref=f1e7");
    }

    #[test]
    fn test_frame_error_from() {
        let err: SnapshotError = FrameError::Dom(DomError::Detached).into();
        assert!(matches!(err, SnapshotError::Frame(FrameError::Dom(DomError::Detached))));
        assert_eq!(err.to_string(), "Frame error: DOM error: Document detached");
    }

    #[test]
    fn test_config_error_display() {
        let err: SnapshotError = ConfigError::InvalidValue {
            field: "tracks.max_tracks".to_string(),
            message: "max_tracks must be greater than 0".to_string(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            "Invalid configuration: Invalid value for tracks.max_tracks: \
             max_tracks must be greater than 0"
        );
    }

    #[test]
    fn test_timeout_display() {
        let err = SnapshotError::Timeout(Duration::from_millis(250));
        assert_eq!(err.to_string(), "Snapshot timed out after 250ms");
    }
}
