//! Frame availability errors.

use thiserror::Error;

use super::DomError;

/// A frame could not serve a document task.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("Frame detached")]
    Detached,

    #[error("Frame crashed: {0}")]
    Crashed(String),

    /// The frame exists but has no document to read yet.
    #[error("Frame not loaded")]
    NotLoaded,

    #[error("Frame did not respond before the deadline")]
    Timeout,

    #[error("DOM error: {0}")]
    Dom(#[from] DomError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_error_from_dom() {
        let err = FrameError::from(DomError::Detached);
        assert_eq!(err, FrameError::Dom(DomError::Detached));
        assert_eq!(err.to_string(), "DOM error: Document detached");
    }

    #[test]
    fn test_frame_error_display() {
        let errors = vec![
            FrameError::Detached,
            FrameError::Crashed("oom".to_string()),
            FrameError::NotLoaded,
            FrameError::Timeout,
        ];
        for err in errors {
            assert!(!err.to_string().is_empty());
        }
    }
}
