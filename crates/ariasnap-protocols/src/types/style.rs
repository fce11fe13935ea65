//! Computed style values the engine reads.

use serde::{Deserialize, Serialize};

/// A snapshot of the computed style properties relevant to snapshots.
///
/// Values are copied out at read time; a host must not hand out live style
/// objects that keep changing after the read.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedStyle {
    pub display: String,
    pub visibility: String,
    pub cursor: String,
    pub pointer_events: String,
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self {
            display: "inline".to_string(),
            visibility: "visible".to_string(),
            cursor: "auto".to_string(),
            pointer_events: "auto".to_string(),
        }
    }
}

impl ComputedStyle {
    pub fn is_display_contents(&self) -> bool {
        self.display == "contents"
    }

    pub fn is_inline(&self) -> bool {
        self.display == "inline"
    }

    pub fn is_visibility_visible(&self) -> bool {
        self.visibility == "visible"
    }
}
