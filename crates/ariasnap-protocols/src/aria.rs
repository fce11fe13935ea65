//! Accessible role/name capability.

use serde::{Deserialize, Serialize};

use crate::dom::DomView;
use crate::error::DomError;
use crate::types::NodeId;

/// Tri-state value of `aria-checked` / `aria-pressed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckedState {
    True,
    False,
    Mixed,
}

/// Accessibility state and properties of one element.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AriaAttributes {
    pub checked: Option<CheckedState>,
    pub disabled: bool,
    pub expanded: Option<bool>,
    pub level: Option<u32>,
    pub pressed: Option<CheckedState>,
    pub selected: bool,
    /// Link target.
    pub url: Option<String>,
}

/// Computes ARIA semantics for elements of one host engine.
///
/// Implementations own the platform-specific role and accessible-name rules;
/// the snapshot pipeline only consumes their results.
pub trait AriaProvider: Send + Sync {
    /// ARIA role of an element. `None` when the element has no meaningful role.
    /// `Some("none")` and `Some("presentation")` remove the element itself while
    /// keeping its children.
    fn role(&self, dom: &dyn DomView, element: NodeId) -> Result<Option<String>, DomError>;

    fn accessible_name(&self, dom: &dyn DomView, element: NodeId) -> Result<String, DomError>;

    fn attributes(&self, dom: &dyn DomView, element: NodeId) -> Result<AriaAttributes, DomError>;

    /// Element and its subtree are excluded from the accessibility tree.
    fn is_hidden(&self, dom: &dyn DomView, element: NodeId) -> Result<bool, DomError>;
}
