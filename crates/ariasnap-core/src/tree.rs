//! Accessibility tree data model.

use ariasnap_protocols::{AriaAttributes, NodeId};
use serde::{Deserialize, Serialize};

use crate::geometry::{ElementBox, ViewportPosition};

/// A child of an [`AriaNode`]: a text run or another node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AriaChild {
    Text(String),
    Node(AriaNode),
}

/// One node of a captured accessibility tree.
///
/// Iframe nodes carry the root of their frame's tree as their only child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AriaNode {
    pub role: String,
    pub name: String,
    #[serde(default)]
    pub attributes: AriaAttributes,
    #[serde(default)]
    pub children: Vec<AriaChild>,
    /// Stable reference, present on ref-eligible nodes.
    #[serde(rename = "ref", default, skip_serializing_if = "Option::is_none")]
    pub aria_ref: Option<String>,
    #[serde(default)]
    pub active: bool,
    /// Pointer cursor not already implied by an ancestor.
    #[serde(default)]
    pub cursor_pointer: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub viewport: Option<ViewportPosition>,

    #[serde(skip)]
    pub(crate) element_box: ElementBox,
    #[serde(skip)]
    pub(crate) element: Option<NodeId>,
    /// Index into the frame's iframe slots.
    #[serde(skip)]
    pub(crate) frame_slot: Option<usize>,
    #[serde(skip)]
    pub(crate) ref_eligible: bool,
    /// The document's focused element, not the fallback root.
    #[serde(skip)]
    pub(crate) focused: bool,
}

impl AriaNode {
    pub fn new(role: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            name: name.into(),
            attributes: AriaAttributes::default(),
            children: Vec::new(),
            aria_ref: None,
            active: false,
            cursor_pointer: false,
            viewport: None,
            element_box: ElementBox::default(),
            element: None,
            frame_slot: None,
            ref_eligible: false,
            focused: false,
        }
    }

    pub fn is_iframe(&self) -> bool {
        self.role == "iframe"
    }

    pub fn is_generic(&self) -> bool {
        self.role == "generic"
    }

    /// Layout facts the node was classified with.
    pub fn element_box(&self) -> &ElementBox {
        &self.element_box
    }

    /// Child nodes, skipping text runs.
    pub fn child_nodes(&self) -> impl Iterator<Item = &AriaNode> {
        self.children.iter().filter_map(|child| match child {
            AriaChild::Node(node) => Some(node),
            AriaChild::Text(_) => None,
        })
    }

    /// Every node of the subtree in pre-order, including `self`.
    pub fn descendants(&self) -> Vec<&AriaNode> {
        let mut result = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            result.push(node);
            let mut children: Vec<&AriaNode> = node.child_nodes().collect();
            children.reverse();
            stack.extend(children);
        }
        result
    }

    /// First node in pre-order carrying `aria_ref`.
    pub fn find_ref(&self, aria_ref: &str) -> Option<&AriaNode> {
        self.descendants()
            .into_iter()
            .find(|node| node.aria_ref.as_deref() == Some(aria_ref))
    }

    /// Rendered attributes other than the ref and the children match.
    pub fn same_attributes(&self, other: &AriaNode) -> bool {
        self.role == other.role
            && self.name == other.name
            && self.attributes == other.attributes
            && self.active == other.active
            && self.cursor_pointer == other.cursor_pointer
            && self.viewport == other.viewport
    }
}
