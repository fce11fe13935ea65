//! Stable element references.
//!
//! Each frame owns a [`RefRegistry`]. A ref stays attached to its element for
//! as long as the element keeps its role and accessible name; a change to
//! either allocates a fresh ref so agents holding the old one notice.

use std::collections::HashMap;
use std::fmt;

use ariasnap_protocols::NodeId;
use tracing::trace;

use crate::tree::{AriaChild, AriaNode};

/// A parsed ref: `e<n>` in the main frame, `f<k>e<n>` in the frame with
/// ordinal `k`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RefId {
    pub frame: u32,
    pub element: u64,
}

impl RefId {
    pub fn parse(value: &str) -> Option<Self> {
        let (frame, element) = match value.strip_prefix('f') {
            Some(rest) => {
                let (frame, element) = rest.split_once('e')?;
                (parse_number(frame)?, element)
            }
            None => (0, value.strip_prefix('e')?),
        };
        if frame == 0 && value.starts_with('f') {
            return None;
        }
        Some(Self {
            frame: u32::try_from(frame).ok()?,
            element: parse_number(element)?,
        })
    }
}

fn parse_number(digits: &str) -> Option<u64> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl fmt::Display for RefId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.frame == 0 {
            write!(f, "e{}", self.element)
        } else {
            write!(f, "f{}e{}", self.frame, self.element)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Fingerprint {
    role: String,
    name: String,
}

#[derive(Debug, Clone)]
struct RefEntry {
    id: RefId,
    fingerprint: Fingerprint,
}

/// Ref allocation and lookup for one frame.
#[derive(Debug)]
pub struct RefRegistry {
    frame: u32,
    last_element: u64,
    entries: HashMap<NodeId, RefEntry>,
    /// Refs handed out by the latest successful capture.
    live: HashMap<RefId, NodeId>,
}

impl RefRegistry {
    /// Registry for the frame with ordinal `frame` (0 for the main frame).
    pub fn new(frame: u32) -> Self {
        Self {
            frame,
            last_element: 0,
            entries: HashMap::new(),
            live: HashMap::new(),
        }
    }

    pub fn frame(&self) -> u32 {
        self.frame
    }

    /// Ref for `node`, reusing the previous one when role and name match.
    pub fn assign(&mut self, node: NodeId, role: &str, name: &str) -> RefId {
        let fingerprint = Fingerprint {
            role: role.to_string(),
            name: name.to_string(),
        };
        if let Some(entry) = self.entries.get(&node) {
            if entry.fingerprint == fingerprint {
                return entry.id;
            }
        }
        self.last_element += 1;
        let id = RefId {
            frame: self.frame,
            element: self.last_element,
        };
        trace!(%id, %node, role, name, "Allocated ref");
        self.entries.insert(node, RefEntry { id, fingerprint });
        id
    }

    /// Element behind a ref issued by the latest capture.
    pub fn lookup(&self, id: &RefId) -> Option<NodeId> {
        self.live.get(id).copied()
    }

    /// Elements with a recorded ref.
    pub fn tracked_nodes(&self) -> Vec<NodeId> {
        self.entries.keys().copied().collect()
    }

    /// Forget elements that left the document.
    pub fn forget(&mut self, nodes: &[NodeId]) {
        for node in nodes {
            if let Some(entry) = self.entries.remove(node) {
                self.live.remove(&entry.id);
            }
        }
    }

    /// Drop every entry while keeping the counter, for a frame that now shows
    /// a different document.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.live.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assign refs to every eligible node of a frame tree, in pre-order, and
    /// make them the live set.
    pub(crate) fn assign_tree(&mut self, root: &mut AriaNode) {
        self.live.clear();
        self.assign_node(root);
    }

    fn assign_node(&mut self, node: &mut AriaNode) {
        if let (true, Some(element)) = (node.ref_eligible, node.element) {
            let id = self.assign(element, &node.role, &node.name);
            self.live.insert(id, element);
            node.aria_ref = Some(id.to_string());
        }
        for child in &mut node.children {
            if let AriaChild::Node(child) = child {
                self.assign_node(child);
            }
        }
    }
}
