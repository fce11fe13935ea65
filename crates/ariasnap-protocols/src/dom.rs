//! Read-only view of one frame's document.

use crate::error::DomError;
use crate::types::{ComputedStyle, FrameId, NodeId, Rect, VisualViewport};

/// Kind of a DOM node, as far as the engine cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeType {
    Element,
    Text,
    ShadowRoot,
    /// Comments, processing instructions and the like.
    Other,
}

/// How a node is attached to the node above it.
///
/// Shadow roots have no tree parent; they hang off their host element. Keeping
/// the two edge kinds apart lets traversals decide whether to cross shadow
/// boundaries instead of guessing from a single parent pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParentLink {
    Tree(NodeId),
    ShadowHost(NodeId),
}

/// Synchronous read access to one frame's document.
///
/// A view is only valid inside the task it was handed to (see
/// [`FrameHandle::run`](crate::FrameHandle::run)); every read reflects the
/// document at one point in time. Any query can fail once the document is torn
/// down.
pub trait DomView {
    /// The frame's root container element (the `<body>` for HTML documents).
    fn root_element(&self) -> Result<NodeId, DomError>;

    fn node_type(&self, node: NodeId) -> Result<NodeType, DomError>;

    /// `None` for the document element and for detached nodes.
    fn parent(&self, node: NodeId) -> Result<Option<ParentLink>, DomError>;

    /// Light-tree children in document order.
    fn child_nodes(&self, node: NodeId) -> Result<Vec<NodeId>, DomError>;

    fn shadow_root(&self, element: NodeId) -> Result<Option<NodeId>, DomError>;

    /// Nodes assigned to a `<slot>` element.
    fn assigned_nodes(&self, _slot: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(Vec::new())
    }

    /// Upper-case tag name.
    fn tag_name(&self, element: NodeId) -> Result<String, DomError>;

    fn attribute(&self, element: NodeId, name: &str) -> Result<Option<String>, DomError>;

    /// Character data of a text node.
    fn text(&self, node: NodeId) -> Result<String, DomError>;

    /// `None` when the document has no window to compute styles with.
    fn computed_style(&self, element: NodeId) -> Result<Option<ComputedStyle>, DomError>;

    /// Native "check visibility" capability. `None` when the engine lacks it
    /// or it is known to be unreliable.
    fn check_visibility(&self, element: NodeId) -> Result<Option<bool>, DomError>;

    /// Border box relative to the frame's layout viewport. The frame's scroll
    /// position is already applied.
    fn bounding_client_rect(&self, element: NodeId) -> Result<Rect, DomError>;

    /// Union of the line boxes of a text node, in client coordinates.
    fn text_rect(&self, node: NodeId) -> Result<Rect, DomError>;

    fn visual_viewport(&self) -> Result<Option<VisualViewport>, DomError>;

    /// Window inner size. `None` when the document has no window.
    fn inner_size(&self) -> Result<Option<(f64, f64)>, DomError>;

    /// The document's focused element, if any.
    fn active_element(&self) -> Result<Option<NodeId>, DomError>;

    /// Frame displayed by an `<iframe>` element, if it has been created.
    fn content_frame(&self, element: NodeId) -> Result<Option<FrameId>, DomError>;

    /// Offset of an iframe's content box inside its border box.
    fn frame_content_offset(&self, _element: NodeId) -> Result<(f64, f64), DomError> {
        Ok((0.0, 0.0))
    }

    fn is_connected(&self, node: NodeId) -> Result<bool, DomError>;
}
