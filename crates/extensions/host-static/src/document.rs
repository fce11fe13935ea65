//! Mutable in-memory document.

use std::collections::BTreeMap;

use ariasnap_protocols::{FrameId, NodeId, ParentLink, Rect, VisualViewport};

use crate::style::parse_declarations;

#[derive(Debug, Clone)]
pub(crate) enum NodeData {
    Element(Element),
    Text { text: String, rect: Option<Rect> },
    ShadowRoot,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct Element {
    pub tag: String,
    pub attributes: BTreeMap<String, String>,
    pub style: BTreeMap<String, String>,
    /// Border box in document coordinates.
    pub rect: Option<Rect>,
    pub shadow_root: Option<NodeId>,
    pub content_frame: Option<FrameId>,
    pub content_offset: (f64, f64),
    pub assigned: Vec<NodeId>,
}

#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub data: NodeData,
    pub parent: Option<ParentLink>,
    pub children: Vec<NodeId>,
}

/// A document built in memory.
///
/// Every document starts as `<html><body></body></html>`; the body is the
/// root container. Node ids are never reused, so a removed node keeps its id
/// and simply reports itself as disconnected.
///
/// ```
/// use ariasnap_host_static::StaticDocument;
///
/// let mut doc = StaticDocument::new(800.0, 600.0);
/// let button = doc.append_element(doc.body(), "button");
/// doc.append_text(button, "Submit");
/// assert_eq!(doc.text_content(button), "Submit");
/// ```
#[derive(Debug, Clone)]
pub struct StaticDocument {
    pub(crate) nodes: Vec<Node>,
    pub(crate) document_element: NodeId,
    pub(crate) body: NodeId,
    pub(crate) window: Option<(f64, f64)>,
    pub(crate) visual_viewport: Option<VisualViewport>,
    pub(crate) scroll: (f64, f64),
    pub(crate) focused: Option<NodeId>,
    pub(crate) check_visibility: bool,
    pub(crate) torn_down: bool,
}

impl StaticDocument {
    /// Create an empty document in a window of the given inner size.
    pub fn new(width: f64, height: f64) -> Self {
        let mut doc = Self {
            nodes: Vec::new(),
            document_element: NodeId(0),
            body: NodeId(0),
            window: Some((width, height)),
            visual_viewport: Some(VisualViewport {
                offset_left: 0.0,
                offset_top: 0.0,
                width,
                height,
            }),
            scroll: (0.0, 0.0),
            focused: None,
            check_visibility: true,
            torn_down: false,
        };
        let html = doc.create_element("html");
        let body = doc.create_element("body");
        doc.append_child(html, body);
        doc.document_element = html;
        doc.body = body;
        doc
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn document_element(&self) -> NodeId {
        self.document_element
    }

    fn push(&mut self, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u64);
        self.nodes.push(Node {
            data,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    pub(crate) fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0 as usize)
    }

    fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0 as usize)
    }

    pub(crate) fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.get(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.get_mut(id)?.data {
            NodeData::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Create a detached element.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.push(NodeData::Element(Element {
            tag: tag.to_ascii_uppercase(),
            ..Element::default()
        }))
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.push(NodeData::Text {
            text: text.to_string(),
            rect: None,
        })
    }

    /// Append `child` to `parent`, moving it if it is already attached.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            node.children.push(child);
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(ParentLink::Tree(parent));
        }
    }

    /// Insert `child` into `parent` before `reference`, or at the end when
    /// `reference` is not a child of `parent`.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: NodeId) {
        self.detach(child);
        if let Some(node) = self.get_mut(parent) {
            match node.children.iter().position(|c| *c == reference) {
                Some(index) => node.children.insert(index, child),
                None => node.children.push(child),
            }
        }
        if let Some(node) = self.get_mut(child) {
            node.parent = Some(ParentLink::Tree(parent));
        }
    }

    pub fn append_element(&mut self, parent: NodeId, tag: &str) -> NodeId {
        let element = self.create_element(tag);
        self.append_child(parent, element);
        element
    }

    /// Append an element with attributes.
    pub fn append(&mut self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let element = self.append_element(parent, tag);
        for (name, value) in attributes {
            self.set_attribute(element, name, value);
        }
        element
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> NodeId {
        let node = self.create_text(text);
        self.append_child(parent, node);
        node
    }

    /// Remove a node from its parent. The subtree stays intact but detached.
    pub fn remove(&mut self, node: NodeId) {
        self.detach(node);
        if self.focused == Some(node) {
            self.focused = None;
        }
    }

    fn detach(&mut self, node: NodeId) {
        let Some(link) = self.get(node).and_then(|n| n.parent) else {
            return;
        };
        match link {
            ParentLink::Tree(parent) => {
                if let Some(parent) = self.get_mut(parent) {
                    parent.children.retain(|c| *c != node);
                }
            }
            ParentLink::ShadowHost(host) => {
                if let Some(host) = self.element_mut(host) {
                    host.shadow_root = None;
                }
            }
        }
        if let Some(n) = self.get_mut(node) {
            n.parent = None;
        }
    }

    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) {
        if let Some(el) = self.element_mut(element) {
            el.attributes
                .insert(name.to_ascii_lowercase(), value.to_string());
        }
    }

    pub fn remove_attribute(&mut self, element: NodeId, name: &str) {
        if let Some(el) = self.element_mut(element) {
            el.attributes.remove(&name.to_ascii_lowercase());
        }
    }

    /// Merge inline style declarations, e.g. `"display: none; cursor: pointer"`.
    pub fn set_style(&mut self, element: NodeId, declarations: &str) {
        if let Some(el) = self.element_mut(element) {
            el.style.extend(parse_declarations(declarations));
        }
    }

    pub fn clear_style(&mut self, element: NodeId) {
        if let Some(el) = self.element_mut(element) {
            el.style.clear();
        }
    }

    /// Place an element's border box, in document coordinates.
    pub fn set_rect(&mut self, element: NodeId, x: f64, y: f64, width: f64, height: f64) {
        if let Some(el) = self.element_mut(element) {
            el.rect = Some(Rect::new(x, y, width, height));
        }
    }

    /// Place a text node's line box, in document coordinates.
    pub fn set_text_rect(&mut self, node: NodeId, x: f64, y: f64, width: f64, height: f64) {
        if let Some(Node {
            data: NodeData::Text { rect, .. },
            ..
        }) = self.get_mut(node)
        {
            *rect = Some(Rect::new(x, y, width, height));
        }
    }

    pub fn set_text(&mut self, node: NodeId, value: &str) {
        if let Some(Node {
            data: NodeData::Text { text, .. },
            ..
        }) = self.get_mut(node)
        {
            *text = value.to_string();
        }
    }

    /// Replace the children of `element` with a single text node.
    pub fn set_text_content(&mut self, element: NodeId, value: &str) -> NodeId {
        let children = self.get(element).map(|n| n.children.clone()).unwrap_or_default();
        for child in children {
            self.detach(child);
        }
        self.append_text(element, value)
    }

    /// Attach an open shadow root to `host`.
    pub fn attach_shadow(&mut self, host: NodeId) -> NodeId {
        let root = self.push(NodeData::ShadowRoot);
        if let Some(n) = self.get_mut(root) {
            n.parent = Some(ParentLink::ShadowHost(host));
        }
        if let Some(el) = self.element_mut(host) {
            el.shadow_root = Some(root);
        }
        root
    }

    /// Assign light-tree nodes to a `<slot>`.
    pub fn assign_slot(&mut self, slot: NodeId, nodes: &[NodeId]) {
        if let Some(el) = self.element_mut(slot) {
            el.assigned = nodes.to_vec();
        }
    }

    pub fn set_content_frame(&mut self, iframe: NodeId, frame: Option<FrameId>) {
        if let Some(el) = self.element_mut(iframe) {
            el.content_frame = frame;
        }
    }

    /// Inset of an iframe's content box (border plus padding).
    pub fn set_content_offset(&mut self, iframe: NodeId, dx: f64, dy: f64) {
        if let Some(el) = self.element_mut(iframe) {
            el.content_offset = (dx, dy);
        }
    }

    pub fn scroll_to(&mut self, x: f64, y: f64) {
        self.scroll = (x, y);
    }

    pub fn set_visual_viewport(&mut self, viewport: Option<VisualViewport>) {
        self.visual_viewport = viewport;
    }

    /// Inner size of the window; `None` detaches the document from any window.
    pub fn set_window(&mut self, size: Option<(f64, f64)>) {
        self.window = size;
    }

    /// Whether the native visibility check is available.
    pub fn set_check_visibility(&mut self, supported: bool) {
        self.check_visibility = supported;
    }

    pub fn focus(&mut self, element: NodeId) {
        self.focused = Some(element);
    }

    pub fn blur(&mut self) {
        self.focused = None;
    }

    /// Make every subsequent query fail as if the document was destroyed.
    pub fn tear_down(&mut self) {
        self.torn_down = true;
    }

    pub fn restore(&mut self) {
        self.torn_down = false;
    }

    /// First connected element whose `id` attribute equals `id`.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.descendants(self.document_element)
            .into_iter()
            .find(|node| {
                self.element(*node)
                    .and_then(|el| el.attributes.get("id"))
                    .is_some_and(|value| value == id)
            })
    }

    /// Concatenated text of every light-tree text descendant.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .into_iter()
            .filter_map(|id| match &self.get(id)?.data {
                NodeData::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let mut result = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            result.push(current);
            if let Some(n) = self.get(current) {
                stack.extend(n.children.iter().rev());
            }
        }
        result
    }

    pub(crate) fn is_attached(&self, node: NodeId) -> bool {
        let mut current = node;
        loop {
            if current == self.document_element {
                return true;
            }
            match self.get(current).and_then(|n| n.parent) {
                Some(ParentLink::Tree(parent)) | Some(ParentLink::ShadowHost(parent)) => {
                    current = parent
                }
                None => return false,
            }
        }
    }

    /// Parent element in the flattened tree: crosses shadow roots to the host.
    pub(crate) fn flat_parent(&self, node: NodeId) -> Option<NodeId> {
        match self.get(node)?.parent? {
            ParentLink::ShadowHost(host) => Some(host),
            ParentLink::Tree(parent) => match self.get(parent)?.data {
                NodeData::Element(_) => Some(parent),
                NodeData::ShadowRoot => match self.get(parent)?.parent? {
                    ParentLink::ShadowHost(host) => Some(host),
                    ParentLink::Tree(_) => None,
                },
                NodeData::Text { .. } => None,
            },
        }
    }
}
