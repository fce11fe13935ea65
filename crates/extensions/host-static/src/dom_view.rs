//! [`DomView`] over a [`StaticDocument`].

use ariasnap_protocols::{
    ComputedStyle, DomError, DomView, FrameId, NodeId, NodeType, ParentLink, Rect, VisualViewport,
};

use crate::document::{Element, Node, NodeData, StaticDocument};
use crate::style::{default_display, initial_value};

const DEFAULT_BOX: (f64, f64) = (100.0, 20.0);
const GLYPH_WIDTH: f64 = 8.0;
const LINE_HEIGHT: f64 = 16.0;

impl StaticDocument {
    fn alive(&self) -> Result<(), DomError> {
        if self.torn_down {
            Err(DomError::Detached)
        } else {
            Ok(())
        }
    }

    fn node(&self, id: NodeId) -> Result<&Node, DomError> {
        self.alive()?;
        self.get(id).ok_or(DomError::NodeNotFound(id))
    }

    fn el(&self, id: NodeId) -> Result<&Element, DomError> {
        match &self.node(id)?.data {
            NodeData::Element(element) => Ok(element),
            _ => Err(DomError::Query(format!("{id} is not an element"))),
        }
    }

    pub(crate) fn display_of(&self, element: &Element) -> String {
        if let Some(display) = element.style.get("display") {
            return display.clone();
        }
        if element.attributes.contains_key("hidden") {
            return "none".to_string();
        }
        default_display(&element.tag).to_string()
    }

    /// Inherited property, resolving `inherit` and `initial`.
    fn inherited(&self, id: NodeId, property: &str) -> String {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(value) = self.element(node).and_then(|el| el.style.get(property)) {
                match value.as_str() {
                    "inherit" => {}
                    "initial" | "unset" => return initial_value(property).to_string(),
                    other => return other.to_string(),
                }
            }
            current = self.flat_parent(node);
        }
        initial_value(property).to_string()
    }

    fn hidden_by_details(&self, parent: NodeId, child: NodeId) -> bool {
        let Some(details) = self.element(parent) else {
            return false;
        };
        if details.tag != "DETAILS" || details.attributes.contains_key("open") {
            return false;
        }
        !self.element(child).is_some_and(|el| el.tag == "SUMMARY")
    }

    /// Element generates boxes: no `display: none` on it or any ancestor and
    /// not inside the hidden part of a closed `<details>`.
    pub(crate) fn is_rendered(&self, id: NodeId) -> bool {
        let mut current = id;
        loop {
            if let Some(el) = self.element(current) {
                if self.display_of(el) == "none" {
                    return false;
                }
            }
            match self.flat_parent(current) {
                Some(parent) => {
                    if self.hidden_by_details(parent, current) {
                        return false;
                    }
                    current = parent;
                }
                None => return true,
            }
        }
    }

    /// Border box in document coordinates. Elements without an explicit rect
    /// sit at their parent's origin with a default size.
    fn layout_rect(&self, id: NodeId) -> Rect {
        if let Some(rect) = self.element(id).and_then(|el| el.rect) {
            return rect;
        }
        if id == self.document_element || id == self.body {
            let (width, height) = self.window.unwrap_or(DEFAULT_BOX);
            return Rect::new(0.0, 0.0, width, height);
        }
        let origin = self
            .flat_parent(id)
            .map(|parent| self.layout_rect(parent))
            .unwrap_or_default();
        Rect::new(origin.x, origin.y, DEFAULT_BOX.0, DEFAULT_BOX.1)
    }

    fn to_client(&self, rect: Rect) -> Rect {
        rect.translate(-self.scroll.0, -self.scroll.1)
    }
}

impl DomView for StaticDocument {
    fn root_element(&self) -> Result<NodeId, DomError> {
        self.alive()?;
        Ok(self.body)
    }

    fn node_type(&self, node: NodeId) -> Result<NodeType, DomError> {
        Ok(match self.node(node)?.data {
            NodeData::Element(_) => NodeType::Element,
            NodeData::Text { .. } => NodeType::Text,
            NodeData::ShadowRoot => NodeType::ShadowRoot,
        })
    }

    fn parent(&self, node: NodeId) -> Result<Option<ParentLink>, DomError> {
        Ok(self.node(node)?.parent)
    }

    fn child_nodes(&self, node: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(self.node(node)?.children.clone())
    }

    fn shadow_root(&self, element: NodeId) -> Result<Option<NodeId>, DomError> {
        Ok(self.el(element)?.shadow_root)
    }

    fn assigned_nodes(&self, slot: NodeId) -> Result<Vec<NodeId>, DomError> {
        Ok(self.el(slot)?.assigned.clone())
    }

    fn tag_name(&self, element: NodeId) -> Result<String, DomError> {
        Ok(self.el(element)?.tag.clone())
    }

    fn attribute(&self, element: NodeId, name: &str) -> Result<Option<String>, DomError> {
        Ok(self
            .el(element)?
            .attributes
            .get(&name.to_ascii_lowercase())
            .cloned())
    }

    fn text(&self, node: NodeId) -> Result<String, DomError> {
        match &self.node(node)?.data {
            NodeData::Text { text, .. } => Ok(text.clone()),
            _ => Err(DomError::Query(format!("{node} is not a text node"))),
        }
    }

    fn computed_style(&self, element: NodeId) -> Result<Option<ComputedStyle>, DomError> {
        let el = self.el(element)?;
        if self.window.is_none() {
            return Ok(None);
        }
        Ok(Some(ComputedStyle {
            display: self.display_of(el),
            visibility: self.inherited(element, "visibility"),
            cursor: self.inherited(element, "cursor"),
            pointer_events: self.inherited(element, "pointer-events"),
        }))
    }

    fn check_visibility(&self, element: NodeId) -> Result<Option<bool>, DomError> {
        self.el(element)?;
        if !self.check_visibility {
            return Ok(None);
        }
        Ok(Some(self.is_rendered(element)))
    }

    fn bounding_client_rect(&self, element: NodeId) -> Result<Rect, DomError> {
        let el = self.el(element)?;
        if !self.is_rendered(element) || self.display_of(el) == "contents" {
            return Ok(Rect::default());
        }
        Ok(self.to_client(self.layout_rect(element)))
    }

    fn text_rect(&self, node: NodeId) -> Result<Rect, DomError> {
        let NodeData::Text { text, rect } = &self.node(node)?.data else {
            return Err(DomError::Query(format!("{node} is not a text node")));
        };
        let Some(parent) = self.flat_parent(node) else {
            return Ok(Rect::default());
        };
        if !self.is_rendered(parent) || self.hidden_by_details(parent, node) {
            return Ok(Rect::default());
        }
        if let Some(rect) = rect {
            return Ok(self.to_client(*rect));
        }
        let visible_chars = text.trim().chars().count();
        if visible_chars == 0 {
            return Ok(Rect::default());
        }
        let origin = self.layout_rect(parent);
        Ok(self.to_client(Rect::new(
            origin.x,
            origin.y,
            visible_chars as f64 * GLYPH_WIDTH,
            LINE_HEIGHT,
        )))
    }

    fn visual_viewport(&self) -> Result<Option<VisualViewport>, DomError> {
        self.alive()?;
        Ok(self.window.and(self.visual_viewport))
    }

    fn inner_size(&self) -> Result<Option<(f64, f64)>, DomError> {
        self.alive()?;
        Ok(self.window)
    }

    fn active_element(&self) -> Result<Option<NodeId>, DomError> {
        self.alive()?;
        Ok(Some(
            self.focused
                .filter(|node| self.is_attached(*node))
                .unwrap_or(self.body),
        ))
    }

    fn content_frame(&self, element: NodeId) -> Result<Option<FrameId>, DomError> {
        Ok(self.el(element)?.content_frame.clone())
    }

    fn frame_content_offset(&self, element: NodeId) -> Result<(f64, f64), DomError> {
        Ok(self.el(element)?.content_offset)
    }

    fn is_connected(&self, node: NodeId) -> Result<bool, DomError> {
        self.alive()?;
        Ok(self.get(node).is_some() && self.is_attached(node))
    }
}
