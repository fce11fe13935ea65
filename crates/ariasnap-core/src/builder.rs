//! Walks one frame's document into an uncollapsed accessibility tree.

use ariasnap_protocols::{
    AriaProvider, DomError, DomView, FrameId, NodeId, NodeType, ParentLink, Rect,
};

use crate::geometry::{MainFrameViewport, compute_box};
use crate::style_cache::StyleCache;
use crate::tree::{AriaChild, AriaNode};

/// An iframe found while walking a frame.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct IframeSlot {
    pub frame: Option<FrameId>,
    /// Client rect of the iframe element in its parent frame.
    pub rect: Rect,
    pub content_offset: (f64, f64),
}

/// Result of walking one frame.
#[derive(Debug)]
pub(crate) struct FrameTree {
    pub root: AriaNode,
    pub iframes: Vec<IframeSlot>,
    /// Some element other than the root container has focus.
    pub has_focus: bool,
    /// Transform of this frame into the top-level viewport.
    pub transform: MainFrameViewport,
}

#[derive(Debug, Clone, Copy)]
struct Inherited {
    receives_pointer_events: bool,
    cursor_pointer: bool,
}

struct TreeBuilder<'a> {
    dom: &'a dyn DomView,
    provider: &'a dyn AriaProvider,
    cache: &'a StyleCache,
    /// `None` for the top-level frame, which measures against its own viewport.
    transform: Option<&'a MainFrameViewport>,
    root: NodeId,
    focus: Option<NodeId>,
    iframes: Vec<IframeSlot>,
}

/// Walk the document behind `dom`.
///
/// `transform` is `None` for the top-level frame and the composed transform
/// for nested frames.
pub(crate) fn build_frame_tree(
    dom: &dyn DomView,
    provider: &dyn AriaProvider,
    transform: Option<MainFrameViewport>,
) -> Result<FrameTree, DomError> {
    let cache = StyleCache::new();
    let _scope = cache.begin();

    let root = dom.root_element()?;
    let focus = explicit_focus(dom, root)?;
    let frame_transform = match transform {
        Some(t) => t,
        None => MainFrameViewport::top_level(dom)?,
    };

    let mut builder = TreeBuilder {
        dom,
        provider,
        cache: &cache,
        transform: transform.as_ref(),
        root,
        focus,
        iframes: Vec::new(),
    };
    let root_node = builder.visit_root()?;
    Ok(FrameTree {
        root: root_node,
        iframes: builder.iframes,
        has_focus: focus.is_some(),
        transform: frame_transform,
    })
}

/// The focused element, unless focus rests on the root container or one of
/// its ancestors.
fn explicit_focus(dom: &dyn DomView, root: NodeId) -> Result<Option<NodeId>, DomError> {
    let Some(active) = dom.active_element()? else {
        return Ok(None);
    };
    if active == root || !dom.is_connected(active)? {
        return Ok(None);
    }
    let mut current = root;
    while let Some(ParentLink::Tree(parent)) = dom.parent(current)? {
        if parent == active {
            return Ok(None);
        }
        current = parent;
    }
    Ok(Some(active))
}

impl TreeBuilder<'_> {
    fn visit_root(&mut self) -> Result<AriaNode, DomError> {
        let inherited = Inherited {
            receives_pointer_events: true,
            cursor_pointer: false,
        };
        let element_box = compute_box(self.dom, self.cache, self.root, self.transform)?;
        let receives = self.receives_pointer_events(self.root, inherited)?;
        let role = self
            .provider
            .role(self.dom, self.root)?
            .filter(|role| role != "none" && role != "presentation")
            .unwrap_or_else(|| "generic".to_string());

        let mut node = self.make_node(self.root, role, element_box, receives, inherited)?;
        let inherited = Inherited {
            receives_pointer_events: receives,
            cursor_pointer: inherited.cursor_pointer || node.cursor_pointer,
        };
        let mut children = Vec::new();
        self.visit_children(self.root, &mut children, true, inherited)?;
        node.children = children;
        Ok(node)
    }

    fn visit(
        &mut self,
        node: NodeId,
        out: &mut Vec<AriaChild>,
        include_text: bool,
        inherited: Inherited,
    ) -> Result<(), DomError> {
        match self.dom.node_type(node)? {
            NodeType::Text => {
                if include_text {
                    let text = self.dom.text(node)?;
                    if !text.is_empty() {
                        out.push(AriaChild::Text(text));
                    }
                }
                Ok(())
            }
            NodeType::Element => self.visit_element(node, out, inherited),
            NodeType::ShadowRoot | NodeType::Other => Ok(()),
        }
    }

    fn visit_element(
        &mut self,
        element: NodeId,
        out: &mut Vec<AriaChild>,
        inherited: Inherited,
    ) -> Result<(), DomError> {
        if self.provider.is_hidden(self.dom, element)? {
            return Ok(());
        }

        let element_box = compute_box(self.dom, self.cache, element, self.transform)?;
        let receives = self.receives_pointer_events(element, inherited)?;

        if !element_box.visible {
            // Not a node, but visible descendants still are.
            let inherited = Inherited {
                receives_pointer_events: receives,
                ..inherited
            };
            return self.visit_children(element, out, false, inherited);
        }

        let tag = self.dom.tag_name(element)?;
        let is_frame = tag == "IFRAME" || tag == "FRAME";
        let role = if is_frame {
            Some("iframe".to_string())
        } else {
            self.provider.role(self.dom, element)?
        };
        let role = match role.as_deref() {
            Some("none") | Some("presentation") => {
                let inherited = Inherited {
                    receives_pointer_events: receives,
                    ..inherited
                };
                return self.visit_children(element, out, true, inherited);
            }
            Some(_) => role.unwrap_or_default(),
            None => "generic".to_string(),
        };

        let mut node = self.make_node(element, role, element_box, receives, inherited)?;
        if is_frame {
            node.frame_slot = Some(self.iframes.len());
            self.iframes.push(IframeSlot {
                frame: self.dom.content_frame(element)?,
                rect: node.element_box.rect.unwrap_or_default(),
                content_offset: self.dom.frame_content_offset(element)?,
            });
            out.push(AriaChild::Node(node));
            return Ok(());
        }

        let include_text = node.role != "textbox";
        let inherited = Inherited {
            receives_pointer_events: receives,
            cursor_pointer: inherited.cursor_pointer || node.cursor_pointer,
        };
        let mut children = Vec::new();
        self.visit_children(element, &mut children, include_text, inherited)?;
        node.children = children;
        out.push(AriaChild::Node(node));
        Ok(())
    }

    /// Children in flattened-tree order: shadow root content replaces light
    /// children, and slots yield their assigned nodes.
    fn visit_children(
        &mut self,
        element: NodeId,
        out: &mut Vec<AriaChild>,
        include_text: bool,
        inherited: Inherited,
    ) -> Result<(), DomError> {
        let children = match self.dom.shadow_root(element)? {
            Some(root) => self.dom.child_nodes(root)?,
            None if self.dom.tag_name(element)? == "SLOT" => {
                let assigned = self.dom.assigned_nodes(element)?;
                if assigned.is_empty() {
                    self.dom.child_nodes(element)?
                } else {
                    assigned
                }
            }
            None => self.dom.child_nodes(element)?,
        };
        for child in children {
            self.visit(child, out, include_text, inherited)?;
        }
        Ok(())
    }

    fn receives_pointer_events(
        &self,
        element: NodeId,
        inherited: Inherited,
    ) -> Result<bool, DomError> {
        let style = self.cache.style(self.dom, element)?;
        Ok(match style.as_deref().map(|s| s.pointer_events.as_str()) {
            Some("none") => false,
            Some("auto") | Some("initial") => true,
            _ => inherited.receives_pointer_events,
        })
    }

    fn make_node(
        &self,
        element: NodeId,
        role: String,
        element_box: crate::geometry::ElementBox,
        receives: bool,
        inherited: Inherited,
    ) -> Result<AriaNode, DomError> {
        let mut name = self.provider.accessible_name(self.dom, element)?;
        if role == "generic" && name.is_empty() {
            if let Some(title) = self.dom.attribute(element, "title")? {
                name = title.trim().to_string();
            }
        }

        let eligible = element_box.visible && receives;
        let focused = self.focus == Some(element);
        let mut node = AriaNode::new(role, name);
        node.attributes = self.provider.attributes(self.dom, element)?;
        node.ref_eligible = eligible;
        node.focused = focused;
        node.active = focused || (element == self.root && self.focus.is_none());
        node.cursor_pointer = eligible
            && !inherited.cursor_pointer
            && element_box.cursor.as_deref() == Some("pointer");
        node.viewport = if eligible {
            element_box.viewport_position
        } else {
            None
        };
        node.element = Some(element);
        node.element_box = element_box;
        Ok(node)
    }
}

#[cfg(test)]
#[path = "builder_tests.rs"]
mod tests;
