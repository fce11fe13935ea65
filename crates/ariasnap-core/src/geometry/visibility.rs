//! Element box computation and visibility checks.

use ariasnap_protocols::{ComputedStyle, DomError, DomView, NodeId, NodeType, ParentLink, Rect};

use super::viewport::{MainFrameViewport, ViewportPosition, compute_viewport_position};
use crate::style_cache::StyleCache;

/// Layout facts about one element.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ElementBox {
    /// Rendered with a non-empty box.
    pub visible: bool,
    /// Laid out inline.
    pub inline: bool,
    /// Client rect. `None` when the element is not rendered.
    pub rect: Option<Rect>,
    /// Computed `cursor`.
    pub cursor: Option<String>,
    pub viewport_position: Option<ViewportPosition>,
}

/// Nearest ancestor element, crossing from a shadow root to its host.
pub fn parent_element_or_shadow_host(
    dom: &dyn DomView,
    node: NodeId,
) -> Result<Option<NodeId>, DomError> {
    match dom.parent(node)? {
        Some(ParentLink::ShadowHost(host)) => Ok(Some(host)),
        Some(ParentLink::Tree(parent)) => match dom.node_type(parent)? {
            NodeType::Element => Ok(Some(parent)),
            NodeType::ShadowRoot => match dom.parent(parent)? {
                Some(ParentLink::ShadowHost(host)) => Ok(Some(host)),
                _ => Ok(None),
            },
            _ => Ok(None),
        },
        None => Ok(None),
    }
}

/// Compute the box of `element`.
///
/// Without computed styles (no window) the element is assumed visible.
/// `display: contents` elements have no box of their own and count as visible
/// when any direct child is visible.
pub fn compute_box(
    dom: &dyn DomView,
    cache: &StyleCache,
    element: NodeId,
    transform: Option<&MainFrameViewport>,
) -> Result<ElementBox, DomError> {
    let Some(style) = cache.style(dom, element)? else {
        return Ok(ElementBox {
            visible: true,
            ..ElementBox::default()
        });
    };
    let cursor = Some(style.cursor.clone());

    if style.is_display_contents() {
        for child in dom.child_nodes(element)? {
            match dom.node_type(child)? {
                NodeType::Element if is_element_visible(dom, cache, child)? => {
                    return Ok(ElementBox {
                        visible: true,
                        inline: false,
                        cursor,
                        ..ElementBox::default()
                    });
                }
                NodeType::Text if is_visible_text_node(dom, child)? => {
                    return Ok(ElementBox {
                        visible: true,
                        inline: true,
                        cursor,
                        ..ElementBox::default()
                    });
                }
                _ => {}
            }
        }
        return Ok(ElementBox {
            cursor,
            ..ElementBox::default()
        });
    }

    if !is_element_style_visibility_visible(dom, element, &style)? {
        return Ok(ElementBox {
            cursor,
            ..ElementBox::default()
        });
    }

    let rect = dom.bounding_client_rect(element)?;
    let viewport_position = compute_viewport_position(Some(&rect), dom, transform)?;
    Ok(ElementBox {
        visible: rect.has_area(),
        inline: style.is_inline(),
        rect: Some(rect),
        cursor,
        viewport_position,
    })
}

pub fn is_element_visible(
    dom: &dyn DomView,
    cache: &StyleCache,
    element: NodeId,
) -> Result<bool, DomError> {
    Ok(compute_box(dom, cache, element, None)?.visible)
}

pub fn is_visible_text_node(dom: &dyn DomView, node: NodeId) -> Result<bool, DomError> {
    Ok(dom.text_rect(node)?.has_area())
}

/// Style-level visibility: `visibility` plus whatever the engine's native
/// visibility check knows about (closed `<details>`, `content-visibility`).
///
/// When the engine lacks the native check, content of a closed `<details>`
/// other than its `<summary>` is treated as hidden.
pub fn is_element_style_visibility_visible(
    dom: &dyn DomView,
    element: NodeId,
    style: &ComputedStyle,
) -> Result<bool, DomError> {
    match dom.check_visibility(element)? {
        Some(false) => return Ok(false),
        Some(true) => {}
        None => {
            if hidden_by_closed_details(dom, element)? {
                return Ok(false);
            }
        }
    }
    Ok(style.is_visibility_visible())
}

fn hidden_by_closed_details(dom: &dyn DomView, element: NodeId) -> Result<bool, DomError> {
    let mut current = element;
    loop {
        match dom.tag_name(current)?.as_str() {
            "SUMMARY" => return Ok(false),
            "DETAILS" if current != element => {
                return Ok(dom.attribute(current, "open")?.is_none());
            }
            _ => {}
        }
        match parent_element_or_shadow_host(dom, current)? {
            Some(parent) => current = parent,
            None => return Ok(false),
        }
    }
}
