//! Element classification: box, visibility and viewport position.

mod viewport;
mod visibility;

pub use viewport::{
    Horizontal, MainFrameViewport, Vertical, ViewportPosition, compute_viewport_position,
};
pub use visibility::{
    ElementBox, compute_box, is_element_style_visibility_visible, is_element_visible,
    is_visible_text_node, parent_element_or_shadow_host,
};

#[cfg(test)]
#[path = "geometry_tests.rs"]
mod tests;
