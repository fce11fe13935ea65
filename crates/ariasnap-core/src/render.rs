//! Text rendering of accessibility trees.
//!
//! One line per node, two-space indentation:
//!
//! ```text
//! - generic [active] [ref=e1]:
//!   - heading "Title" [level=1] [visible] [ref=e2]
//!   - link "Docs" [visible] [ref=e3] [cursor=pointer]:
//!     - /url: /docs
//!   - text: Loose text
//! ```

use ariasnap_protocols::CheckedState;

use crate::tree::{AriaChild, AriaNode};

/// Render a full tree.
pub fn render_tree(root: &AriaNode) -> String {
    let mut lines = Vec::new();
    render_node(root, "", &mut lines);
    lines.join("\n")
}

fn render_node(node: &AriaNode, indent: &str, lines: &mut Vec<String>) {
    let child_indent = format!("{indent}  ");
    match write_header(lines, indent, "", node) {
        Body::Block(children) => {
            for child in children {
                match child {
                    AriaChild::Text(text) => write_text(lines, &child_indent, text),
                    AriaChild::Node(child) => render_node(child, &child_indent, lines),
                }
            }
        }
        Body::Empty | Body::Inline => {}
    }
}

/// Node description: role, quoted name and bracketed annotations.
pub(crate) fn create_key(node: &AriaNode) -> String {
    let mut key = node.role.clone();
    if !node.name.is_empty() {
        key.push(' ');
        key.push_str(&quote(&node.name));
    }
    let attributes = &node.attributes;
    match attributes.checked {
        Some(CheckedState::True) => key.push_str(" [checked]"),
        Some(CheckedState::Mixed) => key.push_str(" [checked=mixed]"),
        Some(CheckedState::False) | None => {}
    }
    if attributes.disabled {
        key.push_str(" [disabled]");
    }
    if attributes.expanded == Some(true) {
        key.push_str(" [expanded]");
    }
    if node.active {
        key.push_str(" [active]");
    }
    if let Some(level) = attributes.level {
        key.push_str(&format!(" [level={level}]"));
    }
    match attributes.pressed {
        Some(CheckedState::True) => key.push_str(" [pressed]"),
        Some(CheckedState::Mixed) => key.push_str(" [pressed=mixed]"),
        Some(CheckedState::False) | None => {}
    }
    if attributes.selected {
        key.push_str(" [selected]");
    }
    if let Some(viewport) = &node.viewport {
        key.push_str(&format!(" [{viewport}]"));
    }
    if let Some(aria_ref) = &node.aria_ref {
        key.push_str(&format!(" [ref={aria_ref}]"));
    }
    if node.cursor_pointer {
        key.push_str(" [cursor=pointer]");
    }
    key
}

/// What follows a node's key.
pub(crate) enum Body<'a> {
    Empty,
    /// The single text child was written on the key line.
    Inline,
    /// Children to write below the key and its properties.
    Block(Vec<&'a AriaChild>),
}

/// Children worth writing: text repeating the node's name adds nothing.
fn visible_children(node: &AriaNode) -> Vec<&AriaChild> {
    node.children
        .iter()
        .filter(|child| match child {
            AriaChild::Text(text) => text.as_str() != node.name,
            AriaChild::Node(_) => true,
        })
        .collect()
}

/// Write the key line (and properties) of `node`; returns the children still
/// to be written.
pub(crate) fn write_header<'a>(
    lines: &mut Vec<String>,
    indent: &str,
    prefix: &str,
    node: &'a AriaNode,
) -> Body<'a> {
    let key = escape_key(&create_key(node));
    let children = visible_children(node);
    let url = node.attributes.url.as_deref();

    if url.is_none() {
        match children.as_slice() {
            [] => {
                lines.push(format!("{indent}- {prefix}{key}"));
                return Body::Empty;
            }
            [AriaChild::Text(text)] => {
                lines.push(format!("{indent}- {prefix}{key}: {}", escape_value(text)));
                return Body::Inline;
            }
            _ => {}
        }
    }

    lines.push(format!("{indent}- {prefix}{key}:"));
    if let Some(url) = url {
        lines.push(format!("{indent}  - /url: {}", escape_value(url)));
    }
    Body::Block(children)
}

pub(crate) fn write_text(lines: &mut Vec<String>, indent: &str, text: &str) {
    lines.push(format!("{indent}- text: {}", escape_value(text)));
}

/// Double-quoted string with JSON escaping.
fn quote(value: &str) -> String {
    serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
}

/// Quote a scalar value when YAML would misread it.
pub(crate) fn escape_value(value: &str) -> String {
    if needs_quotes(value) {
        quote(value)
    } else {
        value.to_string()
    }
}

/// Single-quote a mapping key when YAML would misread it.
pub(crate) fn escape_key(key: &str) -> String {
    if needs_quotes(key) {
        format!("'{}'", key.replace('\'', "''"))
    } else {
        key.to_string()
    }
}

fn needs_quotes(value: &str) -> bool {
    if value.is_empty() || value.trim() != value {
        return true;
    }
    if value.starts_with([
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ]) {
        return true;
    }
    if value.contains(": ")
        || value.contains(" #")
        || value.ends_with(':')
        || value.contains(['\n', '\r', '\t'])
    {
        return true;
    }
    if value.parse::<f64>().is_ok() {
        return true;
    }
    matches!(
        value.to_ascii_lowercase().as_str(),
        "true" | "false" | "null" | "~" | "yes" | "no" | "on" | "off"
    )
}

#[cfg(test)]
#[path = "render_tests.rs"]
mod tests;
