//! Generic-wrapper collapsing and text normalization.
//!
//! Runs bottom-up in a single pass over a frame's tree, before refs are
//! assigned. A second pass over its output changes nothing.

use crate::tree::{AriaChild, AriaNode};

enum Folded {
    Keep(AriaNode),
    Replace(AriaNode),
    Text(String),
    Drop,
}

/// Collapse the tree rooted at `root`. The root itself may be replaced by its
/// only child but is never removed.
pub(crate) fn collapse_tree(mut root: AriaNode) -> AriaNode {
    normalize_children(&mut root);
    let single_eligible =
        matches!(root.children.as_slice(), [AriaChild::Node(child)] if child.ref_eligible);
    if is_plain_generic(&root) && single_eligible {
        if let Some(AriaChild::Node(child)) = root.children.pop() {
            return child;
        }
    }
    root
}

/// A generic node that adds nothing a reader could use.
fn is_plain_generic(node: &AriaNode) -> bool {
    node.is_generic() && node.name.is_empty() && !node.focused && !node.cursor_pointer
}

fn normalize_children(node: &mut AriaNode) {
    let children = std::mem::take(&mut node.children);
    let mut result: Vec<AriaChild> = Vec::with_capacity(children.len());
    for child in children {
        match child {
            AriaChild::Text(text) => push_text(&mut result, &text),
            AriaChild::Node(mut child) => {
                normalize_children(&mut child);
                match fold(child) {
                    Folded::Keep(node) | Folded::Replace(node) => {
                        result.push(AriaChild::Node(node))
                    }
                    Folded::Text(text) => push_text(&mut result, &text),
                    Folded::Drop => {}
                }
            }
        }
    }
    node.children = result
        .into_iter()
        .filter_map(|child| match child {
            AriaChild::Text(text) => {
                let text = normalize_whitespace(&text);
                (!text.is_empty()).then_some(AriaChild::Text(text))
            }
            node => Some(node),
        })
        .collect();
}

/// Decide what replaces `node`, whose children are already normalized.
fn fold(mut node: AriaNode) -> Folded {
    if !is_plain_generic(&node) {
        return Folded::Keep(node);
    }
    let inline = node.element_box.inline;
    let foldable = match node.children.as_slice() {
        [] => return Folded::Drop,
        [AriaChild::Text(_)] => inline,
        [AriaChild::Node(child)] => child.ref_eligible,
        _ => false,
    };
    if !foldable {
        return Folded::Keep(node);
    }
    match node.children.pop() {
        Some(AriaChild::Text(text)) => Folded::Text(text),
        Some(AriaChild::Node(child)) => Folded::Replace(child),
        None => Folded::Drop,
    }
}

fn push_text(children: &mut Vec<AriaChild>, text: &str) {
    if let Some(AriaChild::Text(last)) = children.last_mut() {
        last.push_str(text);
    } else {
        children.push(AriaChild::Text(text.to_string()));
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
