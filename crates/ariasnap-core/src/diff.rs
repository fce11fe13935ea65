//! Incremental rendering against a baseline tree.
//!
//! Nodes are matched to the baseline by ref where they have one and by
//! position otherwise. Each node is classified as:
//!
//! - `Same`: it and its whole subtree render exactly as before
//! - `Skip`: it renders as before and keeps its child list, but something
//!   inside a ref-bearing child changed
//! - `Changed`: anything else
//!
//! Every maximal changed subtree is written as a chunk whose header carries a
//! `<changed>` prefix. Inside a chunk, unchanged ref-bearing children collapse
//! to `ref=<id> [unchanged]`. An iframe's content is compared as a scope of
//! its own and reported after the chunk that contains the iframe.

use std::collections::HashMap;

use crate::render::{Body, create_key, escape_key, write_header, write_text};
use crate::tree::{AriaChild, AriaNode};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Same,
    Skip,
    Changed,
}

struct Marked<'a> {
    node: &'a AriaNode,
    status: Status,
    /// Iframes only: the frame content was added, removed or replaced.
    scope_changed: bool,
    /// One entry per child; `None` for text.
    children: Vec<Option<Marked<'a>>>,
}

struct Comparator<'b> {
    by_ref: HashMap<&'b str, &'b AriaNode>,
}

impl<'b> Comparator<'b> {
    fn new(baseline: &'b AriaNode) -> Self {
        let by_ref = baseline
            .descendants()
            .into_iter()
            .filter_map(|node| node.aria_ref.as_deref().map(|r| (r, node)))
            .collect();
        Self { by_ref }
    }

    fn visit<'a>(&self, node: &'a AriaNode, previous: Option<&'b AriaNode>) -> Marked<'a> {
        let previous_children: &[AriaChild] = previous
            .map(|p| p.children.as_slice())
            .unwrap_or_default();
        let mut members_same = previous_children.len() == node.children.len();
        let mut descendants_same = true;
        let mut changes_contained = true;
        let mut children = Vec::with_capacity(node.children.len());

        for (index, child) in node.children.iter().enumerate() {
            let positional = previous_children.get(index);
            match child {
                AriaChild::Text(text) => {
                    members_same &= matches!(positional, Some(AriaChild::Text(p)) if p == text);
                    children.push(None);
                }
                AriaChild::Node(child) => {
                    let positional = match positional {
                        Some(AriaChild::Node(p)) => Some(p),
                        _ => None,
                    };
                    let matched = match &child.aria_ref {
                        Some(aria_ref) => self.by_ref.get(aria_ref.as_str()).copied(),
                        None => positional,
                    };
                    let marked = self.visit(child, matched);
                    let in_place =
                        matches!((matched, positional), (Some(m), Some(p)) if std::ptr::eq(m, p));
                    let child_same = marked.status == Status::Same;
                    if !in_place || (!child_same && child.aria_ref.is_none()) {
                        changes_contained = false;
                    }
                    members_same &= in_place;
                    descendants_same &= child_same;
                    children.push(Some(marked));
                }
            }
        }

        // A node matched by position may have gained or lost its ref.
        let own_same = previous
            .is_some_and(|p| node.same_attributes(p) && node.aria_ref == p.aria_ref);
        if node.is_iframe() {
            return Marked {
                node,
                status: if own_same { Status::Same } else { Status::Changed },
                scope_changed: !members_same,
                children,
            };
        }

        let status = if own_same && members_same && descendants_same {
            Status::Same
        } else if own_same && members_same && changes_contained {
            Status::Skip
        } else {
            Status::Changed
        };
        Marked {
            node,
            status,
            scope_changed: false,
            children,
        }
    }
}

/// Render what changed in `current` since `baseline`. Empty when nothing did.
pub fn render_delta(current: &AriaNode, baseline: &AriaNode) -> String {
    let comparator = Comparator::new(baseline);
    let previous = match &current.aria_ref {
        Some(aria_ref) => comparator.by_ref.get(aria_ref.as_str()).copied(),
        None => Some(baseline),
    };
    let marked = comparator.visit(current, previous);

    let mut writer = DeltaWriter { lines: Vec::new() };
    writer.visit_changed(&marked);
    writer.lines.join("\n")
}

struct DeltaWriter {
    lines: Vec<String>,
}

impl DeltaWriter {
    /// Find changed subtrees below `marked` and write each as a chunk.
    fn visit_changed(&mut self, marked: &Marked<'_>) {
        if marked.node.is_iframe() {
            if marked.scope_changed {
                self.visit_scope(marked);
            } else {
                if marked.status == Status::Changed {
                    let key = escape_key(&create_key(marked.node));
                    self.lines.push(format!("- <changed> {key}"));
                }
                self.visit_children(marked);
            }
            return;
        }
        match marked.status {
            Status::Same | Status::Skip => self.visit_children(marked),
            Status::Changed => {
                let mut deferred = Vec::new();
                self.write_node(marked, "", "<changed> ", &mut deferred);
                for iframe in deferred {
                    self.visit_scope(iframe);
                }
            }
        }
    }

    fn visit_children(&mut self, marked: &Marked<'_>) {
        for child in marked.children.iter().flatten() {
            self.visit_changed(child);
        }
    }

    /// Report an iframe's content scope: whole when its membership changed,
    /// otherwise only the changed subtrees inside it.
    fn visit_scope(&mut self, iframe: &Marked<'_>) {
        if !iframe.scope_changed {
            self.visit_children(iframe);
            return;
        }
        let key = escape_key(&create_key(iframe.node));
        let colon = if iframe.children.is_empty() { "" } else { ":" };
        self.lines.push(format!("- <changed> {key}{colon}"));
        let mut deferred = Vec::new();
        self.write_children(iframe, "  ", &mut deferred);
        for nested in deferred {
            self.visit_scope(nested);
        }
    }

    /// Write `marked` inside a chunk. Iframes are written as a header only and
    /// pushed to `deferred`.
    fn write_node<'m, 'a>(
        &mut self,
        marked: &'m Marked<'a>,
        indent: &str,
        prefix: &str,
        deferred: &mut Vec<&'m Marked<'a>>,
    ) {
        if marked.node.is_iframe() {
            let key = escape_key(&create_key(marked.node));
            self.lines.push(format!("{indent}- {prefix}{key}"));
            deferred.push(marked);
            return;
        }
        if let Body::Block(_) = write_header(&mut self.lines, indent, prefix, marked.node) {
            self.write_children(marked, &format!("{indent}  "), deferred);
        }
    }

    fn write_children<'m, 'a>(
        &mut self,
        marked: &'m Marked<'a>,
        indent: &str,
        deferred: &mut Vec<&'m Marked<'a>>,
    ) {
        let node = marked.node;
        for (child, child_marked) in node.children.iter().zip(&marked.children) {
            match (child, child_marked) {
                (AriaChild::Text(text), _) => {
                    if *text != node.name {
                        write_text(&mut self.lines, indent, text);
                    }
                }
                (AriaChild::Node(_), Some(child)) => self.write_child(child, indent, deferred),
                (AriaChild::Node(_), None) => {}
            }
        }
    }

    fn write_child<'m, 'a>(
        &mut self,
        marked: &'m Marked<'a>,
        indent: &str,
        deferred: &mut Vec<&'m Marked<'a>>,
    ) {
        if let (Status::Same, Some(aria_ref)) = (marked.status, &marked.node.aria_ref) {
            self.lines.push(format!("{indent}- ref={aria_ref} [unchanged]"));
            collect_iframes(marked, deferred);
            return;
        }
        self.write_node(marked, indent, "", deferred);
    }
}

/// Iframes inside a subtree written as `[unchanged]`; their content may still
/// have changed.
fn collect_iframes<'m, 'a>(marked: &'m Marked<'a>, deferred: &mut Vec<&'m Marked<'a>>) {
    if marked.node.is_iframe() {
        deferred.push(marked);
        return;
    }
    for child in marked.children.iter().flatten() {
        collect_iframes(child, deferred);
    }
}

#[cfg(test)]
#[path = "diff_tests.rs"]
mod tests;
