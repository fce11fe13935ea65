//! Full-tree capture through the in-memory host engine.
//!
//! Covers ref allocation and reuse, eligibility, collapsing and the rendered
//! annotations of a single frame.

use std::sync::Arc;

use ariasnap_core::{SnapshotError, SnapshotOptions, Snapshotter, ViewportPosition};
use ariasnap_host_static::{HtmlAriaProvider, StaticDocument, StaticPage};
use ariasnap_protocols::NodeId;

// ============================================================================
// Test Helpers
// ============================================================================

fn snapshotter(page: &Arc<StaticPage>) -> Snapshotter {
    Snapshotter::new(page.clone(), Arc::new(HtmlAriaProvider::new()))
}

async fn full(snapshotter: &Snapshotter) -> String {
    snapshotter
        .snapshot(&SnapshotOptions::full())
        .await
        .unwrap()
        .full
}

fn lines(lines: &[&str]) -> String {
    lines.join("\n")
}

fn button(doc: &mut StaticDocument, label: &str) -> NodeId {
    let button = doc.append_element(doc.body(), "button");
    doc.append_text(button, label);
    button
}

// ============================================================================
// Refs
// ============================================================================

#[tokio::test]
async fn test_refs_in_document_order() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    button(&mut doc, "One");
    button(&mut doc, "Two");
    let page = StaticPage::new(doc);
    let snapshotter = snapshotter(&page);

    assert_eq!(
        full(&snapshotter).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - button \"One\" [visible] [ref=e2]",
            "  - button \"Two\" [visible] [ref=e3]",
        ])
    );
}

#[tokio::test]
async fn test_renamed_element_gets_new_ref() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let one = button(&mut doc, "One");
    let two = button(&mut doc, "Two");
    let page = StaticPage::new(doc);
    let snapshotter = snapshotter(&page);
    full(&snapshotter).await;

    page.update_main(|doc| doc.set_text_content(two, "Not Two"));
    assert_eq!(
        full(&snapshotter).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - button \"One\" [visible] [ref=e2]",
            "  - button \"Not Two\" [visible] [ref=e4]",
        ])
    );

    assert_eq!(snapshotter.resolve("e2").await.unwrap().node, one);
    assert_eq!(snapshotter.resolve("e4").await.unwrap().node, two);
    let err = snapshotter.resolve("e3").await.unwrap_err();
    assert_eq!(err.to_string(), "No element matching aria-ref=e3");
}

#[tokio::test]
async fn test_unrelated_mutation_keeps_refs() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let one = button(&mut doc, "One");
    let two = button(&mut doc, "Two");
    let page = StaticPage::new(doc);
    let snapshotter = snapshotter(&page);
    full(&snapshotter).await;

    let first = page.update_main(|doc| {
        let first = doc.create_element("button");
        doc.append_text(first, "Zero");
        let body = doc.body();
        doc.insert_before(body, first, one);
        first
    });
    let tree = snapshotter.capture_tree(None).await.unwrap();
    let refs: Vec<(&str, &str)> = tree
        .descendants()
        .into_iter()
        .filter(|node| node.role == "button")
        .map(|node| (node.name.as_str(), node.aria_ref.as_deref().unwrap_or("")))
        .collect();
    assert_eq!(refs, vec![("Zero", "e4"), ("One", "e2"), ("Two", "e3")]);
    assert_eq!(snapshotter.resolve("e4").await.unwrap().node, first);
    assert_eq!(snapshotter.resolve("e3").await.unwrap().node, two);
}

#[tokio::test]
async fn test_removed_element_ref_fails() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    button(&mut doc, "Keep");
    let gone = button(&mut doc, "Gone");
    let page = StaticPage::new(doc);
    let snapshotter = snapshotter(&page);
    full(&snapshotter).await;
    assert!(snapshotter.resolve("e3").await.is_ok());

    page.update_main(|doc| doc.remove(gone));
    assert!(matches!(
        snapshotter.resolve("e3").await,
        Err(SnapshotError::UnknownRef(r)) if r == "e3"
    ));

    // A capture while it is detached forgets the element for good.
    full(&snapshotter).await;
    page.update_main(|doc| {
        let body = doc.body();
        doc.append_child(body, gone);
    });
    assert_eq!(
        full(&snapshotter).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - button \"Keep\" [visible] [ref=e2]",
            "  - button \"Gone\" [visible] [ref=e4]",
        ])
    );
    assert_eq!(snapshotter.resolve("e4").await.unwrap().node, gone);
    assert!(snapshotter.resolve("e3").await.is_err());
}

#[tokio::test]
async fn test_malformed_refs() {
    let page = StaticPage::new(StaticDocument::new(800.0, 600.0));
    let snapshotter = snapshotter(&page);
    for bad in ["", "e", "x1", "f1", "e1"] {
        let err = snapshotter.resolve(bad).await.unwrap_err();
        assert_eq!(err.to_string(), format!("No element matching aria-ref={bad}"));
    }
}

// ============================================================================
// Eligibility and annotations
// ============================================================================

#[tokio::test]
async fn test_pointer_events_none_has_no_ref() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let outer = doc.append_element(doc.body(), "div");
    doc.set_style(outer, "pointer-events: none");
    let blocked = doc.append_element(outer, "button");
    doc.append_text(blocked, "Blocked");
    let inner = doc.append_element(outer, "div");
    doc.set_style(inner, "pointer-events: auto");
    let allowed = doc.append_element(inner, "button");
    doc.append_text(allowed, "Allowed");
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - generic:",
            "    - button \"Blocked\"",
            "    - button \"Allowed\" [visible] [ref=e2]",
        ])
    );
}

#[tokio::test]
async fn test_cursor_pointer_not_repeated_on_descendants() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let heading = doc.append_element(doc.body(), "h1");
    doc.append_text(heading, "Menu");
    let clickable = doc.append_element(doc.body(), "div");
    doc.set_style(clickable, "cursor: pointer");
    let inner = doc.append_element(clickable, "button");
    doc.append_text(inner, "Inner");
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - heading \"Menu\" [level=1] [visible] [ref=e2]",
            "  - generic [visible] [ref=e3] [cursor=pointer]:",
            "    - button \"Inner\" [visible] [ref=e4]",
        ])
    );
}

#[tokio::test]
async fn test_wrappers_collapse_to_single_target() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let outer = doc.append_element(doc.body(), "div");
    let inner = doc.append_element(outer, "div");
    let link = doc.append(inner, "a", &[("href", "/docs")]);
    doc.append_text(link, "Docs");
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&["- link \"Docs\" [visible] [ref=e1]:", "  - /url: /docs"])
    );
}

#[tokio::test]
async fn test_inline_text_runs_merge() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let heading = doc.append_element(doc.body(), "h2");
    doc.append_text(heading, "Listing");
    let facts = doc.append_element(doc.body(), "div");
    let beds = doc.append_element(facts, "b");
    doc.append_text(beds, "3");
    doc.append_text(facts, " ");
    let unit = doc.append_element(facts, "abbr");
    doc.append_text(unit, "bds");
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - heading \"Listing\" [level=2] [visible] [ref=e2]",
            "  - generic [visible] [ref=e3]: 3 bds",
        ])
    );
}

#[tokio::test]
async fn test_generic_named_by_title() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    button(&mut doc, "Save");
    doc.append(doc.body(), "div", &[("title", "Unsaved changes")]);
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&[
            "- generic [active] [visible] [ref=e1]:",
            "  - button \"Save\" [visible] [ref=e2]",
            "  - generic \"Unsaved changes\" [visible] [ref=e3]",
        ])
    );
}

#[tokio::test]
async fn test_visible_child_of_hidden_parent() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let hidden = doc.append_element(doc.body(), "div");
    doc.set_style(hidden, "visibility: hidden");
    doc.append_text(hidden, "invisible text");
    let shown = doc.append_element(hidden, "button");
    doc.set_style(shown, "visibility: visible");
    doc.append_text(shown, "Shown");
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        "- button \"Shown\" [visible] [ref=e1]"
    );
}

#[tokio::test]
async fn test_focused_element_is_active() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    button(&mut doc, "Go");
    let input = doc.append(doc.body(), "input", &[("placeholder", "Search")]);
    doc.focus(input);
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&[
            "- generic [visible] [ref=e1]:",
            "  - button \"Go\" [visible] [ref=e2]",
            "  - textbox \"Search\" [active] [visible] [ref=e3]",
        ])
    );
}

#[tokio::test]
async fn test_offscreen_elements() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    let top = button(&mut doc, "Top");
    doc.set_rect(top, 0.0, 0.0, 100.0, 20.0);
    let bottom = button(&mut doc, "Bottom");
    doc.set_rect(bottom, 0.0, 1500.0, 100.0, 20.0);
    let page = StaticPage::new(doc);
    let snapshotter = snapshotter(&page);

    let position = |tree: &ariasnap_core::AriaNode, name: &str| {
        tree.descendants()
            .into_iter()
            .find(|node| node.name == name)
            .and_then(|node| node.viewport)
    };
    let tree = snapshotter.capture_tree(None).await.unwrap();
    assert_eq!(position(&tree, "Top"), Some(ViewportPosition::Visible));
    assert_eq!(
        position(&tree, "Bottom").map(|p| p.to_string()),
        Some("offscreen:below".to_string())
    );

    page.update_main(|doc| doc.scroll_to(0.0, 1400.0));
    let tree = snapshotter.capture_tree(None).await.unwrap();
    assert_eq!(
        position(&tree, "Top").map(|p| p.to_string()),
        Some("offscreen:above".to_string())
    );
    assert_eq!(position(&tree, "Bottom"), Some(ViewportPosition::Visible));
}

#[tokio::test]
async fn test_document_without_window() {
    let mut doc = StaticDocument::new(800.0, 600.0);
    button(&mut doc, "One");
    button(&mut doc, "Two");
    doc.set_window(None);
    let page = StaticPage::new(doc);

    assert_eq!(
        full(&snapshotter(&page)).await,
        lines(&[
            "- generic [active] [ref=e1]:",
            "  - button \"One\" [ref=e2]",
            "  - button \"Two\" [ref=e3]",
        ])
    );
}
