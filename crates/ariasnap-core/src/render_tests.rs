use super::*;
use crate::geometry::{Vertical, ViewportPosition};

fn node(role: &str, name: &str, aria_ref: Option<&str>) -> AriaNode {
    let mut node = AriaNode::new(role, name);
    node.aria_ref = aria_ref.map(str::to_string);
    node
}

fn text(value: &str) -> AriaChild {
    AriaChild::Text(value.to_string())
}

#[test]
fn test_render_nested_tree() {
    let mut root = node("generic", "", Some("e1"));
    root.active = true;
    let mut heading = node("heading", "Title", Some("e2"));
    heading.attributes.level = Some(1);
    heading.viewport = Some(ViewportPosition::Visible);
    heading.children = vec![text("Title")];
    let mut link = node("link", "Docs", Some("e3"));
    link.attributes.url = Some("/docs".to_string());
    link.cursor_pointer = true;
    link.viewport = Some(ViewportPosition::Visible);
    link.children = vec![text("Docs")];
    root.children = vec![
        AriaChild::Node(heading),
        AriaChild::Node(link),
        text("Loose text"),
    ];

    assert_eq!(
        render_tree(&root),
        [
            "- generic [active] [ref=e1]:",
            "  - heading \"Title\" [level=1] [visible] [ref=e2]",
            "  - link \"Docs\" [visible] [ref=e3] [cursor=pointer]:",
            "    - /url: /docs",
            "  - text: Loose text",
        ]
        .join("\n")
    );
}

#[test]
fn test_single_text_child_inline() {
    let mut item = node("listitem", "", Some("e2"));
    item.children = vec![text("item 1")];
    assert_eq!(render_tree(&item), "- listitem [ref=e2]: item 1");
}

#[test]
fn test_state_annotations_order() {
    let mut checkbox = node("checkbox", "Agree", Some("e5"));
    checkbox.attributes.checked = Some(CheckedState::Mixed);
    checkbox.attributes.disabled = true;
    checkbox.active = true;
    checkbox.viewport = Some(ViewportPosition::Offscreen {
        vertical: Some(Vertical::Below),
        horizontal: None,
    });
    assert_eq!(
        render_tree(&checkbox),
        "- checkbox \"Agree\" [checked=mixed] [disabled] [active] [offscreen:below] [ref=e5]"
    );

    let mut toggle = node("button", "Bold", None);
    toggle.attributes.pressed = Some(CheckedState::True);
    toggle.attributes.expanded = Some(true);
    toggle.attributes.selected = true;
    assert_eq!(
        render_tree(&toggle),
        "- button \"Bold\" [expanded] [pressed] [selected]"
    );
}

#[test]
fn test_unchecked_renders_nothing() {
    let mut checkbox = node("checkbox", "", None);
    checkbox.attributes.checked = Some(CheckedState::False);
    assert_eq!(render_tree(&checkbox), "- checkbox");
}

#[test]
fn test_iframe_without_content() {
    let iframe = node("iframe", "", Some("e4"));
    assert_eq!(render_tree(&iframe), "- iframe [ref=e4]");
}

#[test]
fn test_escape_values() {
    assert_eq!(escape_value("plain text"), "plain text");
    assert_eq!(escape_value("1,200"), "1,200");
    assert_eq!(escape_value("3"), "\"3\"");
    assert_eq!(escape_value("true"), "\"true\"");
    assert_eq!(escape_value("- dash"), "\"- dash\"");
    assert_eq!(escape_value("key: value"), "\"key: value\"");
    assert_eq!(escape_value("say \"hi\" #1"), "\"say \\\"hi\\\" #1\"");
}

#[test]
fn test_escape_keys() {
    assert_eq!(escape_key("button \"Go\""), "button \"Go\"");
    assert_eq!(escape_key("button \"a: b\""), "'button \"a: b\"'");
    assert_eq!(escape_key("'quoted"), "'''quoted'");
}

#[test]
fn test_name_quoting() {
    let button = node("button", "say \"hi\"", None);
    assert_eq!(render_tree(&button), "- button \"say \\\"hi\\\"\"");
}
