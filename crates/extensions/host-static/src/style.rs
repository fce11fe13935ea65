//! Inline style declarations and the user-agent defaults the host knows.

use std::collections::BTreeMap;

/// Parse `"prop: value; prop: value"` into lower-case properties.
pub(crate) fn parse_declarations(input: &str) -> BTreeMap<String, String> {
    input
        .split(';')
        .filter_map(|declaration| {
            let (property, value) = declaration.split_once(':')?;
            let property = property.trim().to_ascii_lowercase();
            let value = value.trim().to_ascii_lowercase();
            (!property.is_empty() && !value.is_empty()).then_some((property, value))
        })
        .collect()
}

/// `display` of an element with no author style.
pub(crate) fn default_display(tag: &str) -> &'static str {
    match tag {
        "HTML" | "BODY" | "DIV" | "P" | "UL" | "OL" | "MENU" | "NAV" | "MAIN" | "HEADER"
        | "FOOTER" | "ASIDE" | "SECTION" | "ARTICLE" | "FORM" | "FIELDSET" | "H1" | "H2"
        | "H3" | "H4" | "H5" | "H6" | "BLOCKQUOTE" | "DETAILS" | "SUMMARY" | "DIALOG"
        | "HR" | "PRE" | "FIGURE" => "block",
        "LI" => "list-item",
        "TABLE" => "table",
        "TR" => "table-row",
        "TD" | "TH" => "table-cell",
        "BUTTON" | "INPUT" | "SELECT" | "TEXTAREA" | "IMG" | "PROGRESS" => "inline-block",
        "HEAD" | "SCRIPT" | "STYLE" | "TEMPLATE" | "NOSCRIPT" | "META" | "LINK" | "TITLE" => {
            "none"
        }
        _ => "inline",
    }
}

/// Initial value of an inherited property.
pub(crate) fn initial_value(property: &str) -> &'static str {
    match property {
        "visibility" => "visible",
        "cursor" | "pointer-events" => "auto",
        _ => "",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_declarations() {
        let parsed = parse_declarations("display: none; Cursor:pointer;; bogus");
        assert_eq!(parsed.get("display").map(String::as_str), Some("none"));
        assert_eq!(parsed.get("cursor").map(String::as_str), Some("pointer"));
        assert_eq!(parsed.len(), 2);
    }

    #[test]
    fn test_default_display() {
        assert_eq!(default_display("SPAN"), "inline");
        assert_eq!(default_display("DIV"), "block");
        assert_eq!(default_display("BUTTON"), "inline-block");
        assert_eq!(default_display("SCRIPT"), "none");
    }
}
