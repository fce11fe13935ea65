//! HTML role and accessible-name rules.

use ariasnap_protocols::{
    AriaAttributes, AriaProvider, CheckedState, DomError, DomView, NodeId, NodeType, ParentLink,
};

/// ARIA semantics for HTML documents.
///
/// Covers the implicit roles of common elements, explicit `role`,
/// `aria-label`, labels for form controls and names computed from content.
/// `aria-labelledby` and CSS generated content are not supported.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlAriaProvider;

const NAME_FROM_CONTENT: &[&str] = &[
    "button",
    "cell",
    "checkbox",
    "columnheader",
    "gridcell",
    "heading",
    "link",
    "menuitem",
    "menuitemcheckbox",
    "menuitemradio",
    "option",
    "radio",
    "row",
    "rowheader",
    "switch",
    "tab",
    "tooltip",
    "treeitem",
];

const EXCLUDED_TAGS: &[&str] = &[
    "HEAD", "SCRIPT", "STYLE", "TEMPLATE", "NOSCRIPT", "META", "LINK", "TITLE",
];

impl HtmlAriaProvider {
    pub fn new() -> Self {
        Self
    }

    fn implicit_role(
        &self,
        dom: &dyn DomView,
        element: NodeId,
    ) -> Result<Option<&'static str>, DomError> {
        let tag = dom.tag_name(element)?;
        let attr = |name: &str| dom.attribute(element, name);
        Ok(match tag.as_str() {
            "A" | "AREA" => attr("href")?.map(|_| "link"),
            "ARTICLE" => Some("article"),
            "ASIDE" => Some("complementary"),
            "BLOCKQUOTE" => Some("blockquote"),
            "BUTTON" => Some("button"),
            "CODE" => Some("code"),
            "DETAILS" | "FIELDSET" => Some("group"),
            "DIALOG" => Some("dialog"),
            "EM" => Some("emphasis"),
            "FOOTER" => Some("contentinfo"),
            "FORM" => Some("form"),
            "H1" | "H2" | "H3" | "H4" | "H5" | "H6" => Some("heading"),
            "HEADER" => Some("banner"),
            "HR" => Some("separator"),
            "IFRAME" | "FRAME" => Some("iframe"),
            "IMG" => match attr("alt")?.as_deref() {
                Some("") => Some("presentation"),
                _ => Some("img"),
            },
            "INPUT" => input_role(attr("type")?.as_deref()),
            "LI" => Some("listitem"),
            "MAIN" => Some("main"),
            "NAV" => Some("navigation"),
            "OL" | "UL" | "MENU" => Some("list"),
            "OPTION" => Some("option"),
            "P" => Some("paragraph"),
            "PROGRESS" => Some("progressbar"),
            "SECTION" => {
                let named = attr("aria-label")?.is_some() || attr("title")?.is_some();
                named.then_some("region")
            }
            "SELECT" => {
                let multiple = attr("multiple")?.is_some();
                let size = attr("size")?
                    .and_then(|s| s.parse::<u32>().ok())
                    .unwrap_or(0);
                if multiple || size > 1 {
                    Some("listbox")
                } else {
                    Some("combobox")
                }
            }
            "STRONG" => Some("strong"),
            "TABLE" => Some("table"),
            "TD" => Some("cell"),
            "TEXTAREA" => Some("textbox"),
            "TH" => Some("columnheader"),
            "TR" => Some("row"),
            _ => None,
        })
    }

    /// Visible text of a subtree, one piece per text node, joined by spaces.
    fn text_from_content(&self, dom: &dyn DomView, node: NodeId) -> Result<String, DomError> {
        let mut pieces = Vec::new();
        self.collect_text(dom, node, &mut pieces)?;
        Ok(normalize(&pieces.join(" ")))
    }

    fn collect_text(
        &self,
        dom: &dyn DomView,
        node: NodeId,
        pieces: &mut Vec<String>,
    ) -> Result<(), DomError> {
        match dom.node_type(node)? {
            NodeType::Text => {
                if dom.text_rect(node)?.has_area() {
                    pieces.push(dom.text(node)?);
                }
            }
            NodeType::Element => {
                if self.is_hidden(dom, node)? {
                    return Ok(());
                }
                let children = match dom.shadow_root(node)? {
                    Some(root) => dom.child_nodes(root)?,
                    None => dom.child_nodes(node)?,
                };
                for child in children {
                    self.collect_text(dom, child, pieces)?;
                }
            }
            NodeType::ShadowRoot | NodeType::Other => {}
        }
        Ok(())
    }

    /// Text of the `<label>` wrapping a form control, without the control.
    fn label_text(&self, dom: &dyn DomView, control: NodeId) -> Result<Option<String>, DomError> {
        let mut current = control;
        while let Some(ParentLink::Tree(parent)) = dom.parent(current)? {
            if dom.node_type(parent)? != NodeType::Element {
                break;
            }
            if dom.tag_name(parent)? == "LABEL" {
                let text = self.text_from_content(dom, parent)?;
                return Ok((!text.is_empty()).then_some(text));
            }
            current = parent;
        }
        Ok(None)
    }

    fn explicit_attribute(
        &self,
        dom: &dyn DomView,
        element: NodeId,
        name: &str,
    ) -> Result<Option<String>, DomError> {
        Ok(dom
            .attribute(element, name)?
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty()))
    }
}

fn input_role(input_type: Option<&str>) -> Option<&'static str> {
    match input_type.map(str::to_ascii_lowercase).as_deref() {
        Some("button" | "submit" | "reset" | "image") => Some("button"),
        Some("checkbox") => Some("checkbox"),
        Some("radio") => Some("radio"),
        Some("range") => Some("slider"),
        Some("number") => Some("spinbutton"),
        Some("search") => Some("searchbox"),
        Some("hidden") => None,
        _ => Some("textbox"),
    }
}

fn normalize(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn tri_state(value: Option<&str>) -> Option<CheckedState> {
    match value {
        Some("true") => Some(CheckedState::True),
        Some("false") => Some(CheckedState::False),
        Some("mixed") => Some(CheckedState::Mixed),
        _ => None,
    }
}

impl AriaProvider for HtmlAriaProvider {
    fn role(&self, dom: &dyn DomView, element: NodeId) -> Result<Option<String>, DomError> {
        if let Some(explicit) = dom.attribute(element, "role")? {
            if let Some(first) = explicit.split_whitespace().next() {
                return Ok(Some(first.to_ascii_lowercase()));
            }
        }
        Ok(self.implicit_role(dom, element)?.map(str::to_string))
    }

    fn accessible_name(&self, dom: &dyn DomView, element: NodeId) -> Result<String, DomError> {
        if let Some(label) = self.explicit_attribute(dom, element, "aria-label")? {
            return Ok(normalize(&label));
        }

        let tag = dom.tag_name(element)?;
        let role = self.role(dom, element)?.unwrap_or_default();
        match tag.as_str() {
            "INPUT" | "TEXTAREA" | "SELECT" => {
                let input_type = dom
                    .attribute(element, "type")?
                    .unwrap_or_default()
                    .to_ascii_lowercase();
                if tag == "INPUT" && matches!(input_type.as_str(), "button" | "submit" | "reset") {
                    let fallback = match input_type.as_str() {
                        "submit" => "Submit",
                        "reset" => "Reset",
                        _ => "",
                    };
                    return Ok(self
                        .explicit_attribute(dom, element, "value")?
                        .unwrap_or_else(|| fallback.to_string()));
                }
                if let Some(label) = self.label_text(dom, element)? {
                    return Ok(label);
                }
                for attribute in ["placeholder", "title"] {
                    if let Some(value) = self.explicit_attribute(dom, element, attribute)? {
                        return Ok(normalize(&value));
                    }
                }
                return Ok(String::new());
            }
            "IMG" => {
                if let Some(alt) = self.explicit_attribute(dom, element, "alt")? {
                    return Ok(normalize(&alt));
                }
            }
            _ => {}
        }

        if NAME_FROM_CONTENT.contains(&role.as_str()) {
            let text = self.text_from_content(dom, element)?;
            if !text.is_empty() {
                return Ok(text);
            }
        }
        Ok(self
            .explicit_attribute(dom, element, "title")?
            .map(|title| normalize(&title))
            .unwrap_or_default())
    }

    fn attributes(&self, dom: &dyn DomView, element: NodeId) -> Result<AriaAttributes, DomError> {
        let tag = dom.tag_name(element)?;
        let role = self.role(dom, element)?.unwrap_or_default();
        let attr = |name: &str| dom.attribute(element, name);
        let mut attributes = AriaAttributes::default();

        if matches!(
            role.as_str(),
            "checkbox" | "radio" | "switch" | "menuitemcheckbox" | "menuitemradio"
        ) {
            attributes.checked = match tri_state(attr("aria-checked")?.as_deref()) {
                Some(state) => Some(state),
                None if tag == "INPUT" => Some(if attr("checked")?.is_some() {
                    CheckedState::True
                } else {
                    CheckedState::False
                }),
                None => None,
            };
        }

        let form_control = matches!(
            tag.as_str(),
            "BUTTON" | "INPUT" | "SELECT" | "TEXTAREA" | "OPTION" | "FIELDSET"
        );
        attributes.disabled = (form_control && attr("disabled")?.is_some())
            || attr("aria-disabled")?.as_deref() == Some("true");

        attributes.expanded = match attr("aria-expanded")?.as_deref() {
            Some("true") => Some(true),
            Some("false") => Some(false),
            _ => None,
        };

        attributes.level = match tag.as_bytes() {
            [b'H', digit @ b'1'..=b'6'] => Some(u32::from(digit - b'0')),
            _ => None,
        };
        if let Some(level) = attr("aria-level")?.and_then(|v| v.trim().parse::<u32>().ok()) {
            if role == "heading" {
                attributes.level = Some(level);
            }
        }

        if role == "button" {
            attributes.pressed = tri_state(attr("aria-pressed")?.as_deref());
        }

        attributes.selected = attr("aria-selected")?.as_deref() == Some("true")
            || (tag == "OPTION" && attr("selected")?.is_some());

        if role == "link" {
            attributes.url = attr("href")?;
        }

        Ok(attributes)
    }

    fn is_hidden(&self, dom: &dyn DomView, element: NodeId) -> Result<bool, DomError> {
        let tag = dom.tag_name(element)?;
        if EXCLUDED_TAGS.contains(&tag.as_str()) {
            return Ok(true);
        }
        if tag == "INPUT"
            && dom
                .attribute(element, "type")?
                .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        {
            return Ok(true);
        }
        Ok(dom.attribute(element, "aria-hidden")?.as_deref() == Some("true"))
    }
}

#[cfg(test)]
#[path = "aria_tests.rs"]
mod tests;
