//! Viewport position of an element relative to the top-level visible area.

use std::fmt;
use std::str::FromStr;

use ariasnap_protocols::{DomError, DomView, Rect, VisualViewport};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Vertical {
    Above,
    Below,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Horizontal {
    Left,
    Right,
}

/// Where an element sits relative to the visible area.
///
/// Rendered as `visible` or `offscreen:<dir>` where `<dir>` joins the vertical
/// and horizontal tokens with `-`, e.g. `offscreen:above-left`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum ViewportPosition {
    Visible,
    Offscreen {
        vertical: Option<Vertical>,
        horizontal: Option<Horizontal>,
    },
}

impl ViewportPosition {
    pub fn is_visible(&self) -> bool {
        matches!(self, Self::Visible)
    }
}

impl fmt::Display for ViewportPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (vertical, horizontal) = match self {
            Self::Visible => return f.write_str("visible"),
            Self::Offscreen {
                vertical,
                horizontal,
            } => (vertical, horizontal),
        };
        let tokens: Vec<&str> = [
            vertical.map(|v| match v {
                Vertical::Above => "above",
                Vertical::Below => "below",
            }),
            horizontal.map(|h| match h {
                Horizontal::Left => "left",
                Horizontal::Right => "right",
            }),
        ]
        .into_iter()
        .flatten()
        .collect();
        write!(f, "offscreen:{}", tokens.join("-"))
    }
}

impl FromStr for ViewportPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "visible" {
            return Ok(Self::Visible);
        }
        let dir = s
            .strip_prefix("offscreen:")
            .ok_or_else(|| format!("invalid viewport position: {s}"))?;
        let mut vertical = None;
        let mut horizontal = None;
        for token in dir.split('-') {
            match token {
                "above" => vertical = Some(Vertical::Above),
                "below" => vertical = Some(Vertical::Below),
                "left" => horizontal = Some(Horizontal::Left),
                "right" => horizontal = Some(Horizontal::Right),
                other => return Err(format!("invalid viewport direction: {other}")),
            }
        }
        if vertical.is_none() && horizontal.is_none() {
            return Err(format!("invalid viewport position: {s}"));
        }
        Ok(Self::Offscreen {
            vertical,
            horizontal,
        })
    }
}

impl From<ViewportPosition> for String {
    fn from(position: ViewportPosition) -> Self {
        position.to_string()
    }
}

impl TryFrom<String> for ViewportPosition {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Transform from a frame's client coordinates into the top-level visual
/// viewport, plus the size of that viewport.
///
/// A point `(x, y)` in the frame maps to `(x + offset_x, y + offset_y)` in the
/// top-level visible area, which spans `(0, 0)..(width, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MainFrameViewport {
    pub offset_x: f64,
    pub offset_y: f64,
    pub width: f64,
    pub height: f64,
}

impl MainFrameViewport {
    /// Transform for the top-level frame itself.
    pub fn top_level(dom: &dyn DomView) -> Result<Self, DomError> {
        let viewport = dom.visual_viewport()?;
        let inner = dom.inner_size()?;
        Ok(Self::from_viewport(viewport, inner))
    }

    pub fn from_viewport(viewport: Option<VisualViewport>, inner: Option<(f64, f64)>) -> Self {
        let (inner_width, inner_height) = inner.unwrap_or((0.0, 0.0));
        match viewport {
            Some(vv) => Self {
                offset_x: -vv.offset_left,
                offset_y: -vv.offset_top,
                width: vv.width,
                height: vv.height,
            },
            None => Self {
                offset_x: 0.0,
                offset_y: 0.0,
                width: inner_width,
                height: inner_height,
            },
        }
    }

    /// Transform for a child frame hosted by an iframe whose client rect in
    /// this frame is `iframe_rect`, with its content box inset by
    /// `content_offset`.
    pub fn compose(&self, iframe_rect: &Rect, content_offset: (f64, f64)) -> Self {
        Self {
            offset_x: self.offset_x + iframe_rect.x + content_offset.0,
            offset_y: self.offset_y + iframe_rect.y + content_offset.1,
            width: self.width,
            height: self.height,
        }
    }
}

/// Position of `rect` relative to the visible area.
///
/// With a `transform` the rect is mapped into the top-level viewport; without
/// one it is compared against the frame's own visual viewport. `None` when the
/// rect is missing or zero-sized, or when there is no window to measure.
pub fn compute_viewport_position(
    rect: Option<&Rect>,
    dom: &dyn DomView,
    transform: Option<&MainFrameViewport>,
) -> Result<Option<ViewportPosition>, DomError> {
    let Some(rect) = rect else {
        return Ok(None);
    };
    if rect.is_empty() {
        return Ok(None);
    }
    let Some(inner) = dom.inner_size()? else {
        return Ok(None);
    };

    let (viewport, element) = match transform {
        Some(t) => (
            Rect::new(0.0, 0.0, t.width, t.height),
            rect.translate(t.offset_x, t.offset_y),
        ),
        None => {
            let vv = dom.visual_viewport()?;
            let viewport = match vv {
                Some(vv) => Rect::new(vv.offset_left, vv.offset_top, vv.width, vv.height),
                None => Rect::new(0.0, 0.0, inner.0, inner.1),
            };
            (viewport, *rect)
        }
    };
    if viewport.width == 0.0 || viewport.height == 0.0 {
        return Ok(None);
    }

    let intersects_x = element.right() > viewport.left() && element.left() < viewport.right();
    let intersects_y = element.bottom() > viewport.top() && element.top() < viewport.bottom();
    if intersects_x && intersects_y {
        return Ok(Some(ViewportPosition::Visible));
    }

    let vertical = if element.bottom() <= viewport.top() {
        Some(Vertical::Above)
    } else if element.top() >= viewport.bottom() {
        Some(Vertical::Below)
    } else {
        None
    };
    let horizontal = if element.right() <= viewport.left() {
        Some(Horizontal::Left)
    } else if element.left() >= viewport.right() {
        Some(Horizontal::Right)
    } else {
        None
    };
    Ok(Some(ViewportPosition::Offscreen {
        vertical,
        horizontal,
    }))
}
