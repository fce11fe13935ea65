//! In-memory host engine for ariasnap.
//!
//! Documents are built programmatically and laid out with explicit rectangles
//! in document coordinates. There is no rendering: computed styles come from
//! inline declarations, simple inheritance and a small user-agent table.
//!
//! ## Pieces
//!
//! - [`StaticDocument`] - a mutable document implementing [`DomView`](ariasnap_protocols::DomView)
//! - [`StaticFrame`] - a frame with a controllable availability state
//! - [`StaticPage`] - a set of frames with focus propagation across iframes
//! - [`HtmlAriaProvider`] - HTML role and accessible-name rules

mod aria;
mod document;
mod dom_view;
mod frame;
mod page;
mod style;

pub use aria::HtmlAriaProvider;
pub use document::StaticDocument;
pub use frame::{FrameStatus, Settle, StaticFrame};
pub use page::StaticPage;
