//! # ariasnap core
//!
//! Accessibility snapshot engine with stable element refs and incremental
//! diffs.
//!
//! ## Components
//!
//! - [`Snapshotter`] - Page-scoped capture, ref resolution and diff tracks
//! - [`RefRegistry`] - Per-frame ref allocation keyed by role and name
//! - [`render_tree`] / [`render_delta`] - Text output of full trees and changes
//! - [`geometry`] - Element boxes, visibility and viewport positions
//!
//! ## Capture pipeline
//!
//! Every frame is walked on its own execution context, collapsed and given
//! refs from its own registry. Child frames are captured concurrently and
//! stitched under their iframe nodes in document order. A child frame that
//! cannot be read leaves an empty iframe node; only a main frame failure fails
//! the capture.

mod builder;
mod collapse;
mod diff;
mod error;
pub mod geometry;
mod refs;
mod render;
mod session;
mod stitch;
mod style_cache;
mod tracks;
mod tree;

pub use diff::render_delta;
pub use error::SnapshotError;
pub use geometry::{ElementBox, MainFrameViewport, ViewportPosition};
pub use refs::{RefId, RefRegistry};
pub use render::render_tree;
pub use session::{ResolvedElement, Snapshot, SnapshotMode, SnapshotOptions, Snapshotter};
pub use style_cache::{CacheScope, StyleCache};
pub use tree::{AriaChild, AriaNode};
