//! # ariasnap
//!
//! Accessibility snapshots of live pages with stable element refs and
//! incremental diffs.
//!
//! ## Crates
//!
//! - [`protocols`] - Host interfaces: documents, frames, pages and ARIA semantics
//! - [`config`] - TOML configuration
//! - [`core`] - Capture, ref resolution and diff engine
//!
//! A host engine implements [`protocols::PageHandle`] and
//! [`protocols::AriaProvider`]; everything else lives in [`Snapshotter`].

pub mod logging;

pub use ariasnap_config as config;
pub use ariasnap_core as core;
pub use ariasnap_protocols as protocols;

pub use ariasnap_config::Config;
pub use ariasnap_core::{
    ResolvedElement, Snapshot, SnapshotError, SnapshotMode, SnapshotOptions, Snapshotter,
};
