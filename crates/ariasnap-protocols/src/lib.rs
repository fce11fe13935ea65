//! # ariasnap protocols
//!
//! Host-facing contracts for the ariasnap snapshot engine.
//! Contains only interface definitions and plain data - no implementations.
//!
//! ## Core Traits
//!
//! - [`DomView`] - Synchronous read access to one frame's document
//! - [`AriaProvider`] - Accessible role/name computation for one host engine
//! - [`FrameHandle`] - Runs document tasks on a frame's own execution context
//! - [`PageHandle`] - Frame lookup for one page

pub mod aria;
pub mod dom;
pub mod error;
pub mod frame;
pub mod types;

pub use aria::{AriaAttributes, AriaProvider, CheckedState};
pub use dom::{DomView, NodeType, ParentLink};
pub use error::{DomError, FrameError};
pub use frame::{DomTask, FrameHandle, PageHandle};
pub use types::*;
