//! Error types for the host protocol layer.

mod dom;
mod frame;

pub use dom::*;
pub use frame::*;
