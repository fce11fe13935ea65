//! Plain data shared between hosts and the engine.

mod geometry;
mod ids;
mod style;

pub use geometry::*;
pub use ids::*;
pub use style::*;

#[cfg(test)]
#[path = "types_tests.rs"]
mod tests;
