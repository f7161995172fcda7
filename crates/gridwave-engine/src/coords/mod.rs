//! Window-space coordinate types.
//!
//! Logical pixels, origin top-left, +Y down.

mod viewport;

pub use viewport::Viewport;
