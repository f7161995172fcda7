//! Colors used by the engine (clear color).

mod color;

pub use color::Color;
