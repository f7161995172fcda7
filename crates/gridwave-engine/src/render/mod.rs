//! GPU rendering.
//!
//! `GridRenderer` owns its GPU resources (pipeline, buffers, uniform) and is
//! driven through the `gridwave_core::Renderer` trait via a per-frame
//! `GridFrame`.

mod ctx;
mod grid;

pub use ctx::{RenderCtx, RenderTarget};
pub use grid::{GridFrame, GridRenderer};
