//! Grid data pipeline for gridwave.
//!
//! Vertex geometry and per-cell colors are generated on two background
//! threads, joined into one [`GridData`], and handed to the [`RenderLoop`],
//! which binds them once and then animates a transform every frame.
//!
//! # Structure
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`config`] | `GridConfig` |
//! | [`geometry`] | `vertex_data` |
//! | [`color`] | `color_data` |
//! | [`task`] | background task runner (`spawn`, `TaskHandle`) |
//! | [`compose`] | `generate`, `PendingGridData`, `GridData` |
//! | [`transform`] | `Transform`, `Animation` |
//! | [`fps`] | `FpsCounter` |
//! | [`renderer`] | `Renderer` trait consumed by the loop |
//! | [`render_loop`] | `RenderLoop`, `Status`, `HudSnapshot` |
//!
//! # Quick start
//!
//! ```rust
//! use gridwave_core::{generate, GridConfig};
//!
//! let config = GridConfig::new(4, 3, 0.2).unwrap();
//! let data = generate(config).unwrap().wait().unwrap();
//! assert_eq!(data.cell_count(), 12);
//! assert_eq!(data.vertices().len(), 12 * 12);
//! assert_eq!(data.colors().len(), 12 * 18);
//! ```

pub mod color;
pub mod compose;
pub mod config;
pub mod error;
pub mod fps;
pub mod geometry;
pub mod render_loop;
pub mod renderer;
pub mod task;
pub mod transform;

pub use color::color_data;
pub use compose::{generate, generate_with, GridData, PendingGridData};
pub use config::GridConfig;
pub use error::{GridError, RenderError};
pub use fps::FpsCounter;
pub use geometry::vertex_data;
pub use render_loop::{FrameReport, HudSnapshot, RenderLoop, Status};
pub use renderer::{BufferHandle, Renderer};
pub use transform::{Animation, Transform};
