//! gridwave engine crate.
//!
//! Platform + GPU runtime for the grid viewer: window and event loop
//! (`winit`), device and surface (`wgpu`), logging, and the
//! wgpu implementation of `gridwave_core::Renderer`.

pub mod coords;
pub mod core;
pub mod device;
pub mod logging;
pub mod paint;
pub mod render;
pub mod window;
