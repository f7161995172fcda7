use crate::error::RenderError;

/// Opaque handle to a buffer created by a [`Renderer`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct BufferHandle(pub u32);

/// Vertex attribute carrying document-space positions.
pub const POSITION_ATTRIBUTE: &str = "coordinates";

/// Vertex attribute carrying per-vertex RGB colors.
pub const COLOR_ATTRIBUTE: &str = "color";

/// Uniform holding the grid transform.
pub const TRANSFORM_UNIFORM: &str = "transform";

/// Graphics backend consumed by the render loop.
///
/// Buffers are created and bound once; afterwards only the transform uniform
/// changes between frames. Every call may fail, and failures are not
/// recovered by the caller.
pub trait Renderer {
    /// Uploads `data` as static vertex data.
    fn create_buffer(&mut self, data: &[f32]) -> Result<BufferHandle, RenderError>;

    /// Binds `buffer` to the vertex attribute `name`.
    fn bind_attribute(
        &mut self,
        name: &str,
        buffer: BufferHandle,
        components_per_vertex: u32,
    ) -> Result<(), RenderError>;

    /// Sets a 4×4 matrix uniform. `matrix` is row-major.
    fn set_uniform_matrix4(&mut self, name: &str, matrix: &[f32; 16]) -> Result<(), RenderError>;

    /// Clears the frame.
    fn clear(&mut self) -> Result<(), RenderError>;

    /// Draws `vertex_count` vertices from the bound attributes as a triangle list.
    fn draw_triangles(&mut self, vertex_count: u32) -> Result<(), RenderError>;
}
