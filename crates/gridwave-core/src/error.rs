use crate::renderer::BufferHandle;

/// Errors produced by the generation pipeline and the render loop.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error("invalid grid configuration: {0}")]
    InvalidConfig(String),

    /// A background worker could not be started. Fatal; never retried.
    #[error("failed to start {task} worker")]
    SetupFailure {
        task: &'static str,
        #[source]
        source: std::io::Error,
    },

    /// A background worker exited without delivering its result.
    #[error("{task} worker exited without a result")]
    TaskLost { task: &'static str },

    #[error("grid has {expected} cells but vertex buffer describes {vertex_cells} and color buffer {color_cells}")]
    CellCountMismatch { expected: usize, vertex_cells: usize, color_cells: usize },

    #[error("render loop already started")]
    AlreadyStarted,

    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Errors reported by a [`Renderer`](crate::Renderer) implementation.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unknown buffer handle {0:?}")]
    UnknownBuffer(BufferHandle),

    #[error("unknown vertex attribute `{0}`")]
    UnknownAttribute(String),

    #[error("attribute `{name}` expects {expected} components per vertex, got {got}")]
    AttributeComponents {
        name: String,
        expected: u32,
        got: u32,
    },

    #[error("unknown uniform `{0}`")]
    UnknownUniform(String),

    #[error("attribute `{0}` has no bound buffer")]
    Unbound(&'static str),

    #[error("graphics backend error: {0}")]
    Backend(String),
}

pub type Result<T, E = GridError> = std::result::Result<T, E>;
