//! Fan-out/fan-in of the two generators.

use std::mem;
use std::task::Poll;

use crate::color::{self, color_data};
use crate::config::GridConfig;
use crate::error::{GridError, Result};
use crate::geometry::{self, vertex_data};
use crate::task::{self, TaskHandle};

/// Joined output of both generators.
///
/// Produced once per run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct GridData {
    config: GridConfig,
    vertices: Vec<f32>,
    colors: Vec<f32>,
}

impl GridData {
    /// Pairs the two buffers, checking that both describe exactly the cells
    /// of `config`.
    pub fn new(config: GridConfig, vertices: Vec<f32>, colors: Vec<f32>) -> Result<Self> {
        let expected = config.cell_count();
        let vertex_cells = vertices.len() / geometry::FLOATS_PER_CELL;
        let color_cells = colors.len() / color::FLOATS_PER_CELL;
        if vertex_cells != expected
            || color_cells != expected
            || vertices.len() % geometry::FLOATS_PER_CELL != 0
            || colors.len() % color::FLOATS_PER_CELL != 0
        {
            return Err(GridError::CellCountMismatch { expected, vertex_cells, color_cells });
        }
        Ok(Self { config, vertices, colors })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn vertices(&self) -> &[f32] {
        &self.vertices
    }

    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    pub fn cell_count(&self) -> usize {
        self.vertices.len() / geometry::FLOATS_PER_CELL
    }

    /// Number of vertices to draw (six per cell).
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / geometry::POSITION_COMPONENTS
    }

    pub fn into_buffers(self) -> (Vec<f32>, Vec<f32>) {
        (self.vertices, self.colors)
    }
}

enum Branch<T> {
    Running(TaskHandle<T>),
    Finished(T),
    Taken,
}

impl<T> Branch<T> {
    /// Returns `true` once the branch holds its value.
    fn poll(&mut self) -> Result<bool> {
        match self {
            Branch::Running(handle) => match handle.poll() {
                Poll::Pending => Ok(false),
                Poll::Ready(value) => {
                    *self = Branch::Finished(value?);
                    Ok(true)
                }
            },
            Branch::Finished(_) => Ok(true),
            Branch::Taken => Ok(false),
        }
    }

    fn wait(self, name: &'static str) -> Result<T> {
        match self {
            Branch::Running(handle) => handle.join(),
            Branch::Finished(value) => Ok(value),
            Branch::Taken => Err(GridError::TaskLost { task: name }),
        }
    }

    fn take(&mut self) -> Option<T> {
        match mem::replace(self, Branch::Taken) {
            Branch::Finished(value) => Some(value),
            other => {
                *self = other;
                None
            }
        }
    }
}

/// Both generators in flight. Resolves once both have delivered.
pub struct PendingGridData {
    config: GridConfig,
    vertices: Branch<Vec<f32>>,
    colors: Branch<Vec<f32>>,
}

impl std::fmt::Debug for PendingGridData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PendingGridData").field("config", &self.config).finish_non_exhaustive()
    }
}

impl PendingGridData {
    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    /// Blocks until both generators finish.
    pub fn wait(self) -> Result<GridData> {
        let vertices = self.vertices.wait("vertex")?;
        let colors = self.colors.wait("color")?;
        GridData::new(self.config, vertices, colors)
    }

    /// Non-blocking join. Returns `Poll::Ready` exactly once.
    ///
    /// A branch that finishes early is held until the other one completes.
    pub fn poll(&mut self) -> Poll<Result<GridData>> {
        let vertices_ready = match self.vertices.poll() {
            Ok(ready) => ready,
            Err(e) => return Poll::Ready(Err(e)),
        };
        let colors_ready = match self.colors.poll() {
            Ok(ready) => ready,
            Err(e) => return Poll::Ready(Err(e)),
        };
        if !(vertices_ready && colors_ready) {
            return Poll::Pending;
        }

        match (self.vertices.take(), self.colors.take()) {
            (Some(vertices), Some(colors)) => Poll::Ready(GridData::new(self.config, vertices, colors)),
            _ => Poll::Pending,
        }
    }
}

/// Starts both generators for `config` on background threads.
///
/// Colors are drawn from the thread-local RNG of the color worker.
pub fn generate(config: GridConfig) -> Result<PendingGridData> {
    generate_with(config, vertex_data, |cells| color_data(cells, &mut rand::thread_rng()))
}

/// Like [`generate`] but with caller-supplied generator functions.
///
/// Both tasks are spawned before this returns; neither waits for the other.
pub fn generate_with<G, C>(config: GridConfig, geometry: G, colors: C) -> Result<PendingGridData>
where
    G: FnOnce(&GridConfig) -> Vec<f32> + Send + 'static,
    C: FnOnce(usize) -> Vec<f32> + Send + 'static,
{
    let cells = config.cell_count();
    log::info!(
        "generating {} cells ({} columns x {} rows)",
        cells,
        config.columns(),
        config.rows()
    );

    let vertex_task = task::spawn("vertex", config, move |config| geometry(&config))?;
    let color_task = task::spawn("color", cells, colors)?;

    Ok(PendingGridData {
        config,
        vertices: Branch::Running(vertex_task),
        colors: Branch::Running(color_task),
    })
}
