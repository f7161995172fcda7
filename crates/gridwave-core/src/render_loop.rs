//! Render loop state machine.
//!
//! `Idle → Generating → Rendering`, driven one step per display refresh by an
//! external frame clock. The loop never blocks: while generating it polls the
//! composer, and once the buffers are bound it only updates the transform.

use std::fmt;
use std::task::Poll;
use std::time::Instant;

use crate::color::COLOR_COMPONENTS;
use crate::compose::{self, GridData, PendingGridData};
use crate::config::GridConfig;
use crate::error::{GridError, RenderError, Result};
use crate::fps::FpsCounter;
use crate::geometry::POSITION_COMPONENTS;
use crate::renderer::{COLOR_ATTRIBUTE, POSITION_ATTRIBUTE, Renderer, TRANSFORM_UNIFORM};
use crate::transform::{Animation, Transform};

/// User-facing progress of the loop.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Status {
    Idle,
    GeneratingData,
    PreparingShaders,
    Rendering,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Idle => "Idle",
            Status::GeneratingData => "Generating data...",
            Status::PreparingShaders => "Preparing shaders...",
            Status::Rendering => "Rendering",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

enum Phase {
    Idle,
    Generating(PendingGridData),
    Rendering(BoundGrid),
}

struct BoundGrid {
    vertex_count: u32,
    /// Time of the first drawn frame; the animation clock starts here.
    started: Option<Instant>,
}

/// What a single [`RenderLoop::frame`] call did.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FrameReport {
    /// The grid was drawn this frame.
    pub drew: bool,
    /// Status or FPS changed; observers should refresh their display.
    pub hud_changed: bool,
}

/// Values surfaced to the UI.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct HudSnapshot {
    pub columns: u32,
    pub rows: u32,
    pub cells: usize,
    pub status: Status,
    pub fps: u32,
    pub transform: Transform,
}

impl fmt::Display for HudSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x{} ({} cells) | {} | {} fps | scale {:.2} | translate {:.2}, {:.2}",
            self.columns,
            self.rows,
            self.cells,
            self.status,
            self.fps,
            self.transform.scale,
            self.transform.translate_x,
            self.transform.translate_y,
        )
    }
}

/// Owns the frame-to-frame state: phase, transform and FPS counter.
pub struct RenderLoop {
    animation: Animation,
    phase: Phase,
    status: Status,
    config: Option<GridConfig>,
    transform: Transform,
    fps: FpsCounter,
}

impl RenderLoop {
    pub fn new(animation: Animation) -> Self {
        Self {
            animation,
            phase: Phase::Idle,
            status: Status::Idle,
            config: None,
            transform: Transform::IDENTITY,
            fps: FpsCounter::new(),
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    pub fn fps(&self) -> u32 {
        self.fps.fps()
    }

    pub fn hud(&self) -> HudSnapshot {
        let (columns, rows, cells) = self
            .config
            .map_or((0, 0, 0), |c| (c.columns(), c.rows(), c.cell_count()));
        HudSnapshot {
            columns,
            rows,
            cells,
            status: self.status,
            fps: self.fps.fps(),
            transform: self.transform,
        }
    }

    /// `Idle → Generating`: starts both generators for `config`.
    pub fn start(&mut self, config: GridConfig) -> Result<()> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(GridError::AlreadyStarted);
        }
        let pending = compose::generate(config)?;
        self.start_with(pending)
    }

    /// Like [`start`](Self::start) with generation already in flight.
    pub fn start_with(&mut self, pending: PendingGridData) -> Result<()> {
        if !matches!(self.phase, Phase::Idle) {
            return Err(GridError::AlreadyStarted);
        }
        self.config = Some(*pending.config());
        self.phase = Phase::Generating(pending);
        self.set_status(Status::GeneratingData);
        Ok(())
    }

    /// Advances the loop by one display refresh at wall-clock time `now`.
    ///
    /// Renderer failures are returned unchanged and are meant to end the loop.
    pub fn frame<R>(&mut self, renderer: &mut R, now: Instant) -> Result<FrameReport>
    where
        R: Renderer + ?Sized,
    {
        let mut report = FrameReport::default();
        renderer.clear()?;

        if let Phase::Generating(pending) = &mut self.phase {
            match pending.poll() {
                Poll::Pending => return Ok(report),
                Poll::Ready(result) => {
                    self.bind(renderer, result?)?;
                    report.hud_changed = true;
                    return Ok(report);
                }
            }
        }

        let Phase::Rendering(grid) = &mut self.phase else {
            return Ok(report);
        };
        let started = *grid.started.get_or_insert(now);
        let vertex_count = grid.vertex_count;

        self.transform = self.animation.transform_at(now.saturating_duration_since(started));
        renderer.set_uniform_matrix4(TRANSFORM_UNIFORM, &self.transform.to_matrix())?;
        renderer.draw_triangles(vertex_count)?;
        report.drew = true;

        if self.status != Status::Rendering {
            self.set_status(Status::Rendering);
            report.hud_changed = true;
        }
        if let Some(fps) = self.fps.tick(now) {
            log::debug!("{fps} fps");
            report.hud_changed = true;
        }

        Ok(report)
    }

    /// `Generating → Rendering`: uploads the buffers once as static draw data.
    fn bind<R>(&mut self, renderer: &mut R, data: GridData) -> Result<()>
    where
        R: Renderer + ?Sized,
    {
        self.set_status(Status::PreparingShaders);

        let vertex_count = u32::try_from(data.vertex_count()).map_err(|_| {
            RenderError::Backend(format!("{} vertices exceed a single draw", data.vertex_count()))
        })?;

        let vertices = renderer.create_buffer(data.vertices())?;
        renderer.bind_attribute(POSITION_ATTRIBUTE, vertices, POSITION_COMPONENTS as u32)?;

        let colors = renderer.create_buffer(data.colors())?;
        renderer.bind_attribute(COLOR_ATTRIBUTE, colors, COLOR_COMPONENTS as u32)?;

        renderer.set_uniform_matrix4(TRANSFORM_UNIFORM, &Transform::IDENTITY.to_matrix())?;

        log::info!("bound {} cells ({} vertices)", data.cell_count(), vertex_count);
        self.phase = Phase::Rendering(BoundGrid { vertex_count, started: None });
        Ok(())
    }

    fn set_status(&mut self, status: Status) {
        log::info!("{}", status);
        self.status = status;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::mpsc;
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::compose::generate_with;
    use crate::renderer::BufferHandle;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        CreateBuffer(usize),
        Bind(String, BufferHandle, u32),
        Uniform(String, [f32; 16]),
        Clear,
        Draw(u32),
    }

    #[derive(Default)]
    struct RecordingRenderer {
        calls: Vec<Call>,
        next_buffer: u32,
        fail_draw: bool,
    }

    impl RecordingRenderer {
        fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
            self.calls.iter().filter(|c| pred(c)).count()
        }
    }

    impl Renderer for RecordingRenderer {
        fn create_buffer(&mut self, data: &[f32]) -> Result<BufferHandle, RenderError> {
            self.calls.push(Call::CreateBuffer(data.len()));
            self.next_buffer += 1;
            Ok(BufferHandle(self.next_buffer))
        }

        fn bind_attribute(
            &mut self,
            name: &str,
            buffer: BufferHandle,
            components_per_vertex: u32,
        ) -> Result<(), RenderError> {
            self.calls.push(Call::Bind(name.to_string(), buffer, components_per_vertex));
            Ok(())
        }

        fn set_uniform_matrix4(&mut self, name: &str, matrix: &[f32; 16]) -> Result<(), RenderError> {
            self.calls.push(Call::Uniform(name.to_string(), *matrix));
            Ok(())
        }

        fn clear(&mut self) -> Result<(), RenderError> {
            self.calls.push(Call::Clear);
            Ok(())
        }

        fn draw_triangles(&mut self, vertex_count: u32) -> Result<(), RenderError> {
            if self.fail_draw {
                return Err(RenderError::Backend("device lost".to_string()));
            }
            self.calls.push(Call::Draw(vertex_count));
            Ok(())
        }
    }

    fn config() -> GridConfig {
        GridConfig::new(3, 2, 0.2).unwrap()
    }

    /// Steps the loop until the buffers are bound.
    fn run_until_bound(lp: &mut RenderLoop, r: &mut RecordingRenderer, now: Instant) {
        for _ in 0..5000 {
            lp.frame(r, now).unwrap();
            if lp.status() == Status::PreparingShaders {
                return;
            }
            thread::sleep(Duration::from_millis(1));
        }
        panic!("generation did not finish");
    }

    // ── state transitions ─────────────────────────────────────────────────

    #[test]
    fn status_walks_through_phases() {
        let mut lp = RenderLoop::new(Animation::default());
        let mut r = RecordingRenderer::default();
        let t0 = Instant::now();
        assert_eq!(lp.status(), Status::Idle);

        lp.start(config()).unwrap();
        assert_eq!(lp.status(), Status::GeneratingData);

        run_until_bound(&mut lp, &mut r, t0);
        let report = lp.frame(&mut r, t0).unwrap();
        assert!(report.drew);
        assert!(report.hud_changed);
        assert_eq!(lp.status(), Status::Rendering);
    }

    #[test]
    fn idle_loop_only_clears() {
        let mut lp = RenderLoop::new(Animation::default());
        let mut r = RecordingRenderer::default();
        let report = lp.frame(&mut r, Instant::now()).unwrap();
        assert_eq!(report, FrameReport::default());
        assert_eq!(r.calls, vec![Call::Clear]);
    }

    #[test]
    fn start_twice_is_rejected() {
        let mut lp = RenderLoop::new(Animation::default());
        lp.start(config()).unwrap();
        assert!(matches!(lp.start(config()), Err(GridError::AlreadyStarted)));
    }

    #[test]
    fn waits_without_drawing_while_generating() {
        let (release_tx, release_rx) = mpsc::channel::<()>();
        let pending = generate_with(
            config(),
            move |c| {
                release_rx.recv().ok();
                crate::vertex_data(c)
            },
            |cells| vec![0.5; cells * 18],
        )
        .unwrap();

        let mut lp = RenderLoop::new(Animation::default());
        lp.start_with(pending).unwrap();
        let mut r = RecordingRenderer::default();
        let now = Instant::now();

        for _ in 0..3 {
            assert!(!lp.frame(&mut r, now).unwrap().drew);
        }
        assert_eq!(r.count(|c| matches!(c, Call::Draw(_))), 0);
        assert_eq!(lp.status(), Status::GeneratingData);

        release_tx.send(()).unwrap();
        run_until_bound(&mut lp, &mut r, now);
    }

    // ── binding ───────────────────────────────────────────────────────────

    #[test]
    fn buffers_are_bound_once() {
        let mut lp = RenderLoop::new(Animation::default());
        let mut r = RecordingRenderer::default();
        let t0 = Instant::now();
        lp.start(config()).unwrap();
        run_until_bound(&mut lp, &mut r, t0);
        for i in 0..10 {
            lp.frame(&mut r, t0 + Duration::from_millis(i * 16)).unwrap();
        }

        assert_eq!(r.count(|c| matches!(c, Call::CreateBuffer(_))), 2);
        assert!(r.calls.contains(&Call::CreateBuffer(6 * 12)));
        assert!(r.calls.contains(&Call::CreateBuffer(6 * 18)));
        assert!(r.calls.contains(&Call::Bind(POSITION_ATTRIBUTE.to_string(), BufferHandle(1), 2)));
        assert!(r.calls.contains(&Call::Bind(COLOR_ATTRIBUTE.to_string(), BufferHandle(2), 3)));
    }

    #[test]
    fn each_frame_clears_then_updates_transform_then_draws() {
        let mut lp = RenderLoop::new(Animation::default());
        let mut r = RecordingRenderer::default();
        let t0 = Instant::now();
        lp.start(config()).unwrap();
        run_until_bound(&mut lp, &mut r, t0);

        r.calls.clear();
        lp.frame(&mut r, t0).unwrap();

        assert_eq!(r.calls.len(), 3);
        assert_eq!(r.calls[0], Call::Clear);
        assert!(matches!(&r.calls[1], Call::Uniform(name, _) if name == TRANSFORM_UNIFORM));
        assert_eq!(r.calls[2], Call::Draw(36));
    }

    // ── animation and timing ──────────────────────────────────────────────

    #[test]
    fn transform_follows_elapsed_time_from_first_frame() {
        let animation = Animation::default();
        let mut lp = RenderLoop::new(animation);
        let mut r = RecordingRenderer::default();
        let t0 = Instant::now();
        lp.start(config()).unwrap();
        run_until_bound(&mut lp, &mut r, t0);

        lp.frame(&mut r, t0).unwrap();
        assert_eq!(lp.transform(), animation.transform_at(Duration::ZERO));

        let later = t0 + Duration::from_millis(2500);
        lp.frame(&mut r, later).unwrap();
        let expected = animation.transform_at(Duration::from_millis(2500));
        assert_eq!(lp.transform(), expected);
        assert_eq!(r.calls.last(), Some(&Call::Draw(36)));
        let uploaded = r.calls.iter().rev().find_map(|c| match c {
            Call::Uniform(_, m) => Some(*m),
            _ => None,
        });
        assert_eq!(uploaded, Some(expected.to_matrix()));
    }

    #[test]
    fn fps_updates_once_per_second() {
        let mut lp = RenderLoop::new(Animation::default());
        let mut r = RecordingRenderer::default();
        let t0 = Instant::now();
        lp.start(config()).unwrap();
        run_until_bound(&mut lp, &mut r, t0);

        let mut updates = 0;
        for i in 0..=120u64 {
            let report = lp.frame(&mut r, t0 + Duration::from_micros(i * 16_667)).unwrap();
            if report.hud_changed && i > 0 {
                updates += 1;
            }
        }
        assert_eq!(updates, 2);
        assert_eq!(lp.fps(), 60);
    }

    // ── failures ──────────────────────────────────────────────────────────

    #[test]
    fn draw_failure_propagates() {
        let mut lp = RenderLoop::new(Animation::default());
        let mut r = RecordingRenderer::default();
        let t0 = Instant::now();
        lp.start(config()).unwrap();
        run_until_bound(&mut lp, &mut r, t0);

        r.fail_draw = true;
        assert!(matches!(
            lp.frame(&mut r, t0),
            Err(GridError::Render(RenderError::Backend(_)))
        ));
    }

    #[test]
    fn generation_failure_propagates() {
        let pending = generate_with(config(), crate::vertex_data, |_| -> Vec<f32> {
            panic!("color worker crashed")
        })
        .unwrap();
        let mut lp = RenderLoop::new(Animation::default());
        lp.start_with(pending).unwrap();
        let mut r = RecordingRenderer::default();

        let err = loop {
            match lp.frame(&mut r, Instant::now()) {
                Ok(_) => thread::sleep(Duration::from_millis(1)),
                Err(e) => break e,
            }
        };
        assert!(matches!(err, GridError::TaskLost { task: "color" }));
    }

    // ── hud ───────────────────────────────────────────────────────────────

    #[test]
    fn hud_formats_two_decimals() {
        let hud = HudSnapshot {
            columns: 100,
            rows: 56,
            cells: 5600,
            status: Status::Rendering,
            fps: 60,
            transform: Transform { scale: 1.23456, translate_x: -0.1, translate_y: 0.25 },
        };
        assert_eq!(
            hud.to_string(),
            "100x56 (5600 cells) | Rendering | 60 fps | scale 1.23 | translate -0.10, 0.25"
        );
    }

    #[test]
    fn hud_reports_grid_dimensions_after_start() {
        let mut lp = RenderLoop::new(Animation::default());
        assert_eq!(lp.hud().cells, 0);
        lp.start(config()).unwrap();
        let hud = lp.hud();
        assert_eq!((hud.columns, hud.rows, hud.cells), (3, 2, 6));
        assert_eq!(hud.status, Status::GeneratingData);
    }
}
