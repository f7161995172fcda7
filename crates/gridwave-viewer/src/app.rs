use anyhow::{Context, Result};
use gridwave_core::{GridConfig, RenderLoop, Status};
use gridwave_engine::core::{App, AppControl, FrameCtx, WindowCtx};
use gridwave_engine::render::GridRenderer;

use crate::settings::ViewerSettings;

/// Drives the render loop from the engine's frame callback.
///
/// Generation starts on the first frame, once the window size (and hence the
/// row count) is known.
pub struct GridApp {
    settings: ViewerSettings,
    render_loop: RenderLoop,
    renderer: GridRenderer,
    failure: Option<anyhow::Error>,
}

impl GridApp {
    pub fn new(settings: ViewerSettings) -> Self {
        Self {
            render_loop: RenderLoop::new(settings.animation),
            renderer: GridRenderer::new(settings.clear_color),
            settings,
            failure: None,
        }
    }

    /// Consumes the app, returning the error that stopped the loop, if any.
    pub fn into_result(self) -> Result<()> {
        self.failure.map_or(Ok(()), Err)
    }

    fn start(&mut self, window: &WindowCtx<'_>) -> Result<()> {
        let viewport = window.viewport();
        let config = GridConfig::for_viewport(
            self.settings.columns,
            self.settings.gutter_ratio,
            viewport.width,
            viewport.height,
        )
        .context("cannot derive grid from window size")?;

        self.render_loop
            .start(config)
            .context("failed to start data generation")?;
        self.refresh_title(window);
        Ok(())
    }

    fn step(&mut self, ctx: &mut FrameCtx<'_, '_>) -> Result<()> {
        if self.render_loop.status() == Status::Idle {
            self.start(&ctx.window)?;
        }

        let now = ctx.now;
        let (render_loop, renderer) = (&mut self.render_loop, &mut self.renderer);
        let report = ctx.render(|rctx, target| {
            let mut frame = renderer.frame(rctx, target);
            render_loop.frame(&mut frame, now)
        })?;

        // `None`: the surface skipped this frame.
        let Some(report) = report else { return Ok(()) };
        let report = report.context("render loop failed")?;

        if report.hud_changed {
            self.refresh_title(&ctx.window);
        }
        Ok(())
    }

    fn refresh_title(&self, window: &WindowCtx<'_>) {
        let hud = self.render_loop.hud();
        log::info!("{hud}");
        window.set_title(&format!("gridwave | {hud}"));
    }
}

impl App for GridApp {
    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        match self.step(ctx) {
            Ok(()) => AppControl::Continue,
            Err(err) => {
                log::error!("{err:#}");
                self.failure = Some(err);
                AppControl::Exit
            }
        }
    }
}
