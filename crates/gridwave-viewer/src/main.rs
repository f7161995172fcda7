mod app;
mod settings;

use anyhow::Result;
use gridwave_engine::device::GpuInit;
use gridwave_engine::logging::{LoggingConfig, init_logging};
use gridwave_engine::window::{Runtime, RuntimeConfig};

use crate::app::GridApp;
use crate::settings::ViewerSettings;

fn main() -> Result<()> {
    init_logging(LoggingConfig::default());

    let settings = ViewerSettings::from_env()?;
    log::info!(
        "{} columns, gutter ratio {}",
        settings.columns,
        settings.gutter_ratio
    );

    let app = Runtime::run(RuntimeConfig::default(), GpuInit::default(), GridApp::new(settings))?;
    app.into_result()
}
