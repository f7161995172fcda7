use anyhow::{Context, Result};
use gridwave_core::Animation;
use gridwave_engine::paint::Color;

/// Environment variable overriding the column count.
pub const COLUMNS_VAR: &str = "GRIDWAVE_COLUMNS";

/// Environment variable overriding the square-to-gutter ratio.
pub const GUTTER_RATIO_VAR: &str = "GRIDWAVE_GUTTER_RATIO";

/// Viewer configuration. Rows are not configured: they follow the window's
/// aspect ratio when generation starts.
#[derive(Debug, Clone)]
pub struct ViewerSettings {
    pub columns: u32,
    /// Gutter width as a fraction of the cell size.
    pub gutter_ratio: f32,
    pub clear_color: Color,
    pub animation: Animation,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            columns: 100,
            gutter_ratio: 0.2,
            clear_color: Color::WHITE,
            animation: Animation::default(),
        }
    }
}

impl ViewerSettings {
    /// Defaults overridden by `GRIDWAVE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each variable.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut settings = Self::default();

        if let Some(raw) = lookup(COLUMNS_VAR) {
            settings.columns = raw
                .trim()
                .parse()
                .with_context(|| format!("{COLUMNS_VAR}={raw:?} is not a column count"))?;
            anyhow::ensure!(settings.columns > 0, "{COLUMNS_VAR} must be positive");
        }

        if let Some(raw) = lookup(GUTTER_RATIO_VAR) {
            settings.gutter_ratio = raw
                .trim()
                .parse()
                .with_context(|| format!("{GUTTER_RATIO_VAR}={raw:?} is not a number"))?;
            anyhow::ensure!(
                settings.gutter_ratio.is_finite() && settings.gutter_ratio >= 0.0,
                "{GUTTER_RATIO_VAR} must be a non-negative number"
            );
        }

        Ok(settings)
    }
}
