//! Indicator engine settings (`[engine]` section).

use serde::Deserialize;

use crate::application::indicator::{IndicatorEngine, DEFAULT_WARMUP_BARS};

/// Indicator engine configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineConfig {
    /// Bars required before any indicator is reported.
    #[serde(default = "default_warmup_bars")]
    pub warmup_bars: usize,
}

fn default_warmup_bars() -> usize {
    DEFAULT_WARMUP_BARS
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            warmup_bars: default_warmup_bars(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub const fn build(&self) -> IndicatorEngine {
        IndicatorEngine::new(self.warmup_bars)
    }
}
