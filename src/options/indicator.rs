use std::time::Duration;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Processing indicator timing.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, JsonSchema)]
#[schemars(title = "Indicator", inline)]
#[serde(default)]
pub struct IndicatorOptions {
    /// Time spent in `Processing` before switching to `Complete`.
    #[schemars(title = "Delay (ms)", range(min = 0, max = 60000))]
    pub delay_ms: u64,
}

impl Default for IndicatorOptions {
    fn default() -> Self {
        Self { delay_ms: 3000 }
    }
}

impl IndicatorOptions {
    /// The delay as a [`Duration`].
    #[must_use]
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}
