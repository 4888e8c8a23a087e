//! Generator configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::{SchedError, SchedResult};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Wall-clock time between sweeps.
    pub interval:    Duration,
    /// Number of runners.  `None` = one per available core.
    pub num_runners: Option<usize>,
}

impl GeneratorConfig {
    pub fn validate(&self) -> SchedResult<()> {
        if self.interval.is_zero() {
            return Err(SchedError::Config("interval must be non-zero".into()));
        }
        if self.num_runners == Some(0) {
            return Err(SchedError::Config("num_runners must be at least 1".into()));
        }
        Ok(())
    }

    /// Simulated seconds each sweep advances devices by.  Sub-second
    /// intervals still advance by a full second.
    pub fn tick_secs(&self) -> f64 {
        self.interval.as_secs_f64().max(1.0)
    }

    /// Resolved runner count.
    pub fn runners(&self) -> usize {
        self.num_runners.unwrap_or_else(|| {
            std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1)
        })
    }
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self { interval: Duration::from_secs(1), num_runners: None }
    }
}
