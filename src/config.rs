use crate::error::{Groth16Error, Result};
use crate::msm::MAX_WINDOW_SIZE;
use serde::{Deserialize, Serialize};

/// Window size that balances table construction against window count for
/// typical circuit sizes.
pub const DEFAULT_GSIZE: usize = 6;

/// Tuning knobs for proof generation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProverConfig {
    /// MSM window size; tables hold `2^gsize` points.
    pub gsize: usize,
    /// Number of disjoint input ranges each MSM is forked into.
    pub workers: usize,
}

impl Default for ProverConfig {
    fn default() -> Self {
        ProverConfig {
            gsize: DEFAULT_GSIZE,
            workers: rayon::current_num_threads(),
        }
    }
}

impl ProverConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: ProverConfig = serde_json::from_str(json).map_err(|e| Groth16Error::Config {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.gsize == 0 || self.gsize > MAX_WINDOW_SIZE {
            return Err(Groth16Error::InvalidWindowSize(self.gsize));
        }
        if self.workers == 0 {
            return Err(Groth16Error::Config {
                message: "workers must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
