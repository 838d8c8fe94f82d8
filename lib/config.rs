//! Engine configuration loaded from TOML.
//!
//! ```toml
//! threads = 4          # worker pool size; defaults to the available parallelism
//! chunks = 16          # chunks per field; defaults to one per worker
//! dt = 0.05
//! scheme = "split_step" # "euler" (default), "runge_kutta4", or "split_step"
//! renormalize = false
//! ```

use std::path::Path;
use serde::{ Deserialize, Serialize };
use crate::{
    error::ConfigError,
    field::LatticeField,
    parallel::Workers,
    timedep::{ Integrator, Scheme },
};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    /// Size of the worker pool.
    pub threads: Option<usize>,
    /// Number of chunks each field is split into for parallel operations.
    pub chunks: Option<usize>,
    /// Time step.
    pub dt: f64,
    /// Integration scheme.
    #[serde(default)]
    pub scheme: Scheme,
    /// Renormalize after every step.
    #[serde(default = "bool::default")]
    pub renormalize: bool,
}

impl EngineConfig {
    /// Parse a configuration from TOML text and check it.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.check()?;
        Ok(config)
    }

    /// Fail if any count is zero or the time step is not finite.
    pub fn check(&self) -> Result<(), ConfigError> {
        if self.threads == Some(0) {
            return Err(ConfigError::Zero { what: "thread count" });
        }
        if self.chunks == Some(0) {
            return Err(ConfigError::Zero { what: "chunk count" });
        }
        Integrator::new(self.dt)?;
        Ok(())
    }

    /// Build the worker pool.
    pub fn workers(&self) -> Result<Workers, ConfigError> {
        let threads
            = match self.threads {
                Some(n) => n,
                None => {
                    std::thread::available_parallelism()
                        .map(|n| n.get())
                        .unwrap_or(1)
                },
            };
        Workers::new(threads)
    }

    /// Build the integrator.
    pub fn integrator(&self) -> Result<Integrator, ConfigError> {
        let integ
            = Integrator::new(self.dt)?
            .with_scheme(self.scheme)
            .renormalizing(self.renormalize);
        Ok(integ)
    }

    /// Apply the configured chunk count to a field, if one is set.
    pub fn partition(&self, psi: LatticeField) -> LatticeField {
        match self.chunks {
            Some(n) => psi.with_partition(n),
            None => psi,
        }
    }
}

/// Read and check an [`EngineConfig`] from a TOML file.
pub fn read_toml<P>(path: P) -> Result<EngineConfig, ConfigError>
where P: AsRef<Path>
{
    let path = path.as_ref();
    let contents: String
        = std::fs::read_to_string(path)
        .map_err(|_| ConfigError::TomlRead { path: path.display().to_string() })?;
    log::debug!("loaded engine config from {}", path.display());
    EngineConfig::from_toml_str(&contents)
}
