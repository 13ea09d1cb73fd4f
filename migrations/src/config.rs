//! Planner configuration loaded from TOML

use serde::{Deserialize, Serialize};
use std::path::Path;
use typeq_types::Dialect;

use crate::error::Result;

/// Planner settings, usually read from a `typeq.toml`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Config {
    /// SQL dialect used when rendering plans (`sqlite` or `postgresql`)
    #[serde(default)]
    pub dialect: Dialect,
    /// Emit statement breakpoints between rendered statements
    #[serde(default = "default_breakpoints")]
    pub breakpoints: bool,
    /// Name given to snapshots built from the registry
    #[serde(default = "default_schema")]
    pub schema: String,
}

fn default_breakpoints() -> bool {
    true
}

fn default_schema() -> String {
    "main".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dialect: Dialect::default(),
            breakpoints: default_breakpoints(),
            schema: default_schema(),
        }
    }
}

impl Config {
    /// Parse configuration from a TOML string
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
