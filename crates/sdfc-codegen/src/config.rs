//! Configuration files
//!
//! ```toml
//! [target]
//! point = "pos"
//! result_type = "Hit"
//! binding_field = "dist_or_ref"
//!
//! [operators.primitives.pTorus]
//! arity = 2
//! callee = "torus_sdf"
//!
//! [operators.combinators.oSmoothSub]
//! literal_params = 1
//! callee = "smooth_sub_sdf"
//!
//! [operators.materials]
//! mMetal = "MAKE_METAL"
//!
//! [operators.context]
//! ".frame" = { named = "frame_index" }
//! ```
//!
//! Operators listed here are added to (or replace) the built-in set.

use std::path::Path;

use serde::Deserialize;

use crate::error::{CompileError, Result};
use crate::operators::OperatorTable;
use crate::target::Target;

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub target: Target,
    pub operators: OperatorTable,
}

impl Config {
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(source).map_err(|e| CompileError::Config(e.to_string()))?;
        config.operators.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source).inspect_err(|e| {
            tracing::warn!(path = %path.display(), error = %e, "invalid configuration");
        })?;

        tracing::debug!(
            path = %path.display(),
            operators = config.operators.len(),
            "loaded configuration"
        );
        Ok(config)
    }
}
