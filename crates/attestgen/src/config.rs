//! Generator configuration.
//!
//! Every setting has a default; `from_env` overrides them from:
//!
//! | variable | values | default |
//! |---|---|---|
//! | `ATTESTGEN_CANONICALIZATION` | `byte-concat`, `message-hash` | `byte-concat` |
//! | `ATTESTGEN_ENDORSEMENT_MODE` | `status`, `level` | `status` |
//! | `ATTESTGEN_DISPUTE_REASON` | `text`, `structured` | `text` |
//! | `ATTESTGEN_OUTPUT_DIR` | path | `output` |
//! | `LOGGER_LEVEL` | `trace` .. `error` | `info` |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use attestgen_core::{Canonicalization, DisputeReasonForm, SchemaConfig};
use thiserror::Error;
use tracing::Level;

pub const CANONICALIZATION_VAR: &str = "ATTESTGEN_CANONICALIZATION";
pub const ENDORSEMENT_MODE_VAR: &str = "ATTESTGEN_ENDORSEMENT_MODE";
pub const DISPUTE_REASON_VAR: &str = "ATTESTGEN_DISPUTE_REASON";
pub const OUTPUT_DIR_VAR: &str = "ATTESTGEN_OUTPUT_DIR";
pub const LOGGER_LEVEL_VAR: &str = "LOGGER_LEVEL";

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Invalid configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}={value:?}: {reason}")]
    InvalidValue {
        var: &'static str,
        value: String,
        reason: String,
    },
}

/// How peer-to-peer attestations express trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EndorsementMode {
    /// `currentStatus` Endorsed/Disputed.
    #[default]
    Status,
    /// Numeric `trustworthiness` level of 1 or -1.
    Level,
}

impl fmt::Display for EndorsementMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Status => "status",
            Self::Level => "level",
        })
    }
}

impl FromStr for EndorsementMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "status" => Ok(Self::Status),
            "level" => Ok(Self::Level),
            other => Err(format!(
                "unknown endorsement mode {other:?} (expected status or level)"
            )),
        }
    }
}

/// Settings for one generation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub canonicalization: Canonicalization,
    pub endorsement_mode: EndorsementMode,
    pub schema: SchemaConfig,
    pub output_dir: PathBuf,
    pub log_level: Level,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            canonicalization: Canonicalization::default(),
            endorsement_mode: EndorsementMode::default(),
            schema: SchemaConfig::default(),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            log_level: Level::INFO,
        }
    }
}

impl GeneratorConfig {
    /// Read overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read overrides through `lookup`. Unset and empty variables keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(value) = get(CANONICALIZATION_VAR) {
            config.canonicalization = parse_var(CANONICALIZATION_VAR, &value)?;
        }
        if let Some(value) = get(ENDORSEMENT_MODE_VAR) {
            config.endorsement_mode = parse_var(ENDORSEMENT_MODE_VAR, &value)?;
        }
        if let Some(value) = get(DISPUTE_REASON_VAR) {
            config.schema.dispute_reason_form =
                parse_var::<DisputeReasonForm>(DISPUTE_REASON_VAR, &value)?;
        }
        if let Some(value) = get(OUTPUT_DIR_VAR) {
            config.output_dir = PathBuf::from(value);
        }
        if let Some(value) = get(LOGGER_LEVEL_VAR) {
            config.log_level = parse_var(LOGGER_LEVEL_VAR, &value)?;
        }

        Ok(config)
    }
}

fn parse_var<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    value
        .trim()
        .parse()
        .map_err(|e: T::Err| ConfigError::InvalidValue {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
