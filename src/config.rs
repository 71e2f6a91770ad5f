//! Run configuration for bijections.
//!
//! The fast path trusts its input: it does not check partition classes,
//! stretches with truncating division and pastes without looking for
//! collisions. [`BijectionOptions`] opts into each check separately.
//!
//! Environment variables read by [`Config::from_env`]:
//! - `FERRERS_TRACE_DIR`: write stage snapshots and `graph.txt` there
//! - `FERRERS_CHECKED`: `1` or `true` turns on every check

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable naming the trace directory.
pub const TRACE_DIR_VAR: &str = "FERRERS_TRACE_DIR";

/// Environment variable enabling all checks.
pub const CHECKED_VAR: &str = "FERRERS_CHECKED";

/// Which preconditions a bijection verifies before trusting them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BijectionOptions {
    /// Reject inputs outside the bijection's domain.
    pub check_input: bool,
    /// Use `stretch_exact` instead of `stretch`.
    pub exact_stretch: bool,
    /// Use `paste_checked` instead of `paste`.
    pub validate_paste: bool,
}

impl BijectionOptions {
    /// Every check on.
    pub const fn checked() -> Self {
        Self {
            check_input: true,
            exact_stretch: true,
            validate_paste: true,
        }
    }
}

/// Options plus an optional trace directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Checks to run.
    #[serde(default)]
    pub options: BijectionOptions,
    /// Where to trace stages, if anywhere.
    #[serde(default)]
    pub trace_dir: Option<PathBuf>,
}

impl Config {
    /// Reads [`TRACE_DIR_VAR`] and [`CHECKED_VAR`]; unset variables keep defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(dir) = lookup(TRACE_DIR_VAR).filter(|d| !d.is_empty()) {
            config.trace_dir = Some(PathBuf::from(dir));
        }
        if let Some(flag) = lookup(CHECKED_VAR) {
            if matches!(flag.trim().to_ascii_lowercase().as_str(), "1" | "true") {
                config.options = BijectionOptions::checked();
            }
        }
        config
    }

    /// Sets the trace directory.
    pub fn with_trace_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.trace_dir = Some(dir.into());
        self
    }

    /// Turns on every check.
    pub fn checked(mut self) -> Self {
        self.options = BijectionOptions::checked();
        self
    }
}
