//! Engine configuration supplied by the build-system collaborator.
//!
//! Cache role is explicit, immutable configuration passed into the cache
//! constructor; both roles stay unit-testable in one process.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Whether a build pass writes (producer) or reads (consumer) the shared
/// metadata cache. Mutually exclusive by construction.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Copy, Default)]
pub enum CacheRole {
    Producer,
    Consumer,
    #[default]
    Disabled,
}

impl std::fmt::Display for CacheRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        static DISPLAY_STRINGS: &[(CacheRole, &str)] = &[
            (CacheRole::Producer, "producer"),
            (CacheRole::Consumer, "consumer"),
            (CacheRole::Disabled, "disabled"),
        ];

        let display_str = DISPLAY_STRINGS
            .iter()
            .find(|(r, _)| r == self)
            .map(|(_, s)| *s)
            .unwrap_or("unknown");

        write!(f, "{display_str}")
    }
}

/// Logging verbosity. Affects only telemetry rendering, never behavior.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Copy, Default)]
pub enum Verbosity {
    Quiet,
    #[default]
    Info,
    Debug,
    Trace,
}

impl Verbosity {
    pub fn from_occurrences(n: u8) -> Self {
        match n {
            0 => Self::Info,
            1 => Self::Debug,
            _ => Self::Trace,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub cache_role: CacheRole,
    /// Where the producer writes the cache file.
    pub cache_output_path: Option<PathBuf>,
    /// Where the consumer looks for an existing cache file.
    pub cache_input_path: Option<PathBuf>,
    /// Target directory for generated source files.
    pub output_dir: PathBuf,
    pub verbosity: Verbosity,
    /// Root label of the telemetry report.
    pub report_prefix: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            cache_role: CacheRole::Disabled,
            cache_output_path: None,
            cache_input_path: None,
            output_dir: PathBuf::from("generated"),
            verbosity: Verbosity::Info,
            report_prefix: "fakesmith".to_string(),
        }
    }
}

impl GeneratorConfig {
    pub fn producer(output_dir: impl Into<PathBuf>, cache_output: impl Into<PathBuf>) -> Self {
        Self {
            cache_role: CacheRole::Producer,
            cache_output_path: Some(cache_output.into()),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn consumer(output_dir: impl Into<PathBuf>, cache_input: impl Into<PathBuf>) -> Self {
        Self {
            cache_role: CacheRole::Consumer,
            cache_input_path: Some(cache_input.into()),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    pub fn with_verbosity(mut self, verbosity: Verbosity) -> Self {
        self.verbosity = verbosity;
        self
    }
}
