//! # Team Configuration
//!
//! Explicit configuration passed into [`crate::Team::new`]. There is no
//! ambient global thread count: callers either set `team_size` or get the
//! documented fallback to queried hardware concurrency.

use serde::Deserialize;

use crate::error::{CoreError, CoreResult};

/// Default cap on the worker count a single team may request.
pub const DEFAULT_MAX_TEAM_SIZE: usize = 256;

/// Scheduling policy for distributing loop iterations to workers.
///
/// Only `Static` is implemented: contiguous blocks, lowest-id workers first.
/// The enum is the extension point for future `Dynamic`/`Guided` policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScheduleKind {
    /// Fixed contiguous block per worker, computed before execution.
    #[default]
    Static,
}

/// Configuration for a worker team.
///
/// Loaded once at startup (TOML) or built in code; immutable afterwards.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TeamConfig {
    /// Worker count for the team's regions.
    ///
    /// `None` falls back to the platform's hardware concurrency.
    #[serde(default)]
    pub team_size: Option<usize>,

    /// Iteration scheduling policy.
    #[serde(default)]
    pub schedule: ScheduleKind,

    /// Upper bound on `team_size`; larger requests are rejected with
    /// [`CoreError::ResourceExhausted`].
    #[serde(default = "default_max_team_size")]
    pub max_team_size: usize,
}

fn default_max_team_size() -> usize {
    DEFAULT_MAX_TEAM_SIZE
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            team_size: None,
            schedule: ScheduleKind::Static,
            max_team_size: DEFAULT_MAX_TEAM_SIZE,
        }
    }
}

impl TeamConfig {
    /// Config with an explicit worker count and default limits.
    #[must_use]
    pub fn with_team_size(team_size: usize) -> Self {
        Self {
            team_size: Some(team_size),
            ..Self::default()
        }
    }

    /// Parses a config from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidConfig`] on malformed input.
    pub fn from_toml_str(text: &str) -> CoreResult<Self> {
        toml::from_str(text).map_err(|e| CoreError::InvalidConfig(e.to_string()))
    }

    /// Resolves the effective worker count: the explicit value, or the
    /// platform's hardware concurrency when unset.
    #[must_use]
    pub fn resolved_team_size(&self) -> usize {
        self.team_size.unwrap_or_else(|| {
            std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get)
        })
    }
}
