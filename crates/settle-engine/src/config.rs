//! Grid configuration, validation, and error types.
//!
//! [`GridConfig`] tunes the background maintenance tasks and building
//! placement. [`validate()`](GridConfig::validate) checks it at startup;
//! [`MainGrid::new`](crate::MainGrid::new) calls it before touching the
//! layout.

use std::error::Error;
use std::fmt;

use settle_space::SpaceError;

// ── GridConfig ─────────────────────────────────────────────────────

/// Largest accepted [`GridConfig::tower_radius`].
pub const MAX_TOWER_RADIUS: u32 = 16;

/// Tunables for one [`MainGrid`](crate::MainGrid).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridConfig {
    /// Maximum number of tiles the landmark task floods before deciding a
    /// region is open land rather than an enclosed pocket. Default: 4096.
    pub landmark_region_limit: usize,
    /// How long [`tick()`](crate::MainGrid::tick) waits for each
    /// background task to drain its queue. Default: 1000.
    pub flush_timeout_ms: u64,
    /// Radius of the hex disk a tower claims when placed. Default: 6.
    pub tower_radius: u32,
    /// Capacity of each task's change queue. `None` = unbounded.
    /// Bounded queues apply back-pressure to the simulation thread.
    pub task_queue_capacity: Option<usize>,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            landmark_region_limit: 4096,
            flush_timeout_ms: 1000,
            tower_radius: 6,
            task_queue_capacity: None,
        }
    }
}

impl GridConfig {
    /// Check every invariant. Called by [`MainGrid::new`](crate::MainGrid::new).
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.landmark_region_limit == 0 {
            return Err(ConfigError::InvalidRegionLimit {
                value: self.landmark_region_limit,
            });
        }
        if self.flush_timeout_ms == 0 {
            return Err(ConfigError::InvalidFlushTimeout {
                value: self.flush_timeout_ms,
            });
        }
        if self.tower_radius > MAX_TOWER_RADIUS {
            return Err(ConfigError::InvalidTowerRadius {
                value: self.tower_radius,
                max: MAX_TOWER_RADIUS,
            });
        }
        if self.task_queue_capacity == Some(0) {
            return Err(ConfigError::TaskQueueZero);
        }
        Ok(())
    }
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected while building a [`MainGrid`](crate::MainGrid).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Map dimensions were rejected.
    Space(SpaceError),
    /// The layout has zero tiles.
    EmptyMap,
    /// Layout contents disagree with its dimensions or with each other.
    LayoutMismatch {
        /// Description of the mismatch.
        reason: String,
    },
    /// `landmark_region_limit` is zero.
    InvalidRegionLimit {
        /// The rejected value.
        value: usize,
    },
    /// `flush_timeout_ms` is zero.
    InvalidFlushTimeout {
        /// The rejected value.
        value: u64,
    },
    /// `tower_radius` exceeds [`MAX_TOWER_RADIUS`].
    InvalidTowerRadius {
        /// The rejected value.
        value: u32,
        /// Largest accepted value.
        max: u32,
    },
    /// `task_queue_capacity` is `Some(0)`.
    TaskQueueZero,
    /// A background thread could not be spawned.
    ThreadSpawnFailed {
        /// Description of which thread failed.
        reason: String,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Space(e) => write!(f, "space: {e}"),
            Self::EmptyMap => write!(f, "map has zero tiles"),
            Self::LayoutMismatch { reason } => write!(f, "layout mismatch: {reason}"),
            Self::InvalidRegionLimit { value } => {
                write!(f, "landmark_region_limit must be at least 1, got {value}")
            }
            Self::InvalidFlushTimeout { value } => {
                write!(f, "flush_timeout_ms must be at least 1, got {value}")
            }
            Self::InvalidTowerRadius { value, max } => {
                write!(f, "tower_radius {value} exceeds maximum of {max}")
            }
            Self::TaskQueueZero => write!(f, "task_queue_capacity must be at least 1"),
            Self::ThreadSpawnFailed { reason } => write!(f, "thread spawn failed: {reason}"),
        }
    }
}

impl Error for ConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Space(e) => Some(e),
            _ => None,
        }
    }
}

impl From<SpaceError> for ConfigError {
    fn from(e: SpaceError) -> Self {
        match e {
            SpaceError::EmptySpace => Self::EmptyMap,
            other => Self::Space(other),
        }
    }
}
