//! Run outcomes
//!
//! Every outcome of a run is a [`RunEvent`]. Events are handed to a
//! [`Reporter`] as they happen; reporting never changes what the run does.

use std::fmt;

use export_fs::NormalizedPath;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// A single outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum RunEvent {
    Created { path: NormalizedPath },
    Deleted { path: NormalizedPath },
    CreateFailed { path: NormalizedPath, reason: String },
    DeleteFailed { path: NormalizedPath, reason: String },
    /// The decision function rejected an object
    ObjectFailed { object: String, reason: String },
    WouldCreate { path: NormalizedPath },
    WouldDelete { path: NormalizedPath },
}

impl RunEvent {
    pub fn is_failure(&self) -> bool {
        matches!(
            self,
            Self::CreateFailed { .. } | Self::DeleteFailed { .. } | Self::ObjectFailed { .. }
        )
    }

    /// Path the event is about, if it concerns a file
    pub fn path(&self) -> Option<&NormalizedPath> {
        match self {
            Self::Created { path }
            | Self::Deleted { path }
            | Self::CreateFailed { path, .. }
            | Self::DeleteFailed { path, .. }
            | Self::WouldCreate { path }
            | Self::WouldDelete { path } => Some(path),
            Self::ObjectFailed { .. } => None,
        }
    }
}

impl fmt::Display for RunEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { path } => write!(f, "Created file: {}", path.as_str()),
            Self::Deleted { path } => write!(f, "Deleted file: {}", path.as_str()),
            Self::CreateFailed { path, .. } => {
                write!(f, "Could not create file: {}", path.as_str())
            }
            Self::DeleteFailed { path, .. } => {
                write!(f, "Could not delete file: {}", path.as_str())
            }
            Self::ObjectFailed { object, reason } => {
                write!(f, "Could not process object {object}: {reason}")
            }
            Self::WouldCreate { path } => {
                write!(f, "[dry-run] Would create file: {}", path.as_str())
            }
            Self::WouldDelete { path } => {
                write!(f, "[dry-run] Would delete file: {}", path.as_str())
            }
        }
    }
}

/// Sink for run events
pub trait Reporter {
    fn record(&mut self, event: RunEvent);
}

/// Report from an export run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RunReport {
    /// Whether the run only simulated its changes
    pub dry_run: bool,
    /// Events in the order they happened
    pub events: Vec<RunEvent>,
}

impl RunReport {
    pub fn new(dry_run: bool) -> Self {
        Self {
            dry_run,
            events: Vec::new(),
        }
    }

    /// True when no object or file failed
    pub fn success(&self) -> bool {
        !self.events.iter().any(RunEvent::is_failure)
    }

    pub fn failures(&self) -> impl Iterator<Item = &RunEvent> {
        self.events.iter().filter(|event| event.is_failure())
    }

    pub fn created(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.events.iter().filter_map(|event| match event {
            RunEvent::Created { path } => Some(path),
            _ => None,
        })
    }

    pub fn deleted(&self) -> impl Iterator<Item = &NormalizedPath> {
        self.events.iter().filter_map(|event| match event {
            RunEvent::Deleted { path } => Some(path),
            _ => None,
        })
    }

    /// Human-readable log lines, one per event
    pub fn lines(&self) -> Vec<String> {
        self.events.iter().map(ToString::to_string).collect()
    }
}

impl Reporter for RunReport {
    fn record(&mut self, event: RunEvent) {
        match &event {
            RunEvent::CreateFailed { reason, .. }
            | RunEvent::DeleteFailed { reason, .. }
            | RunEvent::ObjectFailed { reason, .. } => warn!(%reason, "{event}"),
            _ => info!("{event}"),
        }
        self.events.push(event);
    }
}
