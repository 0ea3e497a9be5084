//! Drift check between the ledger and the output directory
//!
//! A tracked file is missing when it is gone from disk, and drifted when its
//! bytes no longer hash to the checksum recorded by the run that wrote it.

use serde::{Deserialize, Serialize};

/// Overall result of a check, ordered from best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Every tracked file is present and unchanged
    Healthy,
    /// Some tracked files are gone from disk
    Missing,
    /// Some tracked files were edited after they were written
    Drifted,
    /// The ledger could not be read
    Broken,
}

/// One tracked file that failed the check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftItem {
    /// Path relative to the output directory
    pub path: String,
    /// Format tag recorded in the ledger
    pub format: String,
    pub description: String,
}

/// Findings of [`ExportEngine::check`](crate::ExportEngine::check)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckReport {
    pub status: CheckStatus,
    pub drifted: Vec<DriftItem>,
    pub missing: Vec<DriftItem>,
    /// Notes that do not affect the status
    pub messages: Vec<String>,
}

impl CheckReport {
    /// Report whose status is the worst finding. Drift outranks missing files.
    pub fn from_findings(
        missing: Vec<DriftItem>,
        drifted: Vec<DriftItem>,
        messages: Vec<String>,
    ) -> Self {
        let status = [
            (!missing.is_empty()).then_some(CheckStatus::Missing),
            (!drifted.is_empty()).then_some(CheckStatus::Drifted),
        ]
        .into_iter()
        .flatten()
        .max()
        .unwrap_or(CheckStatus::Healthy);

        Self {
            status,
            drifted,
            missing,
            messages,
        }
    }

    pub fn broken(message: impl Into<String>) -> Self {
        Self {
            status: CheckStatus::Broken,
            drifted: Vec::new(),
            missing: Vec::new(),
            messages: vec![message.into()],
        }
    }

    pub fn is_healthy(&self) -> bool {
        self.status == CheckStatus::Healthy
    }
}
