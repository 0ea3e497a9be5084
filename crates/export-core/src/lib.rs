//! Core reconciliation engine for content-export
//!
//! Objects from a content source are mapped to files by a
//! [`DecisionFunction`], and the resulting file set is reconciled against
//! the files written by the previous run:
//!
//! - **Decision**: each [`Object`] yields a [`Decision`], either a
//!   [`WriteSpec`], a skip, or an invalid-object reason
//! - **Rules**: [`RuleSet`] is the declarative decision function loaded from
//!   the [`Manifest`]
//! - **Reconcile**: specs are grouped by path, stale files are deleted and
//!   every planned file is written, each path failing on its own
//! - **Ledger**: the set of files owned by the exporter, persisted between runs
//!
//! [`ExportEngine`] wires these together for one output directory.

pub mod check;
pub mod config;
pub mod decision;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod object;
pub mod reconcile;
pub mod rules;
pub mod slug;

pub use check::{CheckReport, CheckStatus, DriftItem};
pub use config::Manifest;
pub use decision::{Decision, DecisionFunction, Utils, WriteSpec};
pub use engine::{ExportEngine, TransformOutput};
pub use error::{Error, Result};
pub use ledger::{Ledger, TrackedFile};
pub use object::{Object, ObjectMetadata};
pub use reconcile::{FileSystem, LocalFileSystem, Reporter, RunEvent, RunOptions, RunReport};
pub use rules::{Rule, RuleSet};
pub use slug::slugify;
