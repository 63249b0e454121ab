//! Version catalog resolution for Go modules.
//!
//! Given a module path and the configured proxy mirrors, this layer
//! produces the module's release history: one deduplicated list of
//! versions, newest first, each annotated with its publication time and
//! any retraction the publisher has since declared.
//!
//! # Modules
//!
//! - [`catalog`]: aggregation across mirrors, dedup, retraction marking
//! - [`proxy`]: the `GOPROXY` protocol client (`@v/list`, `.info`, `.mod`)
//! - [`dl`]: the distribution index used for standard-library releases
//! - [`modfile`]: `retract` directive extraction from manifests
//! - [`semver`]: Go-flavored version comparison
//! - [`error`]: catalog error types
//! - [`types`]: the [`VersionRecord`] result type

pub mod catalog;
pub mod dl;
pub mod error;
pub mod modfile;
pub mod proxy;
pub mod semver;
pub mod types;

pub use catalog::{STD_MODULE, available_versions};
pub use error::CatalogError;
pub use types::VersionRecord;
