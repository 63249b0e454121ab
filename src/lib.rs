//! Library behind the `upgo` command line tool.
//!
//! Two independent resolvers form the core:
//!
//! - [`version`]: aggregates the released versions of a module from the
//!   configured proxy mirrors, deduplicated and annotated with
//!   retractions.
//! - [`repo`]: maps a module path to its canonical source repository
//!   and issue tracker URLs, via a static pattern table with a live
//!   go-get metadata fallback.
//!
//! They share only [`fetch`], the strict fetch-or-fail HTTP primitive.
//! [`toolchain`] and [`output`] carry the glue around the core: reading
//! module identity out of a built executable, driving `go install`, and
//! rendering results.

pub mod fetch;
pub mod output;
pub mod repo;
pub mod toolchain;
pub mod version;
