//! Addonbox - legacy game addon packaging
//!
//! Reads immutable package snapshots from a store and renders them into the
//! two wire formats the legacy client consumes:
//!
//! - a nested key/value **text manifest** listing metadata, content URLs and
//!   pinned includes, optionally followed by a raw payload
//! - a version 3 **binary archive** embedding whitelisted content bytes
//!
//! ```text
//! (id, rev?) ──► Resolver ──► Package ──┬──► ManifestEncoder ──► bytes
//!                   │                   └──► ArchiveEncoder ───► bytes
//!              PackageStore                        │
//!                                          Whitelist + BlobStore
//! ```
//!
//! [`service::PackageService`] wires these together from an explicit
//! [`config::ServiceConfig`].

pub mod archive;
pub mod config;
pub mod error;
pub mod logging;
pub mod manifest;
pub mod package;
pub mod resolver;
pub mod service;
pub mod store;
pub mod whitelist;

pub use error::{CoreError, CoreResult};
