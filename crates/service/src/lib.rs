//! Service layer persisting active repo/branch instances.
//! - `storage` holds the YAML file-backed store and its on-disk format.
//! - `registry` abstracts the store behind an async trait for binaries.
//! - Provides clear error types and documented interfaces.

pub mod errors;
pub mod registry;
pub mod storage;
