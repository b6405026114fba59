//! Storage abstractions for service layer
//!
//! Contains the file-backed instance store together with the ordered
//! mapping it loads and the YAML layout it writes.

pub mod completion;
pub mod mapping;
pub mod yaml_db;
pub mod yaml_format;

pub use mapping::{Instance, Mapping};
pub use yaml_db::YamlDb;
