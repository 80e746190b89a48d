//! Package Archives
//!
//! TOML-backed package catalogs that make up the registry consulted by
//! the availability check.

pub mod manager;
pub mod registry;
pub mod schema;

pub use manager::{ArchiveManager, ArchivePriority, LoadedArchive};
pub use registry::PackageRegistry;
pub use schema::{ArchiveFile, AvailablePackage, PackageEntry};
