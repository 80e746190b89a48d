//! Package Registry
//!
//! Simple in-memory view of every package offered by the loaded archives.
//! Checks only ever read from it.

use std::collections::BTreeMap;

use super::schema::{ArchiveFile, AvailablePackage};

const BUILTIN_ARCHIVE: &str = include_str!("../../resources/archives/gnu.toml");

/// Merged package catalog
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PackageRegistry {
    packages: BTreeMap<String, AvailablePackage>,
}

impl PackageRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry populated from the archive embedded in the binary
    pub fn with_builtin_archive() -> Self {
        let mut registry = Self::new();
        registry.add_builtin_archive();
        registry
    }

    /// Add a package, replacing any earlier entry with the same name
    pub fn insert(&mut self, package: AvailablePackage) {
        self.packages.insert(package.entry.name.clone(), package);
    }

    /// Add every package of an archive file
    pub fn add_archive(&mut self, archive: ArchiveFile) {
        for package in archive.into_packages() {
            self.insert(package);
        }
    }

    /// Add the embedded GNU ELPA snapshot
    pub fn add_builtin_archive(&mut self) {
        match toml::from_str::<ArchiveFile>(BUILTIN_ARCHIVE) {
            Ok(archive) => self.add_archive(archive),
            Err(e) => log::warn!("Failed to parse embedded package archive: {}", e),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.packages.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&AvailablePackage> {
        self.packages.get(name)
    }

    /// Package names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<AvailablePackage> for PackageRegistry {
    fn from_iter<I: IntoIterator<Item = AvailablePackage>>(iter: I) -> Self {
        let mut registry = Self::new();
        for package in iter {
            registry.insert(package);
        }
        registry
    }
}
