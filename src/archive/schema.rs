//! Archive TOML Schema
//!
//! Defines the structure of package archive files.

use serde::{Deserialize, Serialize};

/// Root archive file structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveFile {
    pub archive: ArchiveMeta,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
}

/// Archive metadata
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ArchiveMeta {
    pub name: String,
    pub url: Option<String>,
}

/// A package offered by an archive
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct PackageEntry {
    pub name: String,
    pub version: Option<String>,
    pub summary: Option<String>,
}

/// A package entry together with the archive that provided it
#[derive(Debug, Clone, PartialEq)]
pub struct AvailablePackage {
    pub entry: PackageEntry,
    pub archive: String,
}

impl ArchiveFile {
    /// Flatten into packages tagged with this archive's name
    pub fn into_packages(self) -> impl Iterator<Item = AvailablePackage> {
        let archive = self.archive.name;
        self.packages.into_iter().map(move |entry| AvailablePackage {
            entry,
            archive: archive.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_archive() {
        let content = r#"
[archive]
name = "melpa"
url = "https://melpa.org/packages/"

[[packages]]
name = "dash"
version = "2.19.1"
summary = "A modern list library for Emacs"

[[packages]]
name = "s"
"#;
        let file: ArchiveFile = toml::from_str(content).unwrap();
        assert_eq!(file.archive.name, "melpa");
        assert_eq!(file.packages.len(), 2);
        assert_eq!(file.packages[1].version, None);

        let packages: Vec<_> = file.into_packages().collect();
        assert!(packages.iter().all(|p| p.archive == "melpa"));
        assert_eq!(packages[0].entry.name, "dash");
    }

    #[test]
    fn test_archive_without_packages() {
        let file: ArchiveFile = toml::from_str("[archive]\nname = \"empty\"\n").unwrap();
        assert!(file.packages.is_empty());
        assert!(file.archive.url.is_none());
    }
}
