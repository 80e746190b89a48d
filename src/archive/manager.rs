//! Archive loading and live reload.
//!
//! This module handles:
//! - Loading archive definitions from TOML files
//! - Loading priority: built-in < user-global < workspace < explicit dir < explicit files
//! - Watching archive directories and reloading on change

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use notify::{Config as WatcherConfig, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::{mpsc, RwLock};
use tower_lsp::lsp_types::MessageType;
use tower_lsp::Client;

use super::registry::PackageRegistry;
use super::schema::ArchiveFile;
use crate::config::Config;

/// Where a loaded archive came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ArchivePriority {
    BuiltIn = 0,
    Directory = 1,
    Explicit = 2,
}

/// Summary of one archive that contributed to the registry
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedArchive {
    pub name: String,
    pub priority: ArchivePriority,
    pub source_path: Option<PathBuf>,
    pub package_count: usize,
}

/// Events from the file watcher
#[derive(Debug)]
enum WatcherEvent {
    ArchiveFileChanged(PathBuf),
    WatcherError(notify::Error),
}

/// Owns the shared package registry and keeps it in sync with archive files
pub struct ArchiveManager {
    registry: Arc<RwLock<PackageRegistry>>,
    archives: Arc<RwLock<Vec<LoadedArchive>>>,
    /// Directories scanned for `*.toml`, lowest priority first
    archive_dirs: Vec<PathBuf>,
    /// Archive files named explicitly on the command line
    archive_files: Vec<PathBuf>,
    _watcher: Option<RecommendedWatcher>,
    client: Option<Client>,
}

impl ArchiveManager {
    pub fn new(config: &Config) -> Self {
        Self {
            registry: Arc::new(RwLock::new(PackageRegistry::new())),
            archives: Arc::new(RwLock::new(Vec::new())),
            archive_dirs: config.archive_dirs.clone(),
            archive_files: config.archive_files.clone(),
            _watcher: None,
            client: None,
        }
    }

    /// Load every archive and start watching the archive directories
    pub async fn initialize(&mut self, client: Option<Client>) -> Result<()> {
        self.client = client;
        self.reload().await;
        self.start_watching()?;
        Ok(())
    }

    /// Rebuild the registry from all sources
    pub async fn reload(&self) {
        Self::reload_shared(
            &self.registry,
            &self.archives,
            &self.archive_dirs,
            &self.archive_files,
            self.client.as_ref(),
        )
        .await;
    }

    /// Copy of the current registry for a single check
    pub async fn snapshot(&self) -> PackageRegistry {
        self.registry.read().await.clone()
    }

    /// Handle to the live registry
    pub fn shared_registry(&self) -> Arc<RwLock<PackageRegistry>> {
        self.registry.clone()
    }

    pub async fn loaded_archives(&self) -> Vec<LoadedArchive> {
        self.archives.read().await.clone()
    }

    async fn reload_shared(
        registry: &RwLock<PackageRegistry>,
        archives: &RwLock<Vec<LoadedArchive>>,
        archive_dirs: &[PathBuf],
        archive_files: &[PathBuf],
        client: Option<&Client>,
    ) {
        let mut new_registry = PackageRegistry::new();
        let mut loaded = Vec::new();

        new_registry.add_builtin_archive();
        loaded.push(LoadedArchive {
            name: "gnu".to_string(),
            priority: ArchivePriority::BuiltIn,
            source_path: None,
            package_count: new_registry.len(),
        });

        for dir in archive_dirs {
            match list_archive_files(dir).await {
                Ok(paths) => {
                    for path in paths {
                        load_into(&path, ArchivePriority::Directory, &mut new_registry, &mut loaded, client)
                            .await;
                    }
                }
                Err(e) => report(client, MessageType::ERROR, format!("{:#}", e)).await,
            }
        }

        for path in archive_files {
            load_into(path, ArchivePriority::Explicit, &mut new_registry, &mut loaded, client).await;
        }

        let count = new_registry.len();
        *registry.write().await = new_registry;
        *archives.write().await = loaded;

        report(
            client,
            MessageType::INFO,
            format!("Loaded {} packages from package archives", count),
        )
        .await;
    }

    /// Start file watching for archive directories and explicit files
    fn start_watching(&mut self) -> Result<()> {
        let (tx, mut rx) = mpsc::unbounded_channel();

        let mut watcher = RecommendedWatcher::new(
            move |res: Result<Event, notify::Error>| match res {
                Ok(event) => {
                    if let EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_) =
                        event.kind
                    {
                        for path in event.paths {
                            if is_archive_file(&path) {
                                let _ = tx.send(WatcherEvent::ArchiveFileChanged(path));
                            }
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatcherEvent::WatcherError(e));
                }
            },
            WatcherConfig::default().with_poll_interval(Duration::from_secs(1)),
        )?;

        for path in self.archive_dirs.iter().chain(&self.archive_files) {
            if path.exists() {
                watcher
                    .watch(path, RecursiveMode::NonRecursive)
                    .with_context(|| format!("Failed to watch {}", path.display()))?;
            }
        }

        self._watcher = Some(watcher);

        let registry = self.registry.clone();
        let archives = self.archives.clone();
        let archive_dirs = self.archive_dirs.clone();
        let archive_files = self.archive_files.clone();
        let client = self.client.clone();

        tokio::spawn(async move {
            while let Some(event) = rx.recv().await {
                match event {
                    WatcherEvent::ArchiveFileChanged(path) => {
                        log::debug!("Archive file changed: {}", path.display());
                        // Rebuild everything: removals and priority overrides stay correct
                        Self::reload_shared(
                            &registry,
                            &archives,
                            &archive_dirs,
                            &archive_files,
                            client.as_ref(),
                        )
                        .await;
                    }
                    WatcherEvent::WatcherError(e) => {
                        report(
                            client.as_ref(),
                            MessageType::ERROR,
                            format!("Archive file watcher error: {}", e),
                        )
                        .await;
                    }
                }
            }
        });

        Ok(())
    }
}

/// Parse archive content from a TOML string
pub fn parse_archive(content: &str, source_path: Option<&Path>) -> Result<ArchiveFile> {
    toml::from_str(content).with_context(|| match source_path {
        Some(path) => format!("Failed to parse archive TOML: {}", path.display()),
        None => "Failed to parse archive TOML".to_string(),
    })
}

/// Read and parse a single archive file
pub async fn load_archive_file(path: &Path) -> Result<ArchiveFile> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read archive file: {}", path.display()))?;
    parse_archive(&content, Some(path))
}

async fn load_into(
    path: &Path,
    priority: ArchivePriority,
    registry: &mut PackageRegistry,
    loaded: &mut Vec<LoadedArchive>,
    client: Option<&Client>,
) {
    match load_archive_file(path).await {
        Ok(archive) => {
            loaded.push(LoadedArchive {
                name: archive.archive.name.clone(),
                priority,
                source_path: Some(path.to_path_buf()),
                package_count: archive.packages.len(),
            });
            registry.add_archive(archive);
        }
        Err(e) => report(client, MessageType::ERROR, format!("{:#}", e)).await,
    }
}

/// Archive files in a directory, sorted by name so load order is stable
async fn list_archive_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.exists() {
        return Ok(Vec::new());
    }

    let mut entries = tokio::fs::read_dir(dir)
        .await
        .with_context(|| format!("Failed to read archive directory: {}", dir.display()))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if is_archive_file(&path) {
            paths.push(path);
        }
    }
    paths.sort();

    Ok(paths)
}

fn is_archive_file(path: &Path) -> bool {
    path.extension().and_then(|s| s.to_str()) == Some("toml")
}

async fn report(client: Option<&Client>, level: MessageType, message: String) {
    if level == MessageType::ERROR {
        log::error!("{}", message);
    } else {
        log::info!("{}", message);
    }

    if let Some(client) = client {
        client.log_message(level, message).await;
    }
}
