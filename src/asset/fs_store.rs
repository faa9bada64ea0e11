use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use crate::asset::path::{AssetPath, DEFAULT_CANONICAL_ROOT};
use crate::asset::record::{
    TEXASSET_EXTENSION, TextureAssetRecord, read_record_file, read_record_header,
};
use crate::asset::store::{AssetStore, ExistingRecord, RegistryEvent};
use crate::encode::sink::write_atomic;
use crate::foundation::error::{BakeError, BakeResult};

/// Asset store backed by a content directory.
///
/// `/Game/Textures/T_Rock` maps to `<content_dir>/Textures/T_Rock.texasset`. Committed records
/// are kept in memory until flushed.
#[derive(Debug)]
pub struct FsAssetStore {
    content_dir: PathBuf,
    root: String,
    records: HashMap<AssetPath, TextureAssetRecord>,
    dirty: HashSet<AssetPath>,
    events: Vec<RegistryEvent>,
}

impl FsAssetStore {
    /// Store rooted at `/Game` over `content_dir`.
    pub fn new(content_dir: impl Into<PathBuf>) -> Self {
        Self::with_root(content_dir, DEFAULT_CANONICAL_ROOT)
    }

    /// Store rooted at `root` over `content_dir`.
    pub fn with_root(content_dir: impl Into<PathBuf>, root: impl Into<String>) -> Self {
        Self {
            content_dir: content_dir.into(),
            root: root.into(),
            records: HashMap::new(),
            dirty: HashSet::new(),
            events: Vec::new(),
        }
    }

    /// Directory backing the canonical root.
    pub fn content_dir(&self) -> &Path {
        &self.content_dir
    }

    /// File backing `path`.
    pub fn file_path(&self, path: &AssetPath) -> PathBuf {
        self.container_dir(path)
            .join(format!("{}.{TEXASSET_EXTENSION}", path.name()))
    }

    /// Load the record for `path` from disk.
    pub fn load(&self, path: &AssetPath) -> BakeResult<TextureAssetRecord> {
        read_record_file(&self.file_path(path))
    }

    /// Events published so far, oldest first.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Whether `path` is committed but not yet flushed.
    pub fn is_dirty(&self, path: &AssetPath) -> bool {
        self.dirty.contains(path)
    }

    fn container_dir(&self, path: &AssetPath) -> PathBuf {
        let mut dir = self.content_dir.clone();
        dir.extend(path.segments_below(&self.root));
        dir
    }
}

impl AssetStore for FsAssetStore {
    fn canonical_root(&self) -> &str {
        &self.root
    }

    fn ensure_container(&mut self, path: &AssetPath) -> BakeResult<()> {
        let dir = self.container_dir(path);
        if dir.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(&dir).map_err(|e| BakeError::directory_create(&dir, e.to_string()))
    }

    fn find_record(&mut self, path: &AssetPath) -> BakeResult<Option<ExistingRecord>> {
        if let Some(r) = self.records.get(path) {
            return Ok(Some(ExistingRecord {
                id: r.id,
                revision: r.revision,
            }));
        }
        let file = self.file_path(path);
        if !file.is_file() {
            return Ok(None);
        }
        let header = read_record_header(&file)?;
        Ok(Some(ExistingRecord {
            id: header.id,
            revision: header.revision,
        }))
    }

    fn commit_record(&mut self, record: TextureAssetRecord) {
        self.records.insert(record.path.clone(), record);
    }

    fn record(&self, path: &AssetPath) -> Option<&TextureAssetRecord> {
        self.records.get(path)
    }

    fn mark_dirty(&mut self, path: &AssetPath) {
        self.dirty.insert(path.clone());
    }

    fn notify(&mut self, event: RegistryEvent) {
        tracing::debug!(?event, "asset registry event");
        self.events.push(event);
    }

    fn flush(&mut self, path: &AssetPath) -> BakeResult<()> {
        let record = self
            .records
            .get(path)
            .ok_or_else(|| BakeError::persist(path.identifier(), "no committed record"))?;
        let bytes = record
            .to_bytes()
            .map_err(|e| BakeError::persist(path.identifier(), e.to_string()))?;
        let file = self.file_path(path);
        write_atomic(&file, &bytes).map_err(|e| {
            BakeError::persist(path.identifier(), format!("{}: {e}", file.display()))
        })?;
        self.dirty.remove(path);
        tracing::debug!(asset = %path, file = %file.display(), bytes = bytes.len(), "asset flushed");
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/asset/fs_store.rs"]
mod tests;
