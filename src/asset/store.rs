use std::collections::{BTreeMap, BTreeSet};

use crate::asset::path::{AssetId, AssetPath, DEFAULT_CANONICAL_ROOT};
use crate::asset::record::TextureAssetRecord;
use crate::foundation::error::{BakeError, BakeResult};

/// Change notification published to asset registry listeners.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RegistryEvent {
    /// A record was created at this path.
    Created(AssetPath),
    /// An existing record at this path was replaced.
    Updated(AssetPath),
}

/// Identity of a record that already exists in a store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExistingRecord {
    /// Stable id, reused by the update.
    pub id: AssetId,
    /// Revision currently stored.
    pub revision: u32,
}

/// Persistent, hierarchical asset store.
///
/// The writer drives the store through `ensure_container`, `find_record`, `commit_record`,
/// `mark_dirty`, `notify` and `flush`, in that order. A commit is a single in-memory swap; only
/// `flush` touches durable storage.
pub trait AssetStore {
    /// Root every package path is normalized under, e.g. `/Game`.
    fn canonical_root(&self) -> &str;

    /// Make sure the package container for `path` exists.
    fn ensure_container(&mut self, path: &AssetPath) -> BakeResult<()>;

    /// Look up an existing record at `path`.
    fn find_record(&mut self, path: &AssetPath) -> BakeResult<Option<ExistingRecord>>;

    /// Install `record` at `record.path`, replacing any previous record atomically.
    fn commit_record(&mut self, record: TextureAssetRecord);

    /// Committed record at `path`, if any.
    fn record(&self, path: &AssetPath) -> Option<&TextureAssetRecord>;

    /// Flag `path` as modified and awaiting flush.
    fn mark_dirty(&mut self, path: &AssetPath);

    /// Publish a registry event.
    fn notify(&mut self, event: RegistryEvent);

    /// Persist the committed record at `path` to durable storage.
    fn flush(&mut self, path: &AssetPath) -> BakeResult<()>;
}

impl<S: AssetStore + ?Sized> AssetStore for &mut S {
    fn canonical_root(&self) -> &str {
        (**self).canonical_root()
    }

    fn ensure_container(&mut self, path: &AssetPath) -> BakeResult<()> {
        (**self).ensure_container(path)
    }

    fn find_record(&mut self, path: &AssetPath) -> BakeResult<Option<ExistingRecord>> {
        (**self).find_record(path)
    }

    fn commit_record(&mut self, record: TextureAssetRecord) {
        (**self).commit_record(record)
    }

    fn record(&self, path: &AssetPath) -> Option<&TextureAssetRecord> {
        (**self).record(path)
    }

    fn mark_dirty(&mut self, path: &AssetPath) {
        (**self).mark_dirty(path)
    }

    fn notify(&mut self, event: RegistryEvent) {
        (**self).notify(event)
    }

    fn flush(&mut self, path: &AssetPath) -> BakeResult<()> {
        (**self).flush(path)
    }
}

/// Volatile store with failure injection, used by tests and dry runs.
#[derive(Debug)]
pub struct MemoryAssetStore {
    root: String,
    containers: BTreeSet<String>,
    records: BTreeMap<AssetPath, TextureAssetRecord>,
    dirty: BTreeSet<AssetPath>,
    persisted: BTreeMap<AssetPath, u32>,
    events: Vec<RegistryEvent>,
    deny_containers: bool,
    fail_flush: bool,
}

impl Default for MemoryAssetStore {
    fn default() -> Self {
        Self::new(DEFAULT_CANONICAL_ROOT)
    }
}

impl MemoryAssetStore {
    /// Empty store rooted at `root`.
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            containers: BTreeSet::new(),
            records: BTreeMap::new(),
            dirty: BTreeSet::new(),
            persisted: BTreeMap::new(),
            events: Vec::new(),
            deny_containers: false,
            fail_flush: false,
        }
    }

    /// Make every `ensure_container` call for a missing container fail.
    pub fn deny_container_creation(mut self) -> Self {
        self.deny_containers = true;
        self
    }

    /// Make every `flush` fail after the record was committed.
    pub fn fail_flush(mut self) -> Self {
        self.fail_flush = true;
        self
    }

    /// Number of committed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was committed yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Committed records in path order.
    pub fn records(&self) -> impl Iterator<Item = &TextureAssetRecord> {
        self.records.values()
    }

    /// Events published so far, oldest first.
    pub fn events(&self) -> &[RegistryEvent] {
        &self.events
    }

    /// Whether `path` is committed but not yet flushed.
    pub fn is_dirty(&self, path: &AssetPath) -> bool {
        self.dirty.contains(path)
    }

    /// Revision last flushed for `path`.
    pub fn persisted_revision(&self, path: &AssetPath) -> Option<u32> {
        self.persisted.get(path).copied()
    }

    /// Whether a container exists for `package`.
    pub fn has_container(&self, package: &str) -> bool {
        self.containers.contains(package)
    }
}

impl AssetStore for MemoryAssetStore {
    fn canonical_root(&self) -> &str {
        &self.root
    }

    fn ensure_container(&mut self, path: &AssetPath) -> BakeResult<()> {
        if self.containers.contains(path.package()) {
            return Ok(());
        }
        if self.deny_containers {
            return Err(BakeError::directory_create(
                path.package(),
                "container creation denied",
            ));
        }
        self.containers.insert(path.package().to_string());
        Ok(())
    }

    fn find_record(&mut self, path: &AssetPath) -> BakeResult<Option<ExistingRecord>> {
        Ok(self.records.get(path).map(|r| ExistingRecord {
            id: r.id,
            revision: r.revision,
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
        self.events.push(event);
    }

    fn flush(&mut self, path: &AssetPath) -> BakeResult<()> {
        if self.fail_flush {
            return Err(BakeError::persist(path.identifier(), "flush rejected"));
        }
        let record = self
            .records
            .get(path)
            .ok_or_else(|| BakeError::persist(path.identifier(), "no committed record"))?;
        self.persisted.insert(path.clone(), record.revision);
        self.dirty.remove(path);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/asset/store.rs"]
mod tests;
