use crate::asset::path::AssetPath;
use crate::asset::record::{MipPolicy, TextureAssetRecord};
use crate::asset::store::{AssetStore, RegistryEvent};
use crate::bake::config::BakeConfig;
use crate::foundation::error::BakeResult;
use crate::render::pixels::PixelBuffer;

/// Whether a write created a record or replaced one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordChange {
    /// No record existed at the path.
    Created,
    /// An existing record was replaced; its id was kept.
    Updated,
}

/// Outcome of [`write_asset`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssetWriteReport {
    /// Normalized path of the record.
    pub path: AssetPath,
    /// Created or updated.
    pub change: RecordChange,
    /// Revision now stored.
    pub revision: u32,
}

/// Write `buffer` as a texture asset record described by `config`.
///
/// The full record is built before the store is touched and installed with a single commit, so
/// readers see either the old record or the new one. A flush failure leaves the committed record
/// in memory, dirty and announced, and surfaces as `PersistFailed`.
#[tracing::instrument(
    skip_all,
    fields(name = %config.destination_name, package = %config.destination_path)
)]
pub fn write_asset<A, S>(
    store: &mut A,
    buffer: PixelBuffer,
    config: &BakeConfig<'_, S>,
) -> BakeResult<AssetWriteReport>
where
    A: AssetStore + ?Sized,
    S: ?Sized,
{
    let path = AssetPath::new(
        &config.destination_path,
        &config.destination_name,
        store.canonical_root(),
    )?;
    store.ensure_container(&path)?;

    let (id, revision, change) = match store.find_record(&path)? {
        Some(existing) => (
            existing.id,
            existing.revision.saturating_add(1),
            RecordChange::Updated,
        ),
        None => (path.asset_id(), 1, RecordChange::Created),
    };

    let resolution = buffer.resolution();
    let record = TextureAssetRecord {
        id,
        path: path.clone(),
        width: resolution,
        height: resolution,
        source: buffer.into_data(),
        compression: config.compression,
        srgb: false,
        mip_policy: MipPolicy::NoMipmaps,
        revision,
    };

    store.commit_record(record);
    store.mark_dirty(&path);
    store.notify(match change {
        RecordChange::Created => RegistryEvent::Created(path.clone()),
        RecordChange::Updated => RegistryEvent::Updated(path.clone()),
    });
    store.flush(&path)?;

    tracing::debug!(asset = %path, revision, ?change, "asset written");
    Ok(AssetWriteReport {
        path,
        change,
        revision,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/asset/writer.rs"]
mod tests;
