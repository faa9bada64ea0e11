use super::*;

use crate::asset::record::MipPolicy;
use crate::foundation::core::CompressionHint;
use crate::render::pixels::PixelData;

fn temp_dir(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "texbake_{name}_{}_{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

fn record(path: AssetPath, revision: u32) -> TextureAssetRecord {
    TextureAssetRecord {
        id: path.asset_id(),
        path,
        width: 2,
        height: 2,
        source: PixelData::Bgra8(vec![5; 16]),
        compression: CompressionHint::Grayscale,
        srgb: false,
        mip_policy: MipPolicy::NoMipmaps,
        revision,
    }
}

#[test]
fn identifiers_map_below_content_dir() {
    let store = FsAssetStore::new("content");
    let p = AssetPath::new("/Game/Textures/Rock", "T_Rock", "/Game").unwrap();
    assert_eq!(
        store.file_path(&p),
        Path::new("content")
            .join("Textures")
            .join("Rock")
            .join("T_Rock.texasset")
    );
}

#[test]
fn flushed_record_is_found_by_a_fresh_store() {
    let tmp = temp_dir("fs_store_flush");
    let p = AssetPath::new("Textures", "T_A", "/Game").unwrap();

    let mut store = FsAssetStore::new(&tmp);
    store.ensure_container(&p).unwrap();
    assert!(tmp.join("Textures").is_dir());
    assert_eq!(store.find_record(&p).unwrap(), None);

    store.commit_record(record(p.clone(), 4));
    store.mark_dirty(&p);
    store.flush(&p).unwrap();
    assert!(!store.is_dirty(&p));
    assert!(!tmp.join("Textures").join("T_A.texasset.partial").exists());

    let mut fresh = FsAssetStore::new(&tmp);
    assert_eq!(
        fresh.find_record(&p).unwrap(),
        Some(ExistingRecord {
            id: p.asset_id(),
            revision: 4
        })
    );
    assert_eq!(fresh.load(&p).unwrap(), record(p.clone(), 4));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn blocked_container_is_a_directory_error() {
    let tmp = temp_dir("fs_store_blocked");
    std::fs::create_dir_all(&tmp).unwrap();
    std::fs::write(tmp.join("Textures"), b"not a dir").unwrap();

    let mut store = FsAssetStore::new(&tmp);
    let p = AssetPath::new("Textures", "T_A", "/Game").unwrap();
    assert!(matches!(
        store.ensure_container(&p),
        Err(BakeError::DirectoryCreateFailed { .. })
    ));

    std::fs::remove_dir_all(&tmp).ok();
}

#[test]
fn flush_into_missing_directory_is_a_persist_error() {
    let tmp = temp_dir("fs_store_missing");
    let mut store = FsAssetStore::new(&tmp);
    let p = AssetPath::new("Nowhere", "T_A", "/Game").unwrap();
    store.commit_record(record(p.clone(), 1));
    store.mark_dirty(&p);
    assert!(matches!(
        store.flush(&p),
        Err(BakeError::PersistFailed { .. })
    ));
    assert!(store.is_dirty(&p));
    assert!(store.record(&p).is_some());
}
