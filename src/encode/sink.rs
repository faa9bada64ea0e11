use std::collections::BTreeMap;
use std::io::Write as _;
use std::path::{Path, PathBuf};

use crate::foundation::core::ImageFormat;
use crate::foundation::error::{BakeError, BakeResult};

/// Destination for encoded image files.
pub trait ByteSink {
    /// Write `bytes` as the complete content of `path`.
    fn write(&mut self, path: &Path, bytes: &[u8]) -> BakeResult<()>;
}

/// Sink writing to the local filesystem.
///
/// Parent directories are created on demand. Content goes to a sibling temp file that is synced
/// and renamed over `path`, so a failed write never leaves a truncated file behind.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsByteSink;

impl ByteSink for FsByteSink {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> BakeResult<()> {
        if bytes.is_empty() {
            return Err(BakeError::write(path, "refusing to write an empty file"));
        }
        ensure_parent_dir(path)?;
        write_atomic(path, bytes).map_err(|e| BakeError::write(path, e.to_string()))?;
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "file written");
        Ok(())
    }
}

/// In-memory sink for tests and debugging.
#[derive(Debug, Default)]
pub struct InMemoryByteSink {
    files: BTreeMap<PathBuf, Vec<u8>>,
    reject_writes: bool,
}

impl InMemoryByteSink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose every write fails with [`BakeError::WriteFailed`].
    pub fn rejecting() -> Self {
        Self {
            files: BTreeMap::new(),
            reject_writes: true,
        }
    }

    /// Captured files by path.
    pub fn files(&self) -> &BTreeMap<PathBuf, Vec<u8>> {
        &self.files
    }

    /// Content written to `path`, if any.
    pub fn get(&self, path: &Path) -> Option<&[u8]> {
        self.files.get(path).map(Vec::as_slice)
    }
}

impl ByteSink for InMemoryByteSink {
    fn write(&mut self, path: &Path, bytes: &[u8]) -> BakeResult<()> {
        if self.reject_writes {
            return Err(BakeError::write(path, "sink rejects writes"));
        }
        if bytes.is_empty() {
            return Err(BakeError::write(path, "refusing to write an empty file"));
        }
        self.files.insert(path.to_path_buf(), bytes.to_vec());
        Ok(())
    }
}

/// `dir/name.<ext>` for an encoded output.
pub fn encoded_file_path(dir: &str, name: &str, format: ImageFormat) -> PathBuf {
    Path::new(dir).join(format!("{name}{}", format.extension()))
}

/// Create the parent directory of `path` if needed.
pub fn ensure_parent_dir(path: &Path) -> BakeResult<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .map_err(|e| BakeError::directory_create(parent, e.to_string()))?;
    }
    Ok(())
}

/// Write through a synced temp sibling, then rename over `path`.
pub(crate) fn write_atomic(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".partial");
    let tmp = path.with_file_name(tmp_name);

    let result = (|| -> std::io::Result<()> {
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        std::fs::rename(&tmp, path)
    })();
    if result.is_err() {
        let _ = std::fs::remove_file(&tmp);
    }
    result
}

#[cfg(test)]
#[path = "../../tests/unit/encode/sink.rs"]
mod tests;
