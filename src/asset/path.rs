use std::fmt;

use serde::{Deserialize, Serialize};

use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::Fnv1a64;

/// Canonical root used when nothing else is configured.
pub const DEFAULT_CANONICAL_ROOT: &str = "/Game";

/// Stable identifier of a texture asset record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Construct an [`AssetId`] from raw 64-bit value.
    pub fn from_u64(raw: u64) -> Self {
        Self(raw)
    }

    /// Access raw 64-bit identifier.
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

/// Normalized package path plus record name, e.g. `/Game/Textures` + `T_Rock`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AssetPath {
    package: String,
    name: String,
}

impl AssetPath {
    /// Normalize `raw_package` under `root` and attach `name`.
    pub fn new(raw_package: &str, name: &str, root: &str) -> BakeResult<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BakeError::invalid_settings("asset name must be non-empty"));
        }
        if name.contains(['/', '\\']) || name == "." || name == ".." {
            return Err(BakeError::invalid_settings(format!(
                "asset name '{name}' must not contain path separators"
            )));
        }
        Ok(Self {
            package: normalize_package_path(raw_package, root)?,
            name: name.to_string(),
        })
    }

    /// Normalized package path, always starting with `/`.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// Record name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Full identifier, `<package>/<name>`.
    pub fn identifier(&self) -> String {
        if self.package == "/" {
            format!("/{}", self.name)
        } else {
            format!("{}/{}", self.package, self.name)
        }
    }

    /// Package segments below `root`, used to map the package onto a directory tree.
    pub fn segments_below<'a>(&'a self, root: &str) -> Vec<&'a str> {
        let root_len = segments(root).count();
        segments(&self.package).skip(root_len).collect()
    }

    /// Deterministic id derived from the identifier.
    pub fn asset_id(&self) -> AssetId {
        let mut hasher = Fnv1a64::new_default();
        hasher.write_u8(b'T');
        hasher.write_bytes(self.package.as_bytes());
        hasher.write_u8(0);
        hasher.write_bytes(self.name.as_bytes());
        AssetId(hasher.finish())
    }
}

impl fmt::Display for AssetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.identifier())
    }
}

fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty() && *s != ".")
}

/// Normalize a store package path under the canonical `root`.
///
/// Backslashes become `/`, empty and `.` segments are dropped, and `..` is rejected. A path that
/// does not already start with the root's segments (with or without a leading `/`) gets the
/// root prepended. The result starts with `/` and has no trailing separator unless it is `/`.
pub fn normalize_package_path(raw: &str, root: &str) -> BakeResult<String> {
    let raw = raw.trim().replace('\\', "/");
    let mut parts = Vec::<&str>::new();
    for part in segments(&raw) {
        if part == ".." {
            return Err(BakeError::invalid_settings(
                "asset paths must not contain '..'",
            ));
        }
        parts.push(part);
    }

    let root_parts: Vec<&str> = segments(root).collect();
    if root_parts.contains(&"..") {
        return Err(BakeError::invalid_settings(
            "canonical root must not contain '..'",
        ));
    }

    let mut out = Vec::with_capacity(root_parts.len() + parts.len());
    if !parts.starts_with(&root_parts) {
        out.extend_from_slice(&root_parts);
    }
    out.extend_from_slice(&parts);

    Ok(format!("/{}", out.join("/")))
}

#[cfg(test)]
#[path = "../../tests/unit/asset/path.rs"]
mod tests;
