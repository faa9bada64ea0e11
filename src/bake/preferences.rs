use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::bake::config::BakeConfig;
use crate::encode::sink::{ensure_parent_dir, write_atomic};
use crate::foundation::core::{BitDepth, CompressionHint, DEFAULT_RESOLUTION, OutputKind};
use crate::foundation::error::{BakeError, BakeResult};

/// Destination offered when nothing was remembered yet.
pub const DEFAULT_DESTINATION_PATH: &str = "/Game/Textures";

/// Last-used bake choices, persisted between sessions as JSON.
///
/// Missing fields fall back to their defaults, so older files keep loading.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BakePreferences {
    /// Edge length in pixels.
    pub resolution: u32,
    /// Destination directory or package path.
    pub destination_path: String,
    /// Surface precision.
    pub bit_depth: BitDepth,
    /// Asset or encoded file.
    pub output: OutputKind,
    /// Compression hint for asset output.
    pub compression: CompressionHint,
}

impl Default for BakePreferences {
    fn default() -> Self {
        Self {
            resolution: DEFAULT_RESOLUTION,
            destination_path: DEFAULT_DESTINATION_PATH.to_string(),
            bit_depth: BitDepth::Float16,
            output: OutputKind::Asset,
            compression: CompressionHint::Default,
        }
    }
}

impl BakePreferences {
    /// Load preferences from `path`, or defaults when the file does not exist.
    pub fn load_or_default(path: &Path) -> BakeResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read preferences '{}'", path.display()))?;
        let prefs: Self = serde_json::from_str(&json)
            .with_context(|| format!("parse preferences '{}'", path.display()))?;
        Ok(prefs)
    }

    /// Write preferences to `path` as pretty JSON.
    pub fn save(&self, path: &Path) -> BakeResult<()> {
        let json = serde_json::to_vec_pretty(self).context("serialize preferences")?;
        ensure_parent_dir(path)?;
        write_atomic(path, &json).map_err(|e| BakeError::write(path, e.to_string()))
    }

    /// Remember the choices of `config`.
    pub fn remember<S: ?Sized>(&mut self, config: &BakeConfig<'_, S>) {
        self.resolution = config.resolution;
        self.destination_path = config.destination_path.clone();
        self.bit_depth = config.bit_depth;
        self.output = config.output;
        self.compression = config.compression;
    }

    /// Config seeded with these preferences and no source.
    pub fn to_config<'a, S: ?Sized>(
        &self,
        destination_name: impl Into<String>,
    ) -> BakeConfig<'a, S> {
        BakeConfig::new(destination_name, self.destination_path.clone())
            .with_output(self.output)
            .with_resolution(self.resolution)
            .with_bit_depth(self.bit_depth)
            .with_compression(self.compression)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/preferences.rs"]
mod tests;
