use std::fmt;
use std::path::PathBuf;

use crate::encode::sink::encoded_file_path;
use crate::foundation::core::{
    BitDepth, CompressionHint, DEFAULT_RESOLUTION, ImageFormat, OutputKind,
};
use crate::foundation::error::{BakeError, BakeResult, InvalidConfigReason};
use crate::render::renderer::SurfaceSource;

/// Everything one bake needs. Read-only for the duration of the bake.
pub struct BakeConfig<'a, S: ?Sized> {
    /// Material (or other surface source) to render; `None` is rejected by [`Self::validate`].
    pub source: Option<&'a S>,
    /// Asset record or encoded file.
    pub output: OutputKind,
    /// Square edge length in pixels.
    pub resolution: u32,
    /// Surface precision.
    pub bit_depth: BitDepth,
    /// Compression hint for asset output.
    pub compression: CompressionHint,
    /// Record or file name without extension.
    pub destination_name: String,
    /// Filesystem directory for encoded output, store package path for asset output.
    pub destination_path: String,
}

impl<'a, S: ?Sized> BakeConfig<'a, S> {
    /// Config with no source, asset output and default resolution, depth and compression.
    pub fn new(destination_name: impl Into<String>, destination_path: impl Into<String>) -> Self {
        Self {
            source: None,
            output: OutputKind::Asset,
            resolution: DEFAULT_RESOLUTION,
            bit_depth: BitDepth::Float16,
            compression: CompressionHint::Default,
            destination_name: destination_name.into(),
            destination_path: destination_path.into(),
        }
    }

    /// Set the surface source.
    pub fn with_source(mut self, source: &'a S) -> Self {
        self.source = Some(source);
        self
    }

    /// Set the output kind.
    pub fn with_output(mut self, output: OutputKind) -> Self {
        self.output = output;
        self
    }

    /// Set the edge length.
    pub fn with_resolution(mut self, resolution: u32) -> Self {
        self.resolution = resolution;
        self
    }

    /// Set the surface precision.
    pub fn with_bit_depth(mut self, bit_depth: BitDepth) -> Self {
        self.bit_depth = bit_depth;
        self
    }

    /// Set the compression hint.
    pub fn with_compression(mut self, compression: CompressionHint) -> Self {
        self.compression = compression;
        self
    }

    /// Pre-flight checks. Pure; runs before any resource is acquired.
    ///
    /// The bit depth is never inferred from the output format: PNG requires
    /// [`BitDepth::Int8`], EXR requires [`BitDepth::Float16`], and a mismatch is rejected as
    /// invalid settings. Use [`BitDepth::preferred_for`] to pick the depth a format needs.
    /// `..` is only refused in asset package paths; file output directories are plain
    /// filesystem paths.
    pub fn validate(&self) -> BakeResult<()> {
        if self.source.is_none() {
            return Err(BakeError::invalid(InvalidConfigReason::NoSource));
        }
        let name = self.destination_name.trim();
        if name.is_empty() {
            return Err(BakeError::invalid(InvalidConfigReason::EmptyName));
        }
        if name.contains(['/', '\\']) {
            return Err(BakeError::invalid_settings(format!(
                "output name '{name}' must not contain path separators"
            )));
        }
        if self.resolution == 0 {
            return Err(BakeError::invalid_settings("resolution must be positive"));
        }
        if let OutputKind::EncodedFile(format) = self.output
            && !format.accepts(self.bit_depth)
        {
            let needed = BitDepth::preferred_for(format).unwrap_or(self.bit_depth);
            return Err(BakeError::invalid_settings(format!(
                "{format} output needs {needed} pixels, got {}",
                self.bit_depth
            )));
        }
        if self.output == OutputKind::Asset
            && self
                .destination_path
                .split(['/', '\\'])
                .any(|segment| segment == "..")
        {
            return Err(BakeError::invalid_settings(
                "asset package path must not contain '..'",
            ));
        }
        Ok(())
    }

    /// File an encoded bake of this config is written to.
    pub fn file_path(&self, format: ImageFormat) -> PathBuf {
        encoded_file_path(&self.destination_path, self.destination_name.trim(), format)
    }
}

impl<S: ?Sized> Clone for BakeConfig<'_, S> {
    fn clone(&self) -> Self {
        Self {
            source: self.source,
            output: self.output,
            resolution: self.resolution,
            bit_depth: self.bit_depth,
            compression: self.compression,
            destination_name: self.destination_name.clone(),
            destination_path: self.destination_path.clone(),
        }
    }
}

impl<S: SurfaceSource + ?Sized> fmt::Debug for BakeConfig<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BakeConfig")
            .field("source", &self.source.map(|s| s.source_name()))
            .field("output", &self.output)
            .field("resolution", &self.resolution)
            .field("bit_depth", &self.bit_depth)
            .field("compression", &self.compression)
            .field("destination_name", &self.destination_name)
            .field("destination_path", &self.destination_path)
            .finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/config.rs"]
mod tests;
