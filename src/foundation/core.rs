use std::fmt;

use serde::{Deserialize, Serialize};

/// Resolutions offered by default, all square.
pub const RESOLUTION_PRESETS: [u32; 8] = [64, 128, 256, 512, 1024, 2048, 4096, 8192];

/// Resolution used when nothing else is configured.
pub const DEFAULT_RESOLUTION: u32 = 1024;

/// Largest surface edge the pipeline will allocate.
pub const MAX_RESOLUTION: u32 = 16384;

/// Per-channel precision of the transient surface and of the baked pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BitDepth {
    /// 4×u8 per pixel, stored B,G,R,A.
    Int8,
    /// 4×f16 per pixel, stored R,G,B,A, linear and unclamped.
    Float16,
}

impl BitDepth {
    /// Bytes per pixel of the in-memory layout.
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Int8 => 4,
            Self::Float16 => 8,
        }
    }

    /// Bit depth a container format requires, or `None` when it accepts both.
    pub fn preferred_for(format: ImageFormat) -> Option<Self> {
        match format {
            ImageFormat::Png => Some(Self::Int8),
            ImageFormat::Exr => Some(Self::Float16),
            ImageFormat::Tga | ImageFormat::Tiff => None,
        }
    }

    /// Short label, e.g. `8-bit`.
    pub fn label(self) -> &'static str {
        match self {
            Self::Int8 => "8-bit",
            Self::Float16 => "16-bit",
        }
    }
}

impl fmt::Display for BitDepth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Portable image container produced by the codec.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageFormat {
    /// Lossless 8-bit PNG, always opaque.
    Png,
    /// OpenEXR, linear half float.
    Exr,
    /// Truevision TGA.
    Tga,
    /// TIFF.
    Tiff,
}

impl ImageFormat {
    /// Every supported format, in menu order.
    pub const ALL: [Self; 4] = [Self::Png, Self::Exr, Self::Tga, Self::Tiff];

    /// File extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => ".png",
            Self::Exr => ".exr",
            Self::Tga => ".tga",
            Self::Tiff => ".tiff",
        }
    }

    /// Whether `depth` can be encoded into this container.
    pub fn accepts(self, depth: BitDepth) -> bool {
        BitDepth::preferred_for(self).is_none_or(|required| required == depth)
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "PNG",
            Self::Exr => "EXR",
            Self::Tga => "TGA",
            Self::Tiff => "TIFF",
        })
    }
}

/// Where the baked pixels go.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Versioned texture-asset record in an asset store.
    Asset,
    /// Encoded image file written through a byte sink.
    EncodedFile(ImageFormat),
}

impl fmt::Display for OutputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asset => f.write_str("asset"),
            Self::EncodedFile(format) => write!(f, "{format} file"),
        }
    }
}

/// Runtime compression requested for a texture asset. Passed through untouched.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompressionHint {
    /// Engine default color compression.
    #[default]
    Default,
    /// Tangent-space normal map.
    Normalmap,
    /// Single channel grayscale.
    Grayscale,
    /// High dynamic range.
    Hdr,
    /// Packed data masks.
    Masks,
    /// Alpha only.
    Alpha,
}

impl CompressionHint {
    /// Every hint, in menu order.
    pub const ALL: [Self; 6] = [
        Self::Default,
        Self::Normalmap,
        Self::Grayscale,
        Self::Hdr,
        Self::Masks,
        Self::Alpha,
    ];
}

/// States of the per-call bake state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum BakePhase {
    /// Nothing started yet.
    Idle,
    /// Checking the config.
    Validating,
    /// Transient surface allocated.
    SurfaceAcquired,
    /// Renderer drawing, waiting on its completion barrier.
    Rendering,
    /// Pulling pixels off the surface.
    ReadingBack,
    /// Encoding + writing, or writing the asset record.
    Persisting,
    /// Terminal success.
    Done,
    /// Terminal failure.
    Failed,
}

impl BakePhase {
    /// Whether no further transition is possible.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Failed)
    }
}

impl fmt::Display for BakePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Idle => "idle",
            Self::Validating => "validating",
            Self::SurfaceAcquired => "surface setup",
            Self::Rendering => "rendering",
            Self::ReadingBack => "readback",
            Self::Persisting => "saving",
            Self::Done => "done",
            Self::Failed => "failed",
        })
    }
}

/// Derive a texture name from a material name: `M_Rock` and `MI_Rock` become `T_Rock`,
/// anything else gets a `T_` prefix.
pub fn texture_name_for_source(source_name: &str) -> String {
    let stem = source_name
        .strip_prefix("M_")
        .or_else(|| source_name.strip_prefix("MI_"))
        .unwrap_or(source_name);
    format!("T_{stem}")
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
