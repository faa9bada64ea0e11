//! texbake renders a material into a square off-screen surface and persists the result, either
//! as an encoded image file or as a versioned texture asset record.
//!
//! # Pipeline overview
//!
//! 1. **Validate**: [`BakeConfig::validate`] rejects unusable requests before anything is touched.
//! 2. **Render**: a pooled [`RenderSurface`] is cleared to opaque black and a
//!    [`SurfaceRenderer`] draws the source over the full quad, then waits for completion.
//! 3. **Read back**: [`read_pixels`] copies the synchronized surface into a [`PixelBuffer`]
//!    (BGRA8 or linear RGBA16F, no transfer curve either way).
//! 4. **Persist**: [`encode`] + [`ByteSink`] for image files, or [`write_asset`] into an
//!    [`AssetStore`] for texture assets.
//!
//! [`Baker::execute_bake`] drives all four steps as one state machine per call.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Scoped surfaces**: every surface goes back to its pool exactly once, on every path.
//! - **All-or-nothing persistence**: encoded files are written through a temp file and a rename,
//!   asset records are installed with one commit.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod asset;
mod bake;
mod encode;
mod foundation;
mod render;
mod shading;

pub use asset::fs_store::FsAssetStore;
pub use asset::path::{AssetId, AssetPath, DEFAULT_CANONICAL_ROOT, normalize_package_path};
pub use asset::record::{
    MipPolicy, RecordHeader, SourceFormat, TEXASSET_EXTENSION, TEXASSET_MAGIC, TEXASSET_VERSION,
    TextureAssetRecord, read_record_file, read_record_header,
};
pub use asset::store::{AssetStore, ExistingRecord, MemoryAssetStore, RegistryEvent};
pub use asset::writer::{AssetWriteReport, RecordChange, write_asset};
pub use bake::config::BakeConfig;
pub use bake::orchestrator::{BakeOutput, Baker, CLEAR_COLOR};
pub use bake::preferences::{BakePreferences, DEFAULT_DESTINATION_PATH};
pub use bake::progress::{BakeProgress, CancelToken, NoProgress};
pub use encode::codec::{EncodedImage, encode};
pub use encode::sink::{
    ByteSink, FsByteSink, InMemoryByteSink, encoded_file_path, ensure_parent_dir,
};
pub use foundation::core::{
    BakePhase, BitDepth, CompressionHint, DEFAULT_RESOLUTION, ImageFormat, MAX_RESOLUTION,
    OutputKind, RESOLUTION_PRESETS, texture_name_for_source,
};
pub use foundation::error::{BakeError, BakeResult, InvalidConfigReason};
pub use render::cpu::CpuShaderRenderer;
pub use render::pixels::{PixelBuffer, PixelData};
pub use render::pool::{SurfaceLease, SurfacePool, SurfacePoolOpts, SurfacePoolStats};
pub use render::readback::read_pixels;
pub use render::renderer::{SurfaceRenderer, SurfaceSource};
pub use render::surface::{RenderSurface, SurfaceDesc, SurfaceFormat, SurfaceId, SurfaceState};
pub use shading::graph::{Material, ShaderNode};
