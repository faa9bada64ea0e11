use std::fmt;
use std::path::PathBuf;

use crate::foundation::core::{BakePhase, ImageFormat};

/// Convenience result type used across texbake.
pub type BakeResult<T> = Result<T, BakeError>;

/// Why a [`crate::BakeConfig`] was rejected before any side effect happened.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum InvalidConfigReason {
    /// No surface source was selected.
    NoSource,
    /// The destination name is empty.
    EmptyName,
    /// Resolution, bit depth, or destination settings are unusable.
    InvalidSettings(String),
}

impl fmt::Display for InvalidConfigReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoSource => f.write_str("no surface source selected"),
            Self::EmptyName => f.write_str("destination name is empty"),
            Self::InvalidSettings(msg) => write!(f, "invalid settings: {msg}"),
        }
    }
}

/// Top-level error taxonomy of the bake pipeline.
///
/// Every variant belongs to exactly one [`BakePhase`] (see [`BakeError::phase`]) and maps to one
/// specific, human-readable message (see [`BakeError::user_message`]).
#[derive(thiserror::Error, Debug)]
pub enum BakeError {
    /// Pre-flight validation failed; nothing was touched.
    #[error("invalid config: {0}")]
    InvalidConfig(InvalidConfigReason),

    /// The transient render surface could not be allocated.
    #[error("surface create failed: {0}")]
    SurfaceCreateFailed(String),

    /// The renderer collaborator failed to draw or synchronize.
    #[error("render failed: {0}")]
    RenderFailed(String),

    /// Pixels could not be pulled from the surface.
    #[error("readback failed: {0}")]
    ReadbackFailed(String),

    /// The codec rejected the buffer or produced no output.
    #[error("encode failed ({format}): {reason}")]
    EncodeFailed {
        /// Target container format.
        format: ImageFormat,
        /// Codec-level detail.
        reason: String,
    },

    /// The output directory tree could not be created.
    #[error("directory create failed '{}': {reason}", .path.display())]
    DirectoryCreateFailed {
        /// Directory that could not be created.
        path: PathBuf,
        /// IO-level detail.
        reason: String,
    },

    /// The asset record was mutated in memory but could not be flushed.
    #[error("persist failed '{identifier}': {reason}")]
    PersistFailed {
        /// Full record identifier, e.g. `/Game/Textures/T_Rock`.
        identifier: String,
        /// IO-level detail.
        reason: String,
    },

    /// The byte sink could not write the encoded file.
    #[error("write failed '{}': {reason}", .path.display())]
    WriteFailed {
        /// Destination file.
        path: PathBuf,
        /// IO-level detail.
        reason: String,
    },

    /// Cancellation was requested at a phase boundary.
    #[error("bake cancelled during {phase}")]
    Cancelled {
        /// Phase that was about to start.
        phase: BakePhase,
    },

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BakeError {
    /// Build a [`BakeError::InvalidConfig`] value.
    pub fn invalid(reason: InvalidConfigReason) -> Self {
        Self::InvalidConfig(reason)
    }

    /// Build a [`BakeError::InvalidConfig`] carrying [`InvalidConfigReason::InvalidSettings`].
    pub fn invalid_settings(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(InvalidConfigReason::InvalidSettings(msg.into()))
    }

    /// Build a [`BakeError::SurfaceCreateFailed`] value.
    pub fn surface_create(msg: impl Into<String>) -> Self {
        Self::SurfaceCreateFailed(msg.into())
    }

    /// Build a [`BakeError::RenderFailed`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::RenderFailed(msg.into())
    }

    /// Build a [`BakeError::ReadbackFailed`] value.
    pub fn readback(msg: impl Into<String>) -> Self {
        Self::ReadbackFailed(msg.into())
    }

    /// Build a [`BakeError::EncodeFailed`] value.
    pub fn encode(format: ImageFormat, reason: impl Into<String>) -> Self {
        Self::EncodeFailed {
            format,
            reason: reason.into(),
        }
    }

    /// Build a [`BakeError::DirectoryCreateFailed`] value.
    pub fn directory_create(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::DirectoryCreateFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`BakeError::PersistFailed`] value.
    pub fn persist(identifier: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::PersistFailed {
            identifier: identifier.into(),
            reason: reason.into(),
        }
    }

    /// Build a [`BakeError::WriteFailed`] value.
    pub fn write(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::WriteFailed {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Phase of the bake state machine this error terminates.
    pub fn phase(&self) -> BakePhase {
        match self {
            Self::InvalidConfig(_) => BakePhase::Validating,
            Self::SurfaceCreateFailed(_) => BakePhase::SurfaceAcquired,
            Self::RenderFailed(_) => BakePhase::Rendering,
            Self::ReadbackFailed(_) => BakePhase::ReadingBack,
            Self::EncodeFailed { .. }
            | Self::DirectoryCreateFailed { .. }
            | Self::PersistFailed { .. }
            | Self::WriteFailed { .. }
            | Self::Other(_) => BakePhase::Persisting,
            Self::Cancelled { phase } => *phase,
        }
    }

    /// Single, specific message suitable for showing to the person who requested the bake.
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidConfig(InvalidConfigReason::NoSource) => {
                "No material selected.".to_string()
            }
            Self::InvalidConfig(InvalidConfigReason::EmptyName) => {
                "Output name must not be empty.".to_string()
            }
            Self::InvalidConfig(InvalidConfigReason::InvalidSettings(msg)) => {
                format!("Invalid settings: {msg}.")
            }
            Self::SurfaceCreateFailed(_) => "Failed to create render target.".to_string(),
            Self::RenderFailed(_) => "Failed to render material.".to_string(),
            Self::ReadbackFailed(_) => "Failed to read rendered pixels.".to_string(),
            Self::EncodeFailed { format, .. } => format!("Failed to convert image to {format}."),
            Self::DirectoryCreateFailed { path, .. } => {
                format!("Failed to create output directory '{}'.", path.display())
            }
            Self::PersistFailed { identifier, .. } => {
                format!("Failed to save texture asset '{identifier}'.")
            }
            Self::WriteFailed { path, .. } => {
                format!("Failed to save file to disk: '{}'.", path.display())
            }
            Self::Cancelled { .. } => "Bake cancelled.".to_string(),
            Self::Other(err) => format!("Bake failed: {err:#}."),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
