use std::path::PathBuf;

use crate::asset::store::AssetStore;
use crate::asset::writer::{AssetWriteReport, RecordChange, write_asset};
use crate::bake::config::BakeConfig;
use crate::bake::progress::BakeProgress;
use crate::encode::codec::encode;
use crate::encode::sink::ByteSink;
use crate::foundation::core::{BakePhase, ImageFormat, OutputKind};
use crate::foundation::error::{BakeError, BakeResult, InvalidConfigReason};
use crate::render::pool::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};
use crate::render::readback::read_pixels;
use crate::render::renderer::{SurfaceRenderer, SurfaceSource};
use crate::render::surface::SurfaceDesc;

/// Color every surface is cleared to before the draw.
pub const CLEAR_COLOR: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

/// Where a successful bake put its pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BakeOutput {
    /// Encoded image file.
    File {
        /// File written.
        path: PathBuf,
        /// Container format.
        format: ImageFormat,
        /// Encoded size.
        byte_len: usize,
    },
    /// Texture asset record.
    Asset(AssetWriteReport),
}

impl BakeOutput {
    /// Success message for the person who requested the bake.
    pub fn message(&self) -> String {
        match self {
            Self::File { path, .. } => format!("Texture saved to '{}'.", path.display()),
            Self::Asset(report) => match report.change {
                RecordChange::Created => {
                    format!("Texture asset created at '{}'.", report.path)
                }
                RecordChange::Updated => format!(
                    "Texture asset '{}' updated (revision {}).",
                    report.path, report.revision
                ),
            },
        }
    }
}

struct PhaseTracker<'p> {
    progress: &'p mut dyn BakeProgress,
    current: BakePhase,
}

impl<'p> PhaseTracker<'p> {
    fn new(progress: &'p mut dyn BakeProgress) -> Self {
        Self {
            progress,
            current: BakePhase::Idle,
        }
    }

    fn enter(&mut self, phase: BakePhase) -> BakeResult<()> {
        if self.progress.is_cancelled() {
            return Err(BakeError::Cancelled { phase });
        }
        debug_assert!(phase > self.current, "{} -> {phase}", self.current);
        self.transition(phase);
        Ok(())
    }

    fn finish(&mut self, phase: BakePhase) {
        debug_assert!(phase.is_terminal());
        self.transition(phase);
    }

    fn transition(&mut self, phase: BakePhase) {
        tracing::debug!(from = %self.current, to = %phase, "bake transition");
        self.current = phase;
        self.progress.enter_phase(phase);
    }
}

/// Bake orchestrator: validates, renders into a pooled surface, reads back and persists.
///
/// Each [`Self::execute_bake`] call is an independent state machine
/// `Idle -> Validating -> SurfaceAcquired -> Rendering -> ReadingBack -> Persisting -> Done`,
/// with any failure or cancellation ending in `Failed`. The surface is leased for the render and
/// readback phases only and goes back to the pool before anything is persisted.
pub struct Baker<R, A, W> {
    renderer: R,
    store: A,
    sink: W,
    pool: SurfacePool,
}

impl<R, A, W> Baker<R, A, W>
where
    R: SurfaceRenderer,
    A: AssetStore,
    W: ByteSink,
{
    /// Orchestrator with a default surface pool.
    pub fn new(renderer: R, store: A, sink: W) -> Self {
        Self::with_pool_opts(renderer, store, sink, SurfacePoolOpts::default())
    }

    /// Orchestrator with custom surface pool limits.
    pub fn with_pool_opts(renderer: R, store: A, sink: W, opts: SurfacePoolOpts) -> Self {
        Self {
            renderer,
            store,
            sink,
            pool: SurfacePool::new(opts),
        }
    }

    /// Renderer collaborator.
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Asset store collaborator.
    pub fn store(&self) -> &A {
        &self.store
    }

    /// Mutable access to the asset store.
    pub fn store_mut(&mut self) -> &mut A {
        &mut self.store
    }

    /// Byte sink collaborator.
    pub fn sink(&self) -> &W {
        &self.sink
    }

    /// Surface pool counters.
    pub fn surface_stats(&self) -> SurfacePoolStats {
        self.pool.stats()
    }

    /// Take back the collaborators.
    pub fn into_parts(self) -> (R, A, W) {
        (self.renderer, self.store, self.sink)
    }

    /// Run one bake.
    ///
    /// Validation happens before any resource is touched, so an invalid config never reaches
    /// the renderer, the store or the sink. `progress` sees every phase transition, including
    /// the terminal `Done` or `Failed`, and is polled for cancellation at each boundary.
    #[tracing::instrument(
        skip_all,
        fields(
            source = config.source.map(|s| s.source_name()).unwrap_or(""),
            name = %config.destination_name,
            output = %config.output,
            resolution = config.resolution,
        )
    )]
    pub fn execute_bake(
        &mut self,
        config: &BakeConfig<'_, R::Source>,
        progress: &mut dyn BakeProgress,
    ) -> BakeResult<BakeOutput> {
        let mut tracker = PhaseTracker::new(progress);
        let result = self.run(config, &mut tracker);
        match &result {
            Ok(output) => {
                tracker.finish(BakePhase::Done);
                tracing::info!(message = %output.message(), "bake finished");
            }
            Err(err) => {
                tracker.finish(BakePhase::Failed);
                tracing::warn!(phase = %err.phase(), error = %err, "bake failed");
            }
        }
        result
    }

    fn run(
        &mut self,
        config: &BakeConfig<'_, R::Source>,
        tracker: &mut PhaseTracker<'_>,
    ) -> BakeResult<BakeOutput> {
        tracker.enter(BakePhase::Validating)?;
        config.validate()?;
        let source = config
            .source
            .ok_or_else(|| BakeError::invalid(InvalidConfigReason::NoSource))?;

        let Self {
            renderer,
            store,
            sink,
            pool,
        } = self;

        tracker.enter(BakePhase::SurfaceAcquired)?;
        let buffer = {
            let mut surface = pool.acquire(SurfaceDesc::new(config.resolution, config.bit_depth))?;
            surface.clear(CLEAR_COLOR);

            tracker.enter(BakePhase::Rendering)?;
            surface.begin_frame();
            renderer.draw(source, &mut surface)?;
            renderer.wait_idle(&mut surface)?;
            surface.end_frame();

            tracker.enter(BakePhase::ReadingBack)?;
            read_pixels(&surface, config.resolution, config.bit_depth)?
        };

        tracker.enter(BakePhase::Persisting)?;
        match config.output {
            OutputKind::EncodedFile(format) => {
                let encoded = encode(buffer, format)?;
                let path = config.file_path(format);
                sink.write(&path, encoded.bytes())?;
                Ok(BakeOutput::File {
                    path,
                    format,
                    byte_len: encoded.len(),
                })
            }
            OutputKind::Asset => Ok(BakeOutput::Asset(write_asset(store, buffer, config)?)),
        }
    }
}

impl<R, A, W> std::fmt::Debug for Baker<R, A, W> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Baker")
            .field("pool", &self.pool.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/bake/orchestrator.rs"]
mod tests;
