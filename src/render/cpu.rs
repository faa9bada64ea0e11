use std::thread::JoinHandle;

use half::f16;
use rayon::prelude::*;

use crate::foundation::core::BitDepth;
use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::quantize_unorm8;
use crate::render::pixels::PixelData;
use crate::render::renderer::SurfaceRenderer;
use crate::render::surface::{RenderSurface, SurfaceId};
use crate::shading::graph::{Material, ShaderNode};

struct PendingDraw {
    surface: SurfaceId,
    worker: JoinHandle<PixelData>,
}

/// CPU renderer for [`Material`] graphs.
///
/// `draw` hands the evaluation to a worker thread, which shades rows in parallel on the rayon
/// pool. The texels only land in the surface when `wait_idle` joins that worker.
#[derive(Default)]
pub struct CpuShaderRenderer {
    pending: Option<PendingDraw>,
    draws: u64,
}

impl std::fmt::Debug for CpuShaderRenderer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuShaderRenderer")
            .field("pending", &self.pending.as_ref().map(|p| p.surface))
            .field("draws", &self.draws)
            .finish()
    }
}

impl CpuShaderRenderer {
    /// Create an idle renderer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of draws submitted so far.
    pub fn draw_count(&self) -> u64 {
        self.draws
    }

    /// Whether a submitted draw has not been waited on yet.
    pub fn has_pending_work(&self) -> bool {
        self.pending.is_some()
    }
}

impl SurfaceRenderer for CpuShaderRenderer {
    type Source = Material;

    fn draw(&mut self, source: &Material, target: &mut RenderSurface) -> BakeResult<()> {
        if self.pending.is_some() {
            return Err(BakeError::render("previous draw has not been waited on"));
        }

        let graph = source.graph.clone();
        let resolution = target.resolution();
        let depth = target.bit_depth();
        let worker = std::thread::Builder::new()
            .name("texbake-shade".to_string())
            .spawn(move || shade(&graph, resolution, depth))
            .map_err(|e| BakeError::render(format!("spawn render worker: {e}")))?;

        tracing::debug!(
            material = %source.name,
            surface = target.id().as_u64(),
            "draw submitted"
        );
        self.pending = Some(PendingDraw {
            surface: target.id(),
            worker,
        });
        self.draws = self.draws.saturating_add(1);
        Ok(())
    }

    fn wait_idle(&mut self, target: &mut RenderSurface) -> BakeResult<()> {
        let Some(pending) = self.pending.take() else {
            return Ok(());
        };
        let data = pending
            .worker
            .join()
            .map_err(|_| BakeError::render("render worker panicked"))?;
        if pending.surface != target.id() {
            return Err(BakeError::render(format!(
                "pending draw targets surface {}, waited on {}",
                pending.surface.as_u64(),
                target.id().as_u64()
            )));
        }
        target.replace_data(data)
    }
}

/// Shade the full quad at pixel centers. `Int8` clamps and rounds into BGRA, `Float16` keeps
/// the unclamped linear values.
pub(crate) fn shade(graph: &ShaderNode, resolution: u32, depth: BitDepth) -> PixelData {
    let side = resolution as usize;
    let inv = 1.0 / resolution.max(1) as f32;
    let uv = |x: usize, y: usize| ((x as f32 + 0.5) * inv, (y as f32 + 0.5) * inv);

    match depth {
        BitDepth::Int8 => {
            let mut out = vec![0u8; side * side * 4];
            out.par_chunks_mut((side * 4).max(4))
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, px) in row.chunks_exact_mut(4).enumerate() {
                        let (u, v) = uv(x, y);
                        let c = graph.eval(u, v);
                        px.copy_from_slice(&[
                            quantize_unorm8(c[2]),
                            quantize_unorm8(c[1]),
                            quantize_unorm8(c[0]),
                            quantize_unorm8(c[3]),
                        ]);
                    }
                });
            PixelData::Bgra8(out)
        }
        BitDepth::Float16 => {
            let mut out = vec![f16::ZERO; side * side * 4];
            out.par_chunks_mut((side * 4).max(4))
                .enumerate()
                .for_each(|(y, row)| {
                    for (x, px) in row.chunks_exact_mut(4).enumerate() {
                        let (u, v) = uv(x, y);
                        px.copy_from_slice(&graph.eval(u, v).map(f16::from_f32));
                    }
                });
            PixelData::Rgba16F(out)
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
