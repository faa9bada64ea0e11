use std::collections::HashMap;
use std::ops::{Deref, DerefMut};

use half::f16;

use crate::foundation::core::{BitDepth, MAX_RESOLUTION};
use crate::foundation::error::{BakeError, BakeResult};
use crate::render::pixels::PixelData;
use crate::render::surface::{RenderSurface, SurfaceDesc, SurfaceId};

/// Pool configuration for transient surfaces.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoolOpts {
    /// Largest single surface the pool will allocate, in bytes.
    pub max_surface_bytes: usize,
    /// Maximum bytes kept for reuse after release.
    pub max_retained_bytes: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_surface_bytes: (MAX_RESOLUTION as usize)
                .saturating_mul(MAX_RESOLUTION as usize)
                .saturating_mul(8),
            max_retained_bytes: 256 * 1024 * 1024,
        }
    }
}

/// Counters describing pool activity.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Surfaces handed out over the pool's lifetime.
    pub acquired: u64,
    /// Surfaces returned over the pool's lifetime.
    pub released: u64,
    /// Surfaces currently leased (pinned) by an in-flight bake.
    pub live: usize,
    /// Fresh allocations, i.e. acquisitions not served from retained storage.
    pub allocated: u64,
    /// Released storages kept for reuse.
    pub retained_surfaces: usize,
    /// Bytes held by retained storages.
    pub retained_bytes: usize,
}

/// Bounded allocator for transient bake surfaces.
///
/// Every surface leaves the pool inside a [`SurfaceLease`] and comes back exactly once, when the
/// lease is dropped. Released storage is kept for reuse up to `max_retained_bytes`.
#[derive(Debug)]
pub struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,
    next_id: u64,
    retained: HashMap<SurfaceDesc, Vec<PixelData>>,
}

impl Default for SurfacePool {
    fn default() -> Self {
        Self::new(SurfacePoolOpts::default())
    }
}

impl SurfacePool {
    /// Create an empty pool.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            next_id: 0,
            retained: HashMap::new(),
        }
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    /// Lease a surface matching `desc`, allocating if nothing suitable is retained.
    pub fn acquire(&mut self, desc: SurfaceDesc) -> BakeResult<SurfaceLease<'_>> {
        if desc.resolution == 0 {
            return Err(BakeError::surface_create("surface resolution must be positive"));
        }
        if desc.resolution > MAX_RESOLUTION {
            return Err(BakeError::surface_create(format!(
                "surface resolution {} exceeds maximum {MAX_RESOLUTION}",
                desc.resolution
            )));
        }
        let bytes = desc
            .byte_len()
            .ok_or_else(|| BakeError::surface_create("surface size overflows"))?;
        if bytes > self.opts.max_surface_bytes {
            return Err(BakeError::surface_create(format!(
                "surface needs {bytes} bytes, budget is {}",
                self.opts.max_surface_bytes
            )));
        }

        let data = match self.take_retained(desc, bytes) {
            Some(data) => data,
            None => {
                let data = allocate(desc)?;
                self.stats.allocated = self.stats.allocated.saturating_add(1);
                data
            }
        };

        let id = SurfaceId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.stats.acquired = self.stats.acquired.saturating_add(1);
        self.stats.live = self.stats.live.saturating_add(1);
        tracing::debug!(surface = id.as_u64(), resolution = desc.resolution, "surface acquired");

        Ok(SurfaceLease {
            surface: RenderSurface::new(id, desc, data),
            pool: self,
        })
    }

    fn take_retained(&mut self, desc: SurfaceDesc, bytes: usize) -> Option<PixelData> {
        let data = self.retained.get_mut(&desc)?.pop()?;
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(bytes);
        Some(data)
    }

    fn release(&mut self, surface: RenderSurface) {
        let desc = surface.desc();
        tracing::debug!(surface = surface.id().as_u64(), "surface released");
        self.stats.released = self.stats.released.saturating_add(1);
        self.stats.live = self.stats.live.saturating_sub(1);

        let Some(bytes) = desc.byte_len() else {
            return;
        };
        if self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_retained_bytes {
            return;
        }
        self.retained
            .entry(desc)
            .or_default()
            .push(surface.into_data());
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

fn allocate(desc: SurfaceDesc) -> BakeResult<PixelData> {
    let samples = desc
        .pixel_count()
        .and_then(|px| px.checked_mul(4))
        .ok_or_else(|| BakeError::surface_create("surface size overflows"))?;
    match desc.format.bit_depth() {
        BitDepth::Int8 => {
            let mut v = Vec::new();
            v.try_reserve_exact(samples)
                .map_err(|e| BakeError::surface_create(format!("allocate surface: {e}")))?;
            v.resize(samples, 0u8);
            Ok(PixelData::Bgra8(v))
        }
        BitDepth::Float16 => {
            let mut v = Vec::new();
            v.try_reserve_exact(samples)
                .map_err(|e| BakeError::surface_create(format!("allocate surface: {e}")))?;
            v.resize(samples, f16::ZERO);
            Ok(PixelData::Rgba16F(v))
        }
    }
}

/// Scoped ownership of a pooled surface.
///
/// The surface stays pinned while the lease lives and is handed back to the pool exactly once
/// when the lease is dropped, whichever way the owning scope exits.
#[derive(Debug)]
pub struct SurfaceLease<'p> {
    pool: &'p mut SurfacePool,
    surface: RenderSurface,
}

impl Deref for SurfaceLease<'_> {
    type Target = RenderSurface;

    fn deref(&self) -> &RenderSurface {
        &self.surface
    }
}

impl DerefMut for SurfaceLease<'_> {
    fn deref_mut(&mut self) -> &mut RenderSurface {
        &mut self.surface
    }
}

impl Drop for SurfaceLease<'_> {
    fn drop(&mut self) {
        let surface = std::mem::replace(&mut self.surface, RenderSurface::detached());
        self.pool.release(surface);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/pool.rs"]
mod tests;
