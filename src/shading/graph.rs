use std::path::Path;

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{BakeError, BakeResult};
use crate::foundation::math::{Fnv1a64, lerp, lerp4, unit_from_hash};
use crate::render::renderer::SurfaceSource;

/// Named shading graph evaluated over the unit quad.
///
/// ```json
/// { "name": "M_Rock", "graph": { "noise": { "seed": 7, "scale": 16.0 } } }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Material name, e.g. `M_Rock`.
    pub name: String,
    /// Output node.
    pub graph: ShaderNode,
}

impl Material {
    /// Build a material from parts.
    pub fn new(name: impl Into<String>, graph: ShaderNode) -> Self {
        Self {
            name: name.into(),
            graph,
        }
    }

    /// Parse and validate a material from JSON text.
    pub fn from_json_str(json: &str) -> BakeResult<Self> {
        let material: Self = serde_json::from_str(json).context("parse material json")?;
        material.validate()?;
        Ok(material)
    }

    /// Read, parse and validate a material JSON file.
    pub fn from_path(path: &Path) -> BakeResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read material '{}'", path.display()))?;
        Self::from_json_str(&json)
    }

    /// Reject graphs whose parameters cannot be evaluated.
    pub fn validate(&self) -> BakeResult<()> {
        if self.name.trim().is_empty() {
            return Err(BakeError::invalid_settings("material name is empty"));
        }
        self.graph.validate()
    }
}

impl SurfaceSource for Material {
    fn source_name(&self) -> &str {
        &self.name
    }
}

fn default_center() -> [f32; 2] {
    [0.5, 0.5]
}

fn default_radius() -> f32 {
    0.5
}

/// One node of a shading graph. Every node outputs linear RGBA.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShaderNode {
    /// Uniform color.
    Constant {
        /// Linear RGBA.
        rgba: [f32; 4],
    },
    /// `(u, v, 0, 1)`, with `v` growing downwards.
    TexCoord,
    /// Two-stop gradient along a direction; 0° runs left to right, 90° top to bottom.
    LinearGradient {
        /// Color at the start edge.
        from: [f32; 4],
        /// Color at the end edge.
        to: [f32; 4],
        /// Direction in degrees.
        #[serde(default)]
        angle_deg: f32,
    },
    /// Two-stop gradient by distance from a center.
    RadialGradient {
        /// Color at the center.
        inner: [f32; 4],
        /// Color at and beyond `radius`.
        outer: [f32; 4],
        /// Center in UV space.
        #[serde(default = "default_center")]
        center: [f32; 2],
        /// Radius in UV units.
        #[serde(default = "default_radius")]
        radius: f32,
    },
    /// Checkerboard with `cells` squares per edge.
    Checker {
        /// Squares per edge.
        cells: u32,
        /// Color of the top-left square.
        a: [f32; 4],
        /// Alternate color.
        b: [f32; 4],
    },
    /// Deterministic grayscale value noise, opaque.
    Noise {
        /// Lattice seed.
        seed: u64,
        /// Lattice cells per edge.
        scale: f32,
    },
    /// `a + (b - a) * factor.r`.
    Mix {
        /// First input.
        a: Box<ShaderNode>,
        /// Second input.
        b: Box<ShaderNode>,
        /// Blend weight, red channel.
        factor: Box<ShaderNode>,
    },
    /// Component-wise product.
    Multiply {
        /// First input.
        a: Box<ShaderNode>,
        /// Second input.
        b: Box<ShaderNode>,
    },
    /// Component-wise sum, unclamped.
    Add {
        /// First input.
        a: Box<ShaderNode>,
        /// Second input.
        b: Box<ShaderNode>,
    },
}

impl ShaderNode {
    /// Check parameters recursively.
    pub fn validate(&self) -> BakeResult<()> {
        match self {
            Self::Constant { .. } | Self::TexCoord | Self::LinearGradient { .. } => Ok(()),
            Self::RadialGradient { radius, .. } => {
                if !(radius.is_finite() && *radius > 0.0) {
                    return Err(BakeError::invalid_settings(
                        "radial_gradient radius must be positive",
                    ));
                }
                Ok(())
            }
            Self::Checker { cells, .. } => {
                if *cells == 0 {
                    return Err(BakeError::invalid_settings("checker cells must be non-zero"));
                }
                Ok(())
            }
            Self::Noise { scale, .. } => {
                if !(scale.is_finite() && *scale > 0.0) {
                    return Err(BakeError::invalid_settings("noise scale must be positive"));
                }
                Ok(())
            }
            Self::Mix { a, b, factor } => {
                a.validate()?;
                b.validate()?;
                factor.validate()
            }
            Self::Multiply { a, b } | Self::Add { a, b } => {
                a.validate()?;
                b.validate()
            }
        }
    }

    /// Evaluate at UV coordinates `(u, v)` in `[0, 1]²`.
    pub fn eval(&self, u: f32, v: f32) -> [f32; 4] {
        match self {
            Self::Constant { rgba } => *rgba,
            Self::TexCoord => [u, v, 0.0, 1.0],
            Self::LinearGradient {
                from,
                to,
                angle_deg,
            } => {
                let (sin, cos) = angle_deg.to_radians().sin_cos();
                let half_extent = 0.5 * (cos.abs() + sin.abs());
                let along = (u - 0.5) * cos + (v - 0.5) * sin;
                let t = if half_extent > 0.0 {
                    (along / half_extent + 1.0) * 0.5
                } else {
                    0.0
                };
                lerp4(*from, *to, t.clamp(0.0, 1.0))
            }
            Self::RadialGradient {
                inner,
                outer,
                center,
                radius,
            } => {
                let du = u - center[0];
                let dv = v - center[1];
                let t = ((du * du + dv * dv).sqrt() / radius).clamp(0.0, 1.0);
                lerp4(*inner, *outer, t)
            }
            Self::Checker { cells, a, b } => {
                let n = *cells as f32;
                let cx = (u * n).floor() as i64;
                let cy = (v * n).floor() as i64;
                if (cx + cy).rem_euclid(2) == 0 { *a } else { *b }
            }
            Self::Noise { seed, scale } => {
                let n = value_noise(*seed, u * scale, v * scale);
                [n, n, n, 1.0]
            }
            Self::Mix { a, b, factor } => {
                let t = factor.eval(u, v)[0];
                lerp4(a.eval(u, v), b.eval(u, v), t)
            }
            Self::Multiply { a, b } => {
                let (x, y) = (a.eval(u, v), b.eval(u, v));
                [x[0] * y[0], x[1] * y[1], x[2] * y[2], x[3] * y[3]]
            }
            Self::Add { a, b } => {
                let (x, y) = (a.eval(u, v), b.eval(u, v));
                [x[0] + y[0], x[1] + y[1], x[2] + y[2], x[3] + y[3]]
            }
        }
    }
}

fn lattice(seed: u64, x: i64, y: i64) -> f32 {
    let mut h = Fnv1a64::new_default();
    h.write_u64(seed);
    h.write_i64(x);
    h.write_i64(y);
    unit_from_hash(h.finish())
}

fn smoothstep(t: f32) -> f32 {
    t * t * (3.0 - 2.0 * t)
}

fn value_noise(seed: u64, x: f32, y: f32) -> f32 {
    let x0 = x.floor();
    let y0 = y.floor();
    let (ix, iy) = (x0 as i64, y0 as i64);
    let tx = smoothstep(x - x0);
    let ty = smoothstep(y - y0);

    // Huge scales saturate the cast; neighbours wrap instead of overflowing.
    let (jx, jy) = (ix.wrapping_add(1), iy.wrapping_add(1));
    let top = lerp(lattice(seed, ix, iy), lattice(seed, jx, iy), tx);
    let bottom = lerp(lattice(seed, ix, jy), lattice(seed, jx, jy), tx);
    lerp(top, bottom, ty)
}

#[cfg(test)]
#[path = "../../tests/unit/shading/graph.rs"]
mod tests;
