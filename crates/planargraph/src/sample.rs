//! Seeded random inputs for the arrangement: segment soups and star-shaped polygons.
//!
//! Model
//! - Segment soups: endpoints uniform in `[-extent, extent]²`, optionally
//!   capped in length.
//! - Star polygons: `n` equally spaced angles with bounded angular and radial
//!   jitter. Sorted angles and positive radii keep the loop simple.
//! - Determinism uses a replay token `(seed, index)` mixed into a single RNG,
//!   so draw `index` of a run can be regenerated on its own.

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Replay token to make draws reproducible and indexable.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ReplayToken {
    pub seed: u64,
    pub index: u64,
}

impl ReplayToken {
    pub fn new(seed: u64, index: u64) -> Self {
        Self { seed, index }
    }

    #[inline]
    pub fn to_std_rng(self) -> StdRng {
        // SplitMix64 finaliser
        fn mix(mut x: u64) -> u64 {
            x ^= x >> 30;
            x = x.wrapping_mul(0xbf58476d1ce4e5b9);
            x ^= x >> 27;
            x = x.wrapping_mul(0x94d049bb133111eb);
            x ^ (x >> 31)
        }
        let k = mix(self.seed ^ mix(self.index.wrapping_add(0x9e3779b97f4a7c15)));
        StdRng::seed_from_u64(k)
    }
}

/// Vertex count distribution.
#[derive(Clone, Copy, Debug)]
pub enum VertexCount {
    Fixed(usize),
    Uniform { min: usize, max: usize },
}

impl VertexCount {
    fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        match *self {
            VertexCount::Fixed(n) => n.max(3),
            VertexCount::Uniform { min, max } => {
                let lo = min.max(3);
                let hi = max.max(lo);
                rng.gen_range(lo..=hi)
            }
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub struct SoupCfg {
    pub segments: usize,
    /// Endpoints are drawn from `[-extent, extent]²`.
    pub extent: f64,
    /// When set, the second endpoint lies within this distance of the first.
    pub max_len: Option<f64>,
}

impl Default for SoupCfg {
    fn default() -> Self {
        Self {
            segments: 32,
            extent: 1.0,
            max_len: None,
        }
    }
}

/// Draw `cfg.segments` random segments.
pub fn draw_segment_soup(cfg: SoupCfg, tok: ReplayToken) -> Vec<(Vector2<f64>, Vector2<f64>)> {
    let mut rng = tok.to_std_rng();
    let r = cfg.extent.abs().max(1e-9);
    let point = |rng: &mut StdRng| Vector2::new(rng.gen_range(-r..=r), rng.gen_range(-r..=r));
    (0..cfg.segments)
        .map(|_| {
            let a = point(&mut rng);
            let b = match cfg.max_len {
                Some(l) if l > 0.0 => {
                    let th = rng.gen::<f64>() * std::f64::consts::TAU;
                    let len = rng.gen::<f64>() * l;
                    a + Vector2::new(th.cos(), th.sin()) * len
                }
                _ => point(&mut rng),
            };
            (a, b)
        })
        .collect()
}

/// Radial-jitter star polygon configuration.
#[derive(Clone, Copy, Debug)]
pub struct RadialCfg {
    pub vertex_count: VertexCount,
    /// Angular jitter as a fraction of the base spacing Δ=2π/n. Clamped to [0, 0.49].
    pub angle_jitter_frac: f64,
    /// Radii are `base_radius * (1 + u)` with `u ∈ [-radial_jitter, radial_jitter]`.
    pub radial_jitter: f64,
    pub base_radius: f64,
    pub centre: Vector2<f64>,
    pub random_phase: bool,
}

impl Default for RadialCfg {
    fn default() -> Self {
        Self {
            vertex_count: VertexCount::Fixed(12),
            angle_jitter_frac: 0.3,
            radial_jitter: 0.25,
            base_radius: 1.0,
            centre: Vector2::zeros(),
            random_phase: true,
        }
    }
}

/// Counter-clockwise simple polygon, star-shaped around `cfg.centre`.
pub fn draw_star_polygon(cfg: RadialCfg, tok: ReplayToken) -> Vec<Vector2<f64>> {
    let mut rng = tok.to_std_rng();
    let n = cfg.vertex_count.sample(&mut rng);
    let aj = cfg.angle_jitter_frac.clamp(0.0, 0.49);
    let rj = cfg.radial_jitter.clamp(0.0, 0.95);
    let r0 = cfg.base_radius.max(1e-9);
    let delta = std::f64::consts::TAU / (n as f64);
    let phase = if cfg.random_phase {
        rng.gen::<f64>() * std::f64::consts::TAU
    } else {
        0.0
    };
    (0..n)
        .map(|k| {
            let th = phase + (k as f64) * delta + (rng.gen::<f64>() * 2.0 - 1.0) * aj * delta;
            let u = (rng.gen::<f64>() * 2.0 - 1.0) * rj;
            let r = (1.0 + u) * r0;
            cfg.centre + Vector2::new(th.cos() * r, th.sin() * r)
        })
        .collect()
}
