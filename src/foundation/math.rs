//! Scalar shader math shared by the procedural widgets.
//!
//! These are faithful ports of the GLSL building blocks the widget shaders
//! lean on (`fract`/`mix`/`smoothstep`, sine-dot hashes, 2-D simplex noise),
//! kept in f32 to match shader precision.

/// GLSL `fract`.
pub fn fract(x: f32) -> f32 {
    x - x.floor()
}

/// GLSL `mix` (linear interpolation, unclamped t).
pub fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// GLSL `clamp(x, 0, 1)`.
pub fn clamp01(x: f32) -> f32 {
    x.clamp(0.0, 1.0)
}

/// GLSL `smoothstep`.
pub fn smoothstep(edge0: f32, edge1: f32, x: f32) -> f32 {
    if edge0 == edge1 {
        return if x < edge0 { 0.0 } else { 1.0 };
    }
    let t = clamp01((x - edge0) / (edge1 - edge0));
    t * t * (3.0 - 2.0 * t)
}

/// GLSL `step`.
pub fn step(edge: f32, x: f32) -> f32 {
    if x < edge { 0.0 } else { 1.0 }
}

/// Rotate `(x, y)` by `angle` radians (column-major `mat2(c,-s,s,c)` apply).
pub fn rotate2(x: f32, y: f32, angle: f32) -> (f32, f32) {
    let (s, c) = angle.sin_cos();
    (c * x - s * y, s * x + c * y)
}

/// Sine-dot screen hash, the `noise` from the light-rays shader.
pub fn hash12(x: f32, y: f32) -> f32 {
    fract((x * 12.9898 + y * 78.233).sin() * 43758.5453123)
}

fn mod289(x: f32) -> f32 {
    x - (x * (1.0 / 289.0)).floor() * 289.0
}

fn permute(x: f32) -> f32 {
    mod289(((x * 34.0) + 1.0) * x)
}

/// 2-D simplex noise, the classic mod-289 permutation port used by the
/// metallic-paint shader. Output is roughly in [-1, 1].
pub fn snoise(vx: f32, vy: f32) -> f32 {
    const C_X: f32 = 0.211324865405187;
    const C_Y: f32 = 0.366025403784439;
    const C_Z: f32 = -0.577350269189626;
    const C_W: f32 = 0.024390243902439;

    let s = (vx + vy) * C_Y;
    let mut ix = (vx + s).floor();
    let mut iy = (vy + s).floor();
    let t = (ix + iy) * C_X;
    let x0x = vx - ix + t;
    let x0y = vy - iy + t;

    let (i1x, i1y) = if x0x > x0y { (1.0, 0.0) } else { (0.0, 1.0) };

    let x1x = x0x + C_X - i1x;
    let x1y = x0y + C_X - i1y;
    let x2x = x0x + C_Z;
    let x2y = x0y + C_Z;

    ix = mod289(ix);
    iy = mod289(iy);

    let p0 = permute(permute(iy) + ix);
    let p1 = permute(permute(iy + i1y) + ix + i1x);
    let p2 = permute(permute(iy + 1.0) + ix + 1.0);

    let mut m0 = (0.5 - (x0x * x0x + x0y * x0y)).max(0.0);
    let mut m1 = (0.5 - (x1x * x1x + x1y * x1y)).max(0.0);
    let mut m2 = (0.5 - (x2x * x2x + x2y * x2y)).max(0.0);
    m0 = m0 * m0 * m0 * m0;
    m1 = m1 * m1 * m1 * m1;
    m2 = m2 * m2 * m2 * m2;

    let grad = |p: f32, xx: f32, xy: f32, m: &mut f32| -> f32 {
        let x = 2.0 * fract(p * C_W) - 1.0;
        let h = x.abs() - 0.5;
        let ox = (x + 0.5).floor();
        let a0 = x - ox;
        *m *= 1.79284291400159 - 0.85373472095314 * (a0 * a0 + h * h);
        a0 * xx + h * xy
    };

    let g0 = grad(p0, x0x, x0y, &mut m0);
    let g1 = grad(p1, x1x, x1y, &mut m1);
    let g2 = grad(p2, x2x, x2y, &mut m2);

    130.0 * (m0 * g0 + m1 * g1 + m2 * g2)
}

/// SplitMix64, the deterministic RNG behind randomized widgets.
///
/// Widgets take an explicit seed so frame sequences are reproducible.
#[derive(Clone, Copy, Debug)]
pub struct SplitMix64(u64);

impl SplitMix64 {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next_u64(&mut self) -> u64 {
        self.0 = self.0.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.0;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// Uniform f64 in [0, 1).
    pub fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform index in `[0, n)`. `n` must be non-zero.
    pub fn next_index(&mut self, n: usize) -> usize {
        debug_assert!(n > 0);
        (self.next_f64() * n as f64) as usize % n
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fract_and_step_basics() {
        assert_eq!(fract(1.25), 0.25);
        assert_eq!(step(0.5, 0.4), 0.0);
        assert_eq!(step(0.5, 0.6), 1.0);
    }

    #[test]
    fn smoothstep_endpoints_and_midpoint() {
        assert_eq!(smoothstep(0.0, 1.0, -1.0), 0.0);
        assert_eq!(smoothstep(0.0, 1.0, 2.0), 1.0);
        assert!((smoothstep(0.0, 1.0, 0.5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn hashes_land_in_unit_interval() {
        for i in 0..100 {
            let x = i as f32 * 0.73;
            let y = i as f32 * 1.91;
            let a = hash12(x, y);
            assert!((0.0..1.0).contains(&a), "hash12({x},{y}) = {a}");
        }
    }

    #[test]
    fn snoise_is_bounded_and_varies() {
        let mut min = f32::MAX;
        let mut max = f32::MIN;
        for i in 0..50 {
            for j in 0..50 {
                let v = snoise(i as f32 * 0.17, j as f32 * 0.23);
                assert!(v.is_finite());
                assert!((-1.5..=1.5).contains(&v), "snoise out of range: {v}");
                min = min.min(v);
                max = max.max(v);
            }
        }
        assert!(max - min > 0.5, "noise field is suspiciously flat");
    }

    #[test]
    fn splitmix_is_deterministic_per_seed() {
        let mut a = SplitMix64::new(7);
        let mut b = SplitMix64::new(7);
        for _ in 0..16 {
            assert_eq!(a.next_u64(), b.next_u64());
        }
        let mut c = SplitMix64::new(8);
        assert_ne!(SplitMix64::new(7).next_u64(), c.next_u64());
    }

    #[test]
    fn next_index_stays_in_bounds() {
        let mut rng = SplitMix64::new(42);
        for _ in 0..200 {
            assert!(rng.next_index(13) < 13);
        }
    }

    #[test]
    fn rotate2_quarter_turn() {
        let (x, y) = rotate2(1.0, 0.0, std::f32::consts::FRAC_PI_2);
        assert!(x.abs() < 1e-6);
        assert!((y - 1.0).abs() < 1e-6);
    }
}
