//! Volumetric plasma field: a 60-step accumulation march with a
//! tanh tone map, recolored by luminance.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Rgb, Rgba8};
use crate::foundation::error::GlimtResult;
use crate::surface::Surface;
use crate::widget::{FrameCtx, PointerState, Widget};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlasmaDirection {
    #[default]
    Forward,
    Reverse,
    Pingpong,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PlasmaOpts {
    pub color: String,
    pub speed: f32,
    pub direction: PlasmaDirection,
    pub scale: f32,
    pub opacity: f32,
    pub mouse_interactive: bool,
}

impl Default for PlasmaOpts {
    fn default() -> Self {
        Self {
            color: "#ff6b35".to_string(),
            speed: 0.6,
            direction: PlasmaDirection::Forward,
            scale: 1.1,
            opacity: 0.8,
            mouse_interactive: true,
        }
    }
}

pub struct Plasma {
    color: Rgb,
    speed: f32,
    direction: PlasmaDirection,
    scale: f32,
    opacity: f32,
    mouse_interactive: bool,
    mouse_px: (f32, f32),
}

impl Plasma {
    pub fn new(opts: PlasmaOpts) -> GlimtResult<Self> {
        let color = Rgb::from_hex(&opts.color)?;
        Ok(Self {
            color,
            // The original passes speed pre-scaled by 0.4 into the shader.
            speed: opts.speed * 0.4,
            direction: opts.direction,
            scale: opts.scale,
            opacity: opts.opacity,
            mouse_interactive: opts.mouse_interactive,
            mouse_px: (0.0, 0.0),
        })
    }

    fn direction_multiplier(&self, time: f32) -> f32 {
        match self.direction {
            PlasmaDirection::Forward => 1.0,
            PlasmaDirection::Reverse => -1.0,
            PlasmaDirection::Pingpong => (time * 0.5).sin(),
        }
    }
}

impl Widget for Plasma {
    fn name(&self) -> &'static str {
        "plasma"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        let time = ctx.time_s as f32;
        let t_dir = time * self.speed * self.direction_multiplier(time);

        let rw = surface.width() as f32;
        let rh = surface.height() as f32;
        let cx = rw * 0.5;
        let cy = rh * 0.5;
        let (mouse_x, mouse_y) = self.mouse_px;
        let interactive = self.mouse_interactive;
        let scale = self.scale;
        let opacity = self.opacity;
        let color = self.color;

        surface.fill_with(|x, y| {
            // gl_FragCoord has y up; flip to match.
            let fx = x as f32 + 0.5;
            let fy = rh - (y as f32 + 0.5);

            let mut px = (fx - cx) / scale + cx;
            let mut py = (fy - cy) / scale + cy;
            if interactive {
                let d = ((px - cx).powi(2) + (py - cy).powi(2)).sqrt();
                px += (mouse_x - cx) * 0.0002 * d;
                py += ((rh - mouse_y) - cy) * 0.0002 * d;
            }

            let (r, g, b) = march(px, py, rw, rh, t_dir);
            let lum = (r + g + b) / 3.0;
            let alpha = (r * r + g * g + b * b).sqrt() * opacity;
            Rgba8::from_f32(lum * color.r, lum * color.g, lum * color.b, alpha)
        });
        Ok(())
    }

    fn pointer_moved(&mut self, pointer: PointerState) {
        if self.mouse_interactive {
            self.mouse_px = (pointer.px as f32, pointer.py as f32);
        }
    }
}

// The shadertoy-style loop: `for (...; ++i < 60.; O += o.w/d*o.xyz)`,
// so the accumulation uses the `o` and `d` produced by the body.
fn march(cx: f32, cy: f32, rw: f32, rh: f32, t: f32) -> (f32, f32, f32) {
    let mut z = 0.0f32;
    let mut acc = [0.0f32; 3];

    let dir = {
        let vx = cx - 0.5 * rw;
        let vy = cy - 0.5 * rh;
        let vz = rh;
        let len = (vx * vx + vy * vy + vz * vz).sqrt().max(1e-12);
        [vx / len, vy / len, vz / len]
    };

    for _ in 1..60 {
        let mut p = [z * dir[0], z * dir[1], z * dir[2] - 4.0];
        let s = p;
        let dd = p[1] - t;

        p[0] += 0.4 * (1.0 + p[1]) * (dd + p[0] * 0.1).sin() * (0.34 * dd + p[0] * 0.05).cos();

        let (qx, qz) = twist_xz(p[0], p[1], p[2], t);
        p[0] = qx;
        p[2] = qz;

        let q4 = (qx * qx * qx * qx + qz * qz * qz * qz).sqrt();
        let d = (q4.sqrt() - 0.25 * (5.0 + s[1])).abs() / 3.0 + 8e-4;
        z += d;

        let sp = ((s[0] - p[0]).powi(2) + (s[1] - p[1]).powi(2) + (s[2] - p[2]).powi(2)).sqrt();
        let base = s[1] + p[2] * 0.5 + s[2] - sp;
        let o = [
            1.0 + (base + 2.0).sin(),
            1.0 + (base + 1.0).sin(),
            1.0 + base.sin(),
            1.0 + (base + 8.0).sin(),
        ];

        acc[0] += o[3] / d * o[0];
        acc[1] += o[3] / d * o[1];
        acc[2] += o[3] / d * o[2];
    }

    let sanitize = |v: f32| if v.is_finite() { v } else { 0.0 };
    (
        sanitize((acc[0] / 1e4).tanh()),
        sanitize((acc[1] / 1e4).tanh()),
        sanitize((acc[2] / 1e4).tanh()),
    )
}

// p.xz *= mat2(cos(p.y + vec4(0, 11, 33, 0) - T)); a row vector times a
// column-major mat2, so each output component dots with a column.
fn twist_xz(px: f32, py: f32, pz: f32, t: f32) -> (f32, f32) {
    let a = (py - t).cos();
    let b = (py + 11.0 - t).cos();
    let c = (py + 33.0 - t).cos();
    let e = (py - t).cos();
    (a * px + b * pz, c * px + e * pz)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    #[test]
    fn defaults_match_documented_values() {
        let opts = PlasmaOpts::default();
        assert_eq!(opts.color, "#ff6b35");
        assert_eq!(opts.direction, PlasmaDirection::Forward);
        assert!((opts.speed - 0.6).abs() < 1e-6);
        assert!((opts.opacity - 0.8).abs() < 1e-6);
    }

    #[test]
    fn direction_deserializes_snake_case() {
        let d: PlasmaDirection = serde_json::from_str("\"pingpong\"").unwrap();
        assert_eq!(d, PlasmaDirection::Pingpong);
    }

    #[test]
    fn march_output_is_bounded() {
        let (r, g, b) = march(37.0, 11.0, 64.0, 48.0, 2.5);
        for v in [r, g, b] {
            assert!(v.is_finite());
            assert!((-1.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn twist_dots_with_matrix_columns() {
        // Feeding a unit x vector must pick out the first row of the
        // transform: x pairs with cos(py - t), z with cos(py + 33 - t).
        let (qx, qz) = twist_xz(1.0, 0.0, 0.0, 0.0);
        assert!((qx - 1.0).abs() < 1e-6);
        assert!((qz - 33.0f32.cos()).abs() < 1e-6);

        let (qx, qz) = twist_xz(0.0, 0.0, 1.0, 0.0);
        assert!((qx - 11.0f32.cos()).abs() < 1e-6);
        assert!((qz - 1.0).abs() < 1e-6);
    }

    #[test]
    fn render_is_deterministic() {
        let mut w = Plasma::new(PlasmaOpts::default()).unwrap();
        let ctx = FrameCtx::new(FrameIndex(30), Fps::display_refresh(), None);
        let mut a = Surface::new(SurfaceSize::new(12, 12).unwrap());
        let mut b = Surface::new(SurfaceSize::new(12, 12).unwrap());
        w.render(&ctx, &mut a).unwrap();
        w.render(&ctx, &mut b).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn reverse_differs_from_forward() {
        let mut fwd = Plasma::new(PlasmaOpts::default()).unwrap();
        let mut rev = Plasma::new(PlasmaOpts {
            direction: PlasmaDirection::Reverse,
            ..Default::default()
        })
        .unwrap();
        let ctx = FrameCtx::new(FrameIndex(45), Fps::display_refresh(), None);
        let mut a = Surface::new(SurfaceSize::new(12, 12).unwrap());
        let mut b = Surface::new(SurfaceSize::new(12, 12).unwrap());
        fwd.render(&ctx, &mut a).unwrap();
        rev.render(&ctx, &mut b).unwrap();
        assert_ne!(a.data(), b.data());
    }
}
