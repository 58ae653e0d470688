//! Liquid-chrome shader: nine iterations of mutual cos-warping with a
//! pointer ripple, supersampled 3x3 at one-pixel offsets.

use serde::{Deserialize, Serialize};

use crate::foundation::core::Rgba8;
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::surface::Surface;
use crate::widget::{FrameCtx, PointerState, Widget};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LiquidChromeOpts {
    pub base_color: [f32; 3],
    pub speed: f32,
    pub amplitude: f32,
    pub frequency_x: f32,
    pub frequency_y: f32,
    pub interactive: bool,
}

impl Default for LiquidChromeOpts {
    fn default() -> Self {
        Self {
            base_color: [0.1, 0.1, 0.1],
            speed: 0.2,
            amplitude: 0.3,
            frequency_x: 3.0,
            frequency_y: 3.0,
            interactive: true,
        }
    }
}

pub struct LiquidChrome {
    opts: LiquidChromeOpts,
    // Normalized pointer with y up. Starts centered.
    mouse: (f32, f32),
}

impl LiquidChrome {
    pub fn new(opts: LiquidChromeOpts) -> GlimtResult<Self> {
        if !opts.speed.is_finite() || !opts.amplitude.is_finite() {
            return Err(GlimtError::validation(
                "liquid_chrome speed/amplitude must be finite",
            ));
        }
        Ok(Self {
            opts,
            mouse: (0.5, 0.5),
        })
    }

    fn sample(&self, ux: f32, uy: f32, rw: f32, rh: f32, t: f32) -> (f32, f32, f32) {
        let o = &self.opts;
        let min_dim = rw.min(rh);

        let fx = ux * rw;
        let fy = uy * rh;
        let mut x = (2.0 * fx - rw) / min_dim;
        let mut y = (2.0 * fy - rh) / min_dim;

        for i in 1..10 {
            let i = i as f32;
            x += o.amplitude / i * (i * o.frequency_x * y + t + self.mouse.0 * 3.14159).cos();
            y += o.amplitude / i * (i * o.frequency_y * x + t + self.mouse.1 * 3.14159).cos();
        }

        let dx = ux - self.mouse.0;
        let dy = uy - self.mouse.1;
        let dist = (dx * dx + dy * dy).sqrt();
        let falloff = (-dist * 20.0).exp();
        let ripple = (10.0 * dist - t * 2.0).sin() * 0.03;
        x += dx / (dist + 0.0001) * ripple * falloff;
        y += dy / (dist + 0.0001) * ripple * falloff;

        let denom = (t - y - x).sin().abs().max(1e-6);
        (
            o.base_color[0] / denom,
            o.base_color[1] / denom,
            o.base_color[2] / denom,
        )
    }
}

impl Widget for LiquidChrome {
    fn name(&self) -> &'static str {
        "liquid_chrome"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        let t = ctx.time_s as f32 * self.opts.speed;
        let rw = surface.width() as f32;
        let rh = surface.height() as f32;
        let inv_min = 1.0 / rw.min(rh);

        surface.fill_with(|x, y| {
            let ux = (x as f32 + 0.5) / rw;
            let uy = 1.0 - (y as f32 + 0.5) / rh;

            let mut acc = (0.0f32, 0.0f32, 0.0f32);
            for i in -1i32..=1 {
                for j in -1i32..=1 {
                    let (r, g, b) = self.sample(
                        ux + i as f32 * inv_min,
                        uy + j as f32 * inv_min,
                        rw,
                        rh,
                        t,
                    );
                    acc.0 += r;
                    acc.1 += g;
                    acc.2 += b;
                }
            }
            Rgba8::from_f32(acc.0 / 9.0, acc.1 / 9.0, acc.2 / 9.0, 1.0)
        });
        Ok(())
    }

    fn pointer_moved(&mut self, pointer: PointerState) {
        if self.opts.interactive {
            self.mouse = (pointer.nx as f32, 1.0 - pointer.ny as f32);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    #[test]
    fn defaults_match_documented_values() {
        let o = LiquidChromeOpts::default();
        assert_eq!(o.base_color, [0.1, 0.1, 0.1]);
        assert!((o.speed - 0.2).abs() < 1e-6);
        assert!((o.frequency_x - 3.0).abs() < 1e-6);
        assert!(o.interactive);
    }

    #[test]
    fn output_is_opaque() {
        let mut w = LiquidChrome::new(LiquidChromeOpts::default()).unwrap();
        let ctx = FrameCtx::new(FrameIndex(5), Fps::display_refresh(), None);
        let mut s = Surface::new(SurfaceSize::new(10, 8).unwrap());
        w.render(&ctx, &mut s).unwrap();
        assert!(s.data().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn pointer_shifts_the_field() {
        let ctx = FrameCtx::new(FrameIndex(5), Fps::display_refresh(), None);
        let mut a = Surface::new(SurfaceSize::new(10, 8).unwrap());
        let mut b = Surface::new(SurfaceSize::new(10, 8).unwrap());

        let mut w = LiquidChrome::new(LiquidChromeOpts::default()).unwrap();
        w.render(&ctx, &mut a).unwrap();
        w.pointer_moved(PointerState {
            px: 1.0,
            py: 1.0,
            nx: 0.1,
            ny: 0.9,
        });
        w.render(&ctx, &mut b).unwrap();
        assert_ne!(a.data(), b.data());
    }

    #[test]
    fn non_finite_options_rejected() {
        let o = LiquidChromeOpts {
            amplitude: f32::NAN,
            ..Default::default()
        };
        assert!(LiquidChrome::new(o).is_err());
    }
}
