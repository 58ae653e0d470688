//! Terminal-glitch shader: a barrel-distorted digit grid lit by fbm noise,
//! with a moving scanline bar and an intermittent horizontal displacement.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Rgb, Rgba8};
use crate::foundation::error::GlimtResult;
use crate::foundation::math::{fract, rotate2, step};
use crate::surface::Surface;
use crate::widget::{FrameCtx, PointerState, Widget};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FaultyTerminalOpts {
    pub tint: String,
    pub mouse_react: bool,
    pub time_scale: f32,
    pub brightness: f32,
}

impl Default for FaultyTerminalOpts {
    fn default() -> Self {
        Self {
            tint: "#00ff00".to_string(),
            mouse_react: true,
            time_scale: 1.0,
            brightness: 1.0,
        }
    }
}

pub struct FaultyTerminal {
    tint: Rgb,
    mouse_react: bool,
    time_scale: f32,
    brightness: f32,
    // Normalized pointer with y up, matching the shader's coordinate space.
    mouse: (f32, f32),
}

impl FaultyTerminal {
    pub fn new(opts: FaultyTerminalOpts) -> GlimtResult<Self> {
        let tint = Rgb::from_hex(&opts.tint)?;
        Ok(Self {
            tint,
            mouse_react: opts.mouse_react,
            time_scale: opts.time_scale,
            brightness: opts.brightness,
            mouse: (0.5, 0.5),
        })
    }
}

impl Widget for FaultyTerminal {
    fn name(&self) -> &'static str {
        "faulty_terminal"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        let t = ctx.time_s as f32 * self.time_scale;
        let shader = Shader {
            t,
            mouse: self.mouse,
        };

        let w = surface.width() as f32;
        let h = surface.height() as f32;
        surface.fill_with(|x, y| {
            let u = (x as f32 + 0.5) / w;
            let v = 1.0 - (y as f32 + 0.5) / h;
            let (u, v) = barrel(u, v);
            let (r, g, b) = shader.color(u * 1.5, v * 1.5);
            Rgba8::from_f32(
                r * self.tint.r * self.brightness,
                g * self.tint.g * self.brightness,
                b * self.tint.b * self.brightness,
                1.0,
            )
        });
        Ok(())
    }

    fn pointer_moved(&mut self, pointer: PointerState) {
        if self.mouse_react {
            self.mouse = (pointer.nx as f32, 1.0 - pointer.ny as f32);
        }
    }
}

struct Shader {
    t: f32,
    mouse: (f32, f32),
}

impl Shader {
    fn noise(&self, px: f32, py: f32) -> f32 {
        (px * 10.0).sin() * (py * (3.0 + (self.t * 0.090909).sin())).sin() + 0.2
    }

    fn fbm(&self, px: f32, py: f32) -> f32 {
        let (mut px, mut py) = (px * 1.1, py * 1.1);
        let mut f = 0.0;
        let mut amp = 0.5;

        f += amp * self.noise(px, py);
        let (rx, ry) = glsl_rot(px, py, self.t * 0.02);
        px = rx * 2.0;
        py = ry * 2.0;
        amp *= 0.454545;

        f += amp * self.noise(px, py);
        let (rx, ry) = glsl_rot(px, py, self.t * 0.02);
        px = rx * 2.0;
        py = ry * 2.0;
        amp *= 0.454545;

        f += amp * self.noise(px, py);
        f
    }

    fn pattern(&self, px: f32, py: f32) -> f32 {
        let (r01x, r01y) = glsl_rot(px, py, 0.1 * self.t);
        let qx = self.fbm(px + 1.0, py + 1.0);
        let qy = self.fbm(r01x + 1.0, r01y + 1.0);
        let (rqx, rqy) = glsl_rot(qx, qy, 0.1);
        let rx = self.fbm(rqx, rqy);
        let ry = self.fbm(qx, qy);
        self.fbm(px + rx, py + ry)
    }

    fn digit(&self, px: f32, py: f32) -> f32 {
        let (gx, gy) = (2.0 * 15.0, 1.0 * 15.0);
        let sx = (px * gx).floor() / gx;
        let sy = (py * gy).floor() / gy;
        let px = px * gx;
        let py = py * gy;
        let mut intensity = self.pattern(sx * 0.1, sy * 0.1) * 1.3 - 0.03;

        let (mx, my) = (self.mouse.0 * 1.5, self.mouse.1 * 1.5);
        let dist = ((sx - mx).powi(2) + (sy - my).powi(2)).sqrt();
        let influence = (-dist * 8.0).exp() * 0.5 * 10.0;
        intensity += influence;
        intensity += (dist * 20.0 - self.t * 5.0).sin() * 0.1 * influence;

        let px = fract(px) * 1.2;
        let py = fract(py) * 1.2;

        let px5 = px * 5.0;
        let py5 = (1.0 - py) * 5.0;
        let x = fract(px5);
        let y = fract(py5);

        let i = py5.floor() - 2.0;
        let j = px5.floor() - 2.0;
        let n = i * i + j * j;
        let f = n * 0.0625;

        let is_on = step(0.1, intensity - f);
        let bright = is_on * (0.2 + y * 0.8) * (0.75 + x * 0.25);

        step(0.0, px) * step(px, 1.0) * step(0.0, py) * step(py, 1.0) * bright
    }

    fn on_off(&self, a: f32, b: f32, c: f32) -> f32 {
        step(c, (self.t + a * (self.t * b).cos()).sin())
    }

    fn displace(&self, look_y: f32) -> f32 {
        let y = look_y - (self.t * 0.25).rem_euclid(1.0);
        let window = 1.0 / (1.0 + 50.0 * y * y);
        (look_y * 20.0 + self.t).sin()
            * 0.0125
            * self.on_off(4.0, 2.0, 0.8)
            * (1.0 + (self.t * 60.0).cos())
            * window
    }

    fn color(&self, px: f32, py: f32) -> (f32, f32, f32) {
        let bar = step((py + self.t * 0.333333 * 20.0).rem_euclid(1.0), 0.2) * 0.4 + 1.0;

        let px = px + self.displace(py);
        let middle = self.digit(px, py);

        const OFF: f32 = 0.002;
        let mut sum = 0.0;
        for dy in [-OFF, 0.0, OFF] {
            for dx in [-OFF, 0.0, OFF] {
                sum += self.digit(px + dx, py + dy);
            }
        }

        let v = 0.9 * middle + sum * 0.1 * bar;
        (v, v, v)
    }
}

// GLSL `mat2(c, -s, s, c) * p`, i.e. rotation by the negated angle in the
// usual convention.
fn glsl_rot(x: f32, y: f32, angle: f32) -> (f32, f32) {
    rotate2(x, y, -angle)
}

fn barrel(u: f32, v: f32) -> (f32, f32) {
    let cx = u * 2.0 - 1.0;
    let cy = v * 2.0 - 1.0;
    let r2 = cx * cx + cy * cy;
    let k = 1.0 + 0.2 * r2;
    ((cx * k) * 0.5 + 0.5, (cy * k) * 0.5 + 0.5)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    #[test]
    fn invalid_tint_is_rejected() {
        let opts = FaultyTerminalOpts {
            tint: "#zzz".into(),
            ..Default::default()
        };
        assert!(FaultyTerminal::new(opts).is_err());
    }

    #[test]
    fn output_is_opaque_and_deterministic() {
        let mut w = FaultyTerminal::new(FaultyTerminalOpts::default()).unwrap();
        let ctx = FrameCtx::new(FrameIndex(12), Fps::display_refresh(), None);
        let mut a = Surface::new(SurfaceSize::new(16, 16).unwrap());
        let mut b = Surface::new(SurfaceSize::new(16, 16).unwrap());
        w.render(&ctx, &mut a).unwrap();
        w.render(&ctx, &mut b).unwrap();
        assert_eq!(a.data(), b.data());
        assert!(a.data().chunks_exact(4).all(|px| px[3] == 255));
    }

    #[test]
    fn pointer_is_ignored_when_mouse_react_off() {
        let opts = FaultyTerminalOpts {
            mouse_react: false,
            ..Default::default()
        };
        let mut w = FaultyTerminal::new(opts).unwrap();
        let before = w.mouse;
        w.pointer_moved(PointerState {
            px: 10.0,
            py: 10.0,
            nx: 0.9,
            ny: 0.9,
        });
        assert_eq!(w.mouse, before);
    }

    #[test]
    fn barrel_is_identity_at_center() {
        let (u, v) = barrel(0.5, 0.5);
        assert!((u - 0.5).abs() < 1e-6);
        assert!((v - 0.5).abs() < 1e-6);
    }
}
