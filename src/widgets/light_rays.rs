//! Radial light rays emitted from an anchor just outside one edge of the
//! surface, with pointer-aimed direction and smoothed follow.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Rgb, Rgba8};
use crate::foundation::error::GlimtResult;
use crate::foundation::math::{clamp01, hash12, mix};
use crate::surface::Surface;
use crate::widget::{FrameCtx, PointerState, Widget};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RaysOrigin {
    #[default]
    TopCenter,
    TopLeft,
    TopRight,
    Left,
    Right,
    BottomLeft,
    BottomCenter,
    BottomRight,
}

impl RaysOrigin {
    /// Anchor point (20% outside the surface) and reference ray direction,
    /// in pixel coordinates with y down.
    fn anchor_and_dir(self, w: f32, h: f32) -> ([f32; 2], [f32; 2]) {
        const OUTSIDE: f32 = 0.2;
        match self {
            RaysOrigin::TopLeft => ([0.0, -OUTSIDE * h], [0.0, 1.0]),
            RaysOrigin::TopCenter => ([0.5 * w, -OUTSIDE * h], [0.0, 1.0]),
            RaysOrigin::TopRight => ([w, -OUTSIDE * h], [0.0, 1.0]),
            RaysOrigin::Left => ([-OUTSIDE * w, 0.5 * h], [1.0, 0.0]),
            RaysOrigin::Right => ([(1.0 + OUTSIDE) * w, 0.5 * h], [-1.0, 0.0]),
            RaysOrigin::BottomLeft => ([0.0, (1.0 + OUTSIDE) * h], [0.0, -1.0]),
            RaysOrigin::BottomCenter => ([0.5 * w, (1.0 + OUTSIDE) * h], [0.0, -1.0]),
            RaysOrigin::BottomRight => ([w, (1.0 + OUTSIDE) * h], [0.0, -1.0]),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LightRaysOpts {
    pub rays_origin: RaysOrigin,
    pub rays_color: String,
    pub rays_speed: f32,
    pub light_spread: f32,
    pub ray_length: f32,
    pub pulsating: bool,
    pub fade_distance: f32,
    pub saturation: f32,
    pub follow_mouse: bool,
    pub mouse_influence: f32,
    pub noise_amount: f32,
    pub distortion: f32,
}

impl Default for LightRaysOpts {
    fn default() -> Self {
        Self {
            rays_origin: RaysOrigin::TopCenter,
            rays_color: "#ffffff".to_string(),
            rays_speed: 1.0,
            light_spread: 1.0,
            ray_length: 2.0,
            pulsating: false,
            fade_distance: 1.0,
            saturation: 1.0,
            follow_mouse: true,
            mouse_influence: 0.1,
            noise_amount: 0.0,
            distortion: 0.0,
        }
    }
}

pub struct LightRays {
    opts: LightRaysOpts,
    color: Rgb,
    mouse: (f32, f32),
    smooth_mouse: (f32, f32),
}

impl LightRays {
    pub fn new(opts: LightRaysOpts) -> GlimtResult<Self> {
        let color = Rgb::from_hex(&opts.rays_color)?;
        Ok(Self {
            opts,
            color,
            mouse: (0.5, 0.5),
            smooth_mouse: (0.5, 0.5),
        })
    }

    fn ray_strength(
        &self,
        anchor: [f32; 2],
        dir: [f32; 2],
        coord: [f32; 2],
        seed_a: f32,
        seed_b: f32,
        speed: f32,
        t: f32,
        res_x: f32,
    ) -> f32 {
        let o = &self.opts;
        let sx = coord[0] - anchor[0];
        let sy = coord[1] - anchor[1];
        let dist = (sx * sx + sy * sy).sqrt();
        let inv = 1.0 / dist.max(1e-6);
        let cos_angle = sx * inv * dir[0] + sy * inv * dir[1];

        let distorted = cos_angle + o.distortion * (t * 2.0 + dist * 0.01).sin() * 0.2;
        let spread = distorted.max(0.0).powf(1.0 / o.light_spread.max(0.001));

        let max_distance = res_x * o.ray_length;
        let length_falloff = clamp01((max_distance - dist) / max_distance);
        let fade =
            ((res_x * o.fade_distance - dist) / (res_x * o.fade_distance)).clamp(0.5, 1.0);
        let pulse = if o.pulsating {
            0.8 + 0.2 * (t * speed * 3.0).sin()
        } else {
            1.0
        };

        let base = clamp01(
            (0.45 + 0.15 * (distorted * seed_a + t * speed).sin())
                + (0.3 + 0.2 * (-distorted * seed_b + t * speed).cos()),
        );

        base * length_falloff * fade * spread * pulse
    }
}

impl Widget for LightRays {
    fn name(&self) -> &'static str {
        "light_rays"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        let t = ctx.time_s as f32;
        let w = surface.width() as f32;
        let h = surface.height() as f32;

        // The pointer is followed with heavy exponential smoothing, one
        // step per frame.
        if self.opts.follow_mouse && self.opts.mouse_influence > 0.0 {
            const SMOOTHING: f32 = 0.92;
            self.smooth_mouse.0 =
                self.smooth_mouse.0 * SMOOTHING + self.mouse.0 * (1.0 - SMOOTHING);
            self.smooth_mouse.1 =
                self.smooth_mouse.1 * SMOOTHING + self.mouse.1 * (1.0 - SMOOTHING);
        }

        let (anchor, base_dir) = self.opts.rays_origin.anchor_and_dir(w, h);
        let dir = if self.opts.mouse_influence > 0.0 {
            let mx = self.smooth_mouse.0 * w - anchor[0];
            let my = self.smooth_mouse.1 * h - anchor[1];
            let ml = (mx * mx + my * my).sqrt().max(1e-6);
            let dx = mix(base_dir[0], mx / ml, self.opts.mouse_influence);
            let dy = mix(base_dir[1], my / ml, self.opts.mouse_influence);
            let dl = (dx * dx + dy * dy).sqrt().max(1e-6);
            [dx / dl, dy / dl]
        } else {
            base_dir
        };

        let speed = self.opts.rays_speed;
        surface.fill_with(|x, y| {
            let coord = [x as f32 + 0.5, y as f32 + 0.5];

            let r1 = self.ray_strength(anchor, dir, coord, 36.2214, 21.11349, 1.5 * speed, t, w);
            let r2 = self.ray_strength(anchor, dir, coord, 22.3991, 18.0234, 1.1 * speed, t, w);
            let strength = r1 * 0.5 + r2 * 0.4;

            let mut r = strength;
            let mut g = strength;
            let mut b = strength;
            let a = strength;

            if self.opts.noise_amount > 0.0 {
                let n = hash12(coord[0] * 0.01 + t * 0.1, coord[1] * 0.01 + t * 0.1);
                let dim = 1.0 - self.opts.noise_amount + self.opts.noise_amount * n;
                r *= dim;
                g *= dim;
                b *= dim;
            }

            let brightness = 1.0 - coord[1] / h;
            r *= 0.1 + brightness * 0.8;
            g *= 0.3 + brightness * 0.6;
            b *= 0.5 + brightness * 0.5;

            if self.opts.saturation != 1.0 {
                let gray = 0.299 * r + 0.587 * g + 0.114 * b;
                r = mix(gray, r, self.opts.saturation);
                g = mix(gray, g, self.opts.saturation);
                b = mix(gray, b, self.opts.saturation);
            }

            Rgba8::from_f32(r * self.color.r, g * self.color.g, b * self.color.b, a)
        });
        Ok(())
    }

    fn pointer_moved(&mut self, pointer: PointerState) {
        if self.opts.follow_mouse {
            self.mouse = (pointer.nx as f32, pointer.ny as f32);
        }
    }
}
