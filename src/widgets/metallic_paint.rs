//! Metallic-paint stripe shader driven by a luminance mask: dark mask
//! pixels become liquid-metal surface, light pixels become transparent.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Rect, Rgba8};
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::foundation::math::{clamp01, mix, rotate2, smoothstep, snoise};
use crate::raster::{GlyphBrush, LoadedFont, Scene, TextShaper};
use crate::surface::Surface;
use crate::widget::{FrameCtx, Widget};

/// Grayscale mask sampled by the shader; `0.0` is shape, `1.0` is empty.
#[derive(Clone, Debug)]
pub struct MaskImage {
    width: u32,
    height: u32,
    data: Vec<f32>,
}

impl MaskImage {
    pub fn new(width: u32, height: u32, data: Vec<f32>) -> GlimtResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlimtError::validation("mask dimensions must be non-zero"));
        }
        if data.len() != (width as usize) * (height as usize) {
            return Err(GlimtError::validation("mask data length mismatch"));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Load a mask from a PNG (or any image the `image` crate reads),
    /// taking per-pixel luminance.
    pub fn from_image_path(path: &Path) -> GlimtResult<Self> {
        let img = image::open(path)
            .map_err(|e| {
                GlimtError::validation(format!("failed to read mask '{}': {e}", path.display()))
            })?
            .to_luma8();
        let (w, h) = img.dimensions();
        let data = img.pixels().map(|p| f32::from(p.0[0]) / 255.0).collect();
        Self::new(w, h, data)
    }

    /// A black soft-edged disc on a white square, the dot mask the nav
    /// widget uses.
    pub fn disc(size: u32) -> GlimtResult<Self> {
        let size = size.max(4);
        let center = size as f32 * 0.5;
        let radius = size as f32 * 0.38;
        let soft = size as f32 * 0.06;
        let mut data = Vec::with_capacity((size as usize) * (size as usize));
        for y in 0..size {
            for x in 0..size {
                let dx = x as f32 + 0.5 - center;
                let dy = y as f32 + 0.5 - center;
                let d = (dx * dx + dy * dy).sqrt();
                data.push(smoothstep(radius - soft, radius + soft, d));
            }
        }
        Self::new(size, size, data)
    }

    /// Rasterize black text on a white card, like the original's
    /// text-to-ImageData helper.
    pub fn from_text(
        text: &str,
        font: &LoadedFont,
        font_size_px: f32,
        padding: u32,
    ) -> GlimtResult<Self> {
        let mut shaper = TextShaper::new();
        let layout = shaper.layout_plain(text, font, font_size_px, GlyphBrush::default())?;
        let width = layout.width().ceil() as u32 + padding * 2;
        let height = font_size_px.ceil() as u32 + padding * 2;

        let mut scene = Scene::new(width.max(1), height.max(1))?;
        scene.fill_rect(
            Rect::new(0.0, 0.0, f64::from(width), f64::from(height)),
            Affine::IDENTITY,
            Rgba8::new(255, 255, 255, 255),
        );
        scene.draw_layout(
            &layout,
            font,
            Affine::translate((f64::from(padding), f64::from(padding))),
            Some(Rgba8::BLACK),
        );
        let premul = scene.finish();
        let data = premul.chunks_exact(4).map(|px| {
            let lum = 0.299 * f32::from(px[0]) + 0.587 * f32::from(px[1]) + 0.114 * f32::from(px[2]);
            lum / 255.0
        });
        Self::new(width.max(1), height.max(1), data.collect())
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Bilinear sample with clamp-to-edge, texel coordinates in [0,1].
    pub fn sample(&self, u: f32, v: f32) -> f32 {
        let x = u * self.width as f32 - 0.5;
        let y = v * self.height as f32 - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;

        let fetch = |xi: i64, yi: i64| -> f32 {
            let xi = xi.clamp(0, i64::from(self.width) - 1) as usize;
            let yi = yi.clamp(0, i64::from(self.height) - 1) as usize;
            self.data[yi * self.width as usize + xi]
        };

        let x0i = x0 as i64;
        let y0i = y0 as i64;
        let top = mix(fetch(x0i, y0i), fetch(x0i + 1, y0i), tx);
        let bot = mix(fetch(x0i, y0i + 1), fetch(x0i + 1, y0i + 1), tx);
        mix(top, bot, ty)
    }
}

/// Where the mask comes from when the widget is built from options.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum MaskSource {
    Png {
        path: PathBuf,
    },
    Disc {
        size: u32,
    },
    Text {
        text: String,
        font_path: PathBuf,
        #[serde(default = "default_text_size")]
        font_size_px: f32,
        #[serde(default = "default_text_padding")]
        padding: u32,
    },
}

fn default_text_size() -> f32 {
    100.0
}

fn default_text_padding() -> u32 {
    20
}

impl Default for MaskSource {
    fn default() -> Self {
        MaskSource::Disc { size: 128 }
    }
}

impl MaskSource {
    fn build(&self) -> GlimtResult<MaskImage> {
        match self {
            MaskSource::Png { path } => MaskImage::from_image_path(path),
            MaskSource::Disc { size } => MaskImage::disc(*size),
            MaskSource::Text {
                text,
                font_path,
                font_size_px,
                padding,
            } => {
                let font = LoadedFont::from_path(font_path)?;
                MaskImage::from_text(text, &font, *font_size_px, *padding)
            }
        }
    }
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetallicParams {
    pub pattern_scale: f32,
    pub refraction: f32,
    pub edge: f32,
    pub pattern_blur: f32,
    pub liquid: f32,
    pub speed: f32,
}

impl Default for MetallicParams {
    fn default() -> Self {
        Self {
            pattern_scale: 2.0,
            refraction: 0.015,
            edge: 1.0,
            pattern_blur: 0.005,
            liquid: 0.07,
            speed: 0.3,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MetallicPaintOpts {
    pub pattern_scale: f32,
    pub refraction: f32,
    pub edge: f32,
    pub pattern_blur: f32,
    pub liquid: f32,
    pub speed: f32,
    pub mask: MaskSource,
}

impl Default for MetallicPaintOpts {
    fn default() -> Self {
        let p = MetallicParams::default();
        Self {
            pattern_scale: p.pattern_scale,
            refraction: p.refraction,
            edge: p.edge,
            pattern_blur: p.pattern_blur,
            liquid: p.liquid,
            speed: p.speed,
            mask: MaskSource::default(),
        }
    }
}

impl MetallicPaintOpts {
    fn params(&self) -> MetallicParams {
        MetallicParams {
            pattern_scale: self.pattern_scale,
            refraction: self.refraction,
            edge: self.edge,
            pattern_blur: self.pattern_blur,
            liquid: self.liquid,
            speed: self.speed,
        }
    }
}

pub struct MetallicPaint {
    params: MetallicParams,
    mask: MaskImage,
}

impl MetallicPaint {
    pub fn new(opts: MetallicPaintOpts) -> GlimtResult<Self> {
        let mask = opts.mask.build()?;
        Ok(Self::with_mask(mask, opts.params()))
    }

    /// Build around an already-prepared mask.
    pub fn with_mask(mask: MaskImage, params: MetallicParams) -> Self {
        Self { params, mask }
    }

    // Straight port of the stripe fragment shader. `vu`/`vv` are the
    // vertex UV with y up; `t` is seconds scaled by `speed`.
    fn shade(&self, vu: f32, vv: f32, t: f32, ratio: f32) -> (f32, f32, f32, f32) {
        let p = &self.params;
        let ux = vu * ratio;
        let uy = 1.0 - vv;
        let diagonal = ux - uy;

        // Aspect-fit image UV, then flip y.
        let img_ratio = self.mask.aspect();
        let mut iu = vu - 0.5;
        let mut iv = vv - 0.5;
        if ratio > img_ratio {
            iu = iu * ratio / img_ratio;
        } else {
            iv = iv * img_ratio / ratio;
        }
        iu += 0.5;
        iv += 0.5;
        iv = 1.0 - iv;

        let mut edge = self.mask.sample(iu.clamp(0.0, 1.0), iv.clamp(0.0, 1.0));

        let color1 = [0.98f32, 0.98, 1.0];
        let color2 = [0.1f32, 0.1, 0.1 + 0.1 * smoothstep(0.7, 1.3, ux + uy)];

        let gx = ux - 0.5;
        let gy = uy - 0.5;
        let dist = (gx * gx + (gy + 0.2 * diagonal).powi(2)).sqrt();
        // Only the rotated x feeds the stripe direction.
        let (gx, _) = rotate2(gx, gy, (0.25 - 0.2 * diagonal) * std::f32::consts::PI);

        let mut bulge = 1.0 - (1.8 * dist).powf(1.2);
        bulge *= uy.max(0.0).powf(0.3);

        let cycle_width = p.pattern_scale;
        let thin_strip_1_ratio = 0.12 / cycle_width * (1.0 - 0.4 * bulge);
        let thin_strip_2_ratio = 0.07 / cycle_width * (1.0 + 0.4 * bulge);
        let wide_strip_ratio = 1.0 - thin_strip_1_ratio - thin_strip_2_ratio;
        let thin_strip_1_width = cycle_width * thin_strip_1_ratio;
        let thin_strip_2_width = cycle_width * thin_strip_2_ratio;

        let mut opacity = 1.0 - smoothstep(0.9 - 0.5 * p.edge, 1.0 - 0.5 * p.edge, edge);
        opacity *= frame_alpha(iu, iv, 0.01);

        let noise = snoise(ux - t, uy - t);
        edge += (1.0 - edge) * p.liquid * noise;

        let refr = clamp01(1.0 - bulge);

        let mut dir = gx;
        dir += diagonal;
        dir -= 2.0 * noise * diagonal * (smoothstep(0.0, 1.0, edge) * smoothstep(1.0, 0.0, edge));
        bulge *= uy.max(0.0).powf(0.1).clamp(0.3, 1.0);
        dir *= 0.1 + (1.1 - edge) * bulge;
        dir *= smoothstep(1.0, 0.7, edge);
        dir += 0.18 * (smoothstep(0.1, 0.2, uy) * smoothstep(0.4, 0.2, uy));
        dir += 0.03 * (smoothstep(0.1, 0.2, 1.0 - uy) * smoothstep(0.4, 0.2, 1.0 - uy));
        dir *= 0.5 + 0.5 * uy.powi(2);
        dir *= cycle_width;
        dir -= t;

        let mut refr_r = refr;
        refr_r += 0.03 * bulge * noise;
        let mut refr_b = 1.3 * refr;
        refr_r += 5.0
            * (smoothstep(-0.1, 0.2, uy) * smoothstep(0.5, 0.1, uy))
            * (smoothstep(0.4, 0.6, bulge) * smoothstep(1.0, 0.4, bulge));
        refr_r -= diagonal;
        refr_b += (smoothstep(0.0, 0.4, uy) * smoothstep(0.8, 0.1, uy))
            * (smoothstep(0.4, 0.6, bulge) * smoothstep(0.8, 0.4, bulge));
        refr_b -= 0.2 * edge;
        refr_r *= p.refraction;
        refr_b *= p.refraction;

        let mut w = [thin_strip_1_width, thin_strip_2_width, wide_strip_ratio];
        w[1] -= 0.02 * smoothstep(0.0, 1.0, edge + bulge);

        let blur = p.pattern_blur;
        let stripe_r = (dir + refr_r).rem_euclid(1.0);
        let r = color_channel(
            color1[0],
            color2[0],
            stripe_r,
            w,
            0.02 + 0.03 * p.refraction * bulge,
            bulge,
            blur,
        );
        let stripe_g = dir.rem_euclid(1.0);
        let g = color_channel(
            color1[1],
            color2[1],
            stripe_g,
            w,
            0.01 / (1.0 - diagonal),
            bulge,
            blur,
        );
        let stripe_b = (dir - refr_b).rem_euclid(1.0);
        let b = color_channel(color1[2], color2[2], stripe_b, w, 0.01, bulge, blur);

        (r * opacity, g * opacity, b * opacity, opacity)
    }

    /// Render into a caller-provided surface region; the nav widget draws
    /// its dots through this.
    pub(crate) fn render_into(
        &self,
        surface: &mut Surface,
        x0: u32,
        y0: u32,
        w: u32,
        h: u32,
        time_s: f64,
    ) {
        if w == 0 || h == 0 {
            return;
        }
        let t = time_s as f32 * self.params.speed;
        let ratio = w as f32 / h as f32;
        for dy in 0..h {
            for dx in 0..w {
                let vu = (dx as f32 + 0.5) / w as f32;
                let vv = 1.0 - (dy as f32 + 0.5) / h as f32;
                let (r, g, b, a) = self.shade(vu, vv, t, ratio);
                if a > 0.0 {
                    surface.put(x0 + dx, y0 + dy, Rgba8::from_f32(r, g, b, a));
                }
            }
        }
    }
}

impl Widget for MetallicPaint {
    fn name(&self) -> &'static str {
        "metallic_paint"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        let t = ctx.time_s as f32 * self.params.speed;
        let w = surface.width() as f32;
        let h = surface.height() as f32;
        let ratio = w / h;
        surface.fill_with(|x, y| {
            let vu = (x as f32 + 0.5) / w;
            let vv = 1.0 - (y as f32 + 0.5) / h;
            let (r, g, b, a) = self.shade(vu, vv, t, ratio);
            Rgba8::from_f32(r, g, b, a)
        });
        Ok(())
    }
}

fn frame_alpha(u: f32, v: f32, frame_width: f32) -> f32 {
    smoothstep(0.0, frame_width, u)
        * smoothstep(1.0, 1.0 - frame_width, u)
        * smoothstep(0.0, frame_width, v)
        * smoothstep(1.0, 1.0 - frame_width, v)
}

// The 5-band stripe mixer; `w` holds the two thin strip widths and the
// wide strip ratio.
#[allow(clippy::too_many_arguments)]
fn color_channel(
    c1: f32,
    c2: f32,
    stripe_p: f32,
    w: [f32; 3],
    extra_blur: f32,
    b: f32,
    pattern_blur: f32,
) -> f32 {
    let blur = pattern_blur + extra_blur;
    let mut ch = c2;
    ch = mix(ch, c1, smoothstep(0.0, blur, stripe_p));
    let mut border = w[0];
    ch = mix(ch, c2, smoothstep(border - blur, border + blur, stripe_p));
    let b = smoothstep(0.2, 0.8, b);
    border = w[0] + 0.4 * (1.0 - b) * w[1];
    ch = mix(ch, c1, smoothstep(border - blur, border + blur, stripe_p));
    border = w[0] + 0.5 * (1.0 - b) * w[1];
    ch = mix(ch, c2, smoothstep(border - blur, border + blur, stripe_p));
    border = w[0] + w[1];
    ch = mix(ch, c1, smoothstep(border - blur, border + blur, stripe_p));
    let gradient_t = (stripe_p - w[0] - w[1]) / w[2];
    let gradient = mix(c1, c2, smoothstep(0.0, 1.0, gradient_t));
    mix(ch, gradient, smoothstep(border - blur, border + blur, stripe_p))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    #[test]
    fn disc_mask_is_dark_inside_light_outside() {
        let m = MaskImage::disc(64).unwrap();
        assert!(m.sample(0.5, 0.5) < 0.1);
        assert!(m.sample(0.02, 0.02) > 0.9);
    }

    #[test]
    fn mask_sampling_clamps_to_edge() {
        let m = MaskImage::new(2, 2, vec![0.0, 1.0, 0.0, 1.0]).unwrap();
        assert!((m.sample(-1.0, 0.5) - 0.0).abs() < 1e-6);
        assert!((m.sample(2.0, 0.5) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn mask_rejects_bad_dimensions() {
        assert!(MaskImage::new(0, 4, vec![]).is_err());
        assert!(MaskImage::new(2, 2, vec![0.0; 3]).is_err());
    }

    #[test]
    fn shape_interior_is_opaque_and_exterior_transparent() {
        let mut w = MetallicPaint::new(MetallicPaintOpts::default()).unwrap();
        let ctx = FrameCtx::new(FrameIndex(0), Fps::display_refresh(), None);
        let mut s = Surface::new(SurfaceSize::new(64, 64).unwrap());
        w.render(&ctx, &mut s).unwrap();
        assert!(s.get(32, 32).a > 200, "disc center should be opaque");
        assert!(s.get(2, 2).a < 30, "corner should be transparent");
    }

    #[test]
    fn default_params_match_original() {
        let p = MetallicParams::default();
        assert!((p.pattern_scale - 2.0).abs() < 1e-6);
        assert!((p.refraction - 0.015).abs() < 1e-6);
        assert!((p.liquid - 0.07).abs() < 1e-6);
    }
}
