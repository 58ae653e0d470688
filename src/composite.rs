//! Integer alpha-compositing helpers.
//!
//! Widget surfaces hold straight-alpha pixels; rasterized pixmaps come back
//! premultiplied. Blending happens in premultiplied space with the usual
//! `(x*y + 127)/255` integer rounding.

use crate::foundation::error::{GlimtError, GlimtResult};
use crate::foundation::math::smoothstep;
use crate::surface::Surface;

pub type PremulRgba8 = [u8; 4];

pub fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = sa.saturating_add(mul_div255(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255(u16::from(src[i]), op);
        let dc = mul_div255(u16::from(dst[i]), inv);
        out[i] = sc.saturating_add(dc);
    }
    out
}

/// Composite a premultiplied RGBA8 buffer over a straight-alpha surface.
pub fn premul_over_surface(surface: &mut Surface, src_premul: &[u8]) -> GlimtResult<()> {
    let dst = surface.data_mut();
    if dst.len() != src_premul.len() || !dst.len().is_multiple_of(4) {
        return Err(GlimtError::render(
            "premul_over_surface expects equal-length rgba8 buffers",
        ));
    }
    for (d, s) in dst.chunks_exact_mut(4).zip(src_premul.chunks_exact(4)) {
        let dp = straight_to_premul([d[0], d[1], d[2], d[3]]);
        let out = over(dp, [s[0], s[1], s[2], s[3]], 1.0);
        let st = premul_to_straight(out);
        d.copy_from_slice(&st);
    }
    Ok(())
}

/// Flatten a straight-alpha frame over an opaque background color, writing
/// opaque RGBA into `out`. Used when handing frames to video encoders.
pub fn flatten_over_bg(out: &mut [u8], src_straight: &[u8], bg: [u8; 4]) -> GlimtResult<()> {
    if out.len() != src_straight.len() || !out.len().is_multiple_of(4) {
        return Err(GlimtError::render(
            "flatten_over_bg expects equal-length rgba8 buffers",
        ));
    }
    for (o, s) in out.chunks_exact_mut(4).zip(src_straight.chunks_exact(4)) {
        let a = u16::from(s[3]);
        let inv = 255 - a;
        for i in 0..3 {
            o[i] = mul_div255(u16::from(s[i]), a).saturating_add(mul_div255(u16::from(bg[i]), inv));
        }
        o[3] = 255;
    }
    Ok(())
}

pub fn straight_to_premul(px: [u8; 4]) -> PremulRgba8 {
    let a = u16::from(px[3]);
    [
        mul_div255(u16::from(px[0]), a),
        mul_div255(u16::from(px[1]), a),
        mul_div255(u16::from(px[2]), a),
        px[3],
    ]
}

pub fn premul_to_straight(px: PremulRgba8) -> [u8; 4] {
    let a = px[3];
    if a == 0 {
        return [0, 0, 0, 0];
    }
    let un = |c: u8| -> u8 { (((u32::from(c) * 255) + u32::from(a) / 2) / u32::from(a)).min(255) as u8 };
    [un(px[0]), un(px[1]), un(px[2]), a]
}

/// Which half of a radial vignette darkens.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VignetteKind {
    /// `radial-gradient(rgba(0,0,0,0.8) 0% -> transparent 60%)`
    Center,
    /// `radial-gradient(transparent 60% -> rgba(0,0,0,1) 100%)`
    Outer,
}

/// Darken the surface with a radial vignette, the letter-glitch overlays.
pub fn apply_vignette(surface: &mut Surface, kind: VignetteKind) {
    let w = surface.width() as f32;
    let h = surface.height() as f32;
    let cx = w * 0.5;
    let cy = h * 0.5;
    // CSS circle gradients size to the farthest corner.
    let max_r = (cx * cx + cy * cy).sqrt().max(1.0);

    let width = surface.width();
    for (i, px) in surface.data_mut().chunks_exact_mut(4).enumerate() {
        let x = (i as u32 % width) as f32 + 0.5;
        let y = (i as u32 / width) as f32 + 0.5;
        let dx = x - cx;
        let dy = y - cy;
        let r = (dx * dx + dy * dy).sqrt() / max_r;

        let shade = match kind {
            VignetteKind::Center => 0.8 * (1.0 - smoothstep(0.0, 0.6, r)),
            VignetteKind::Outer => smoothstep(0.6, 1.0, r),
        };
        if shade <= 0.0 {
            continue;
        }
        let keep = ((1.0 - shade) * 255.0).round() as u16;
        for c in px.iter_mut().take(3) {
            *c = mul_div255(u16::from(*c), keep);
        }
        // Black overlay raises coverage where the surface was transparent.
        let a = u16::from(px[3]);
        let overlay_a = (shade * 255.0).round() as u16;
        px[3] = (a + u16::from(mul_div255(overlay_a, 255 - a))).min(255) as u8;
    }
}

fn mul_div255(x: u16, y: u16) -> u8 {
    (((u32::from(x) * u32::from(y)) + 127) / 255) as u8
}
