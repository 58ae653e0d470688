//! Vector and glyph rasterization for the non-shader widgets.
//!
//! Letter cells, spark segments, and text masks are laid out with Parley and
//! rasterized through `vello_cpu` into a premultiplied pixmap, then
//! composited onto the widget surface.

use crate::foundation::core::{Affine, BezPath, Rgba8};
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::surface::Surface;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush color carried through Parley text layout.
pub struct GlyphBrush {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl From<Rgba8> for GlyphBrush {
    fn from(c: Rgba8) -> Self {
        Self {
            r: c.r,
            g: c.g,
            b: c.b,
            a: c.a,
        }
    }
}

/// A font usable for both layout (raw bytes) and glyph drawing.
#[derive(Clone)]
pub struct LoadedFont {
    bytes: Vec<u8>,
    data: vello_cpu::peniko::FontData,
}

impl LoadedFont {
    /// Wrap raw font-file bytes (TTF/OTF).
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        let data =
            vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(bytes.clone()), 0);
        Self { bytes, data }
    }

    /// Read a font file from disk.
    pub fn from_path(path: &std::path::Path) -> GlimtResult<Self> {
        let bytes = std::fs::read(path).map_err(|e| {
            GlimtError::validation(format!("failed to read font '{}': {e}", path.display()))
        })?;
        Ok(Self::from_bytes(bytes))
    }

    pub(crate) fn data(&self) -> &vello_cpu::peniko::FontData {
        &self.data
    }
}

/// Stateful helper for building Parley layouts from raw font bytes.
pub struct TextShaper {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<GlyphBrush>,
}

impl Default for TextShaper {
    fn default() -> Self {
        Self::new()
    }
}

impl TextShaper {
    /// Construct a shaper with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Shape and lay out plain text using the provided font and styling.
    pub fn layout_plain(
        &mut self,
        text: &str,
        font: &LoadedFont,
        size_px: f32,
        brush: GlyphBrush,
    ) -> GlimtResult<parley::Layout<GlyphBrush>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(GlimtError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font.bytes.clone()), None);
        let family_id = families.first().map(|(id, _)| *id).ok_or_else(|| {
            GlimtError::validation("no font families registered from font bytes")
        })?;

        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| GlimtError::validation("registered font family has no name"))?
            .to_string();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: parley::Layout<GlyphBrush> = builder.build(text);
        layout.break_all_lines(None);
        Ok(layout)
    }
}

/// One rasterization pass: queue fills and glyph runs, then composite the
/// resulting premultiplied pixmap over a surface.
pub struct Scene {
    width: u16,
    height: u16,
    ctx: vello_cpu::RenderContext,
}

impl Scene {
    /// Create a scene matching the surface dimensions.
    pub fn new(width: u32, height: u32) -> GlimtResult<Self> {
        let width_u16: u16 = width
            .try_into()
            .map_err(|_| GlimtError::surface("surface width exceeds u16"))?;
        let height_u16: u16 = height
            .try_into()
            .map_err(|_| GlimtError::surface("surface height exceeds u16"))?;
        Ok(Self {
            width: width_u16,
            height: height_u16,
            ctx: vello_cpu::RenderContext::new(width_u16, height_u16),
        })
    }

    /// Fill a path with a solid color under a transform.
    pub fn fill_path(&mut self, path: &BezPath, transform: Affine, color: Rgba8) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_path(&bezpath_to_cpu(path));
    }

    /// Fill an axis-aligned rect with a solid color under a transform.
    pub fn fill_rect(&mut self, rect: kurbo::Rect, transform: Affine, color: Rgba8) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
            color.r, color.g, color.b, color.a,
        ));
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            rect.x0, rect.y0, rect.x1, rect.y1,
        ));
    }

    /// Draw every glyph run of a layout.
    ///
    /// `color` overrides the layout's brush when set; cached layouts can be
    /// recolored per cell without reshaping.
    pub fn draw_layout(
        &mut self,
        layout: &parley::Layout<GlyphBrush>,
        font: &LoadedFont,
        transform: Affine,
        color: Option<Rgba8>,
    ) {
        self.ctx
            .set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));

        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = match color {
                    Some(c) => GlyphBrush::from(c),
                    None => run.style().brush,
                };
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, brush.a,
                ));

                let glyphs = run.glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(font.data())
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize the queued scene to premultiplied RGBA8 bytes.
    pub fn finish(mut self) -> Vec<u8> {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        pixmap.data_as_u8_slice().to_vec()
    }

    /// Rasterize and composite over `surface` in one step.
    pub fn composite_over(self, surface: &mut Surface) -> GlimtResult<()> {
        let premul = self.finish();
        crate::composite::premul_over_surface(surface, &premul)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    fn pt(p: kurbo::Point) -> vello_cpu::kurbo::Point {
        vello_cpu::kurbo::Point::new(p.x, p.y)
    }

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(pt(p)),
            PathEl::LineTo(p) => out.line_to(pt(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(pt(p1), pt(p2)),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(pt(p1), pt(p2), pt(p3)),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}
