//! Letter-glitch canvas: a grid of random glyphs where a few cells per
//! glitch tick pick a new character and drift toward a new color.

use std::collections::HashMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::composite::{apply_vignette, VignetteKind};
use crate::foundation::core::{Affine, Rgb, Rgba8};
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::foundation::math::SplitMix64;
use crate::raster::{GlyphBrush, LoadedFont, Scene, TextShaper};
use crate::surface::Surface;
use crate::widget::{FrameCtx, Widget};

const FONT_SIZE: f32 = 16.0;
const CHAR_WIDTH: u32 = 10;
const CHAR_HEIGHT: u32 = 20;

fn default_colors() -> Vec<String> {
    vec![
        "#2b4539".to_string(),
        "#61dca3".to_string(),
        "#61b3dc".to_string(),
    ]
}

fn default_characters() -> String {
    "ABCDEFGHIJKLMNOPQRSTUVWXYZ!@#$&*()-_+=/[]{};:<>.,0123456789".to_string()
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LetterGlitchOpts {
    pub glitch_colors: Vec<String>,
    /// Milliseconds between glitch ticks.
    pub glitch_speed_ms: u64,
    pub center_vignette: bool,
    pub outer_vignette: bool,
    pub smooth: bool,
    pub characters: String,
    pub seed: u64,
    /// Optional TTF/OTF file for glyph rendering. Without a font the cells
    /// render as solid blocks.
    pub font_path: Option<PathBuf>,
}

impl Default for LetterGlitchOpts {
    fn default() -> Self {
        Self {
            glitch_colors: default_colors(),
            glitch_speed_ms: 50,
            center_vignette: true,
            outer_vignette: false,
            smooth: true,
            characters: default_characters(),
            seed: 0,
            font_path: None,
        }
    }
}

struct Cell {
    char_idx: usize,
    color: Rgb,
    target: Rgb,
    progress: f32,
}

pub struct LetterGlitch {
    opts: LetterGlitchOpts,
    colors: Vec<Rgb>,
    charset: Vec<char>,
    rng: SplitMix64,
    cells: Vec<Cell>,
    columns: u32,
    rows: u32,
    last_glitch_s: f64,
    font: Option<LoadedFont>,
    shaper: TextShaper,
    glyph_cache: HashMap<usize, parley::Layout<GlyphBrush>>,
}

impl LetterGlitch {
    pub fn new(opts: LetterGlitchOpts) -> GlimtResult<Self> {
        if opts.glitch_colors.is_empty() {
            return Err(GlimtError::validation(
                "letter_glitch glitch_colors must be non-empty",
            ));
        }
        if opts.characters.is_empty() {
            return Err(GlimtError::validation(
                "letter_glitch characters must be non-empty",
            ));
        }
        let colors = opts
            .glitch_colors
            .iter()
            .map(|hex| Rgb::from_hex(hex))
            .collect::<GlimtResult<Vec<_>>>()?;
        let charset: Vec<char> = opts.characters.chars().collect();
        let font = match &opts.font_path {
            Some(path) => Some(LoadedFont::from_path(path)?),
            None => None,
        };
        let rng = SplitMix64::new(opts.seed);
        Ok(Self {
            opts,
            colors,
            charset,
            rng,
            cells: Vec::new(),
            columns: 0,
            rows: 0,
            last_glitch_s: 0.0,
            font,
            shaper: TextShaper::new(),
            glyph_cache: HashMap::new(),
        })
    }

    fn init_cells(&mut self, width: u32, height: u32) {
        self.columns = width.div_ceil(CHAR_WIDTH);
        self.rows = height.div_ceil(CHAR_HEIGHT);
        let total = (self.columns * self.rows) as usize;
        self.cells.clear();
        for _ in 0..total {
            let char_idx = self.rng.next_index(self.charset.len());
            let color = self.colors[self.rng.next_index(self.colors.len())];
            let target = self.colors[self.rng.next_index(self.colors.len())];
            self.cells.push(Cell {
                char_idx,
                color,
                target,
                progress: 1.0,
            });
        }
    }

    fn glitch_tick(&mut self) {
        let update_count = ((self.cells.len() as f64 * 0.02).floor() as usize).max(1);
        for _ in 0..update_count {
            let idx = self.rng.next_index(self.cells.len());
            let cell = &mut self.cells[idx];
            cell.char_idx = self.rng.next_index(self.charset.len());
            cell.target = self.colors[self.rng.next_index(self.colors.len())];
            if self.opts.smooth {
                cell.progress = 0.0;
            } else {
                cell.color = cell.target;
                cell.progress = 1.0;
            }
        }
    }

    fn advance_transitions(&mut self) {
        for cell in &mut self.cells {
            if cell.progress < 1.0 {
                cell.progress = (cell.progress + 0.05).min(1.0);
                let t = cell.progress;
                cell.color = Rgb::new(
                    cell.color.r + (cell.target.r - cell.color.r) * t,
                    cell.color.g + (cell.target.g - cell.color.g) * t,
                    cell.color.b + (cell.target.b - cell.color.b) * t,
                );
            }
        }
    }

    fn draw_glyphs(&mut self, surface: &mut Surface) -> GlimtResult<()> {
        let Some(font) = self.font.clone() else {
            return self.draw_blocks(surface);
        };

        let mut scene = Scene::new(surface.width(), surface.height())?;
        for (i, cell) in self.cells.iter().enumerate() {
            let x = (i as u32 % self.columns * CHAR_WIDTH) as f64;
            let y = (i as u32 / self.columns * CHAR_HEIGHT) as f64;
            let layout = match self.glyph_cache.entry(cell.char_idx) {
                std::collections::hash_map::Entry::Occupied(e) => e.into_mut(),
                std::collections::hash_map::Entry::Vacant(e) => {
                    let mut buf = [0u8; 4];
                    let text = self.charset[cell.char_idx].encode_utf8(&mut buf);
                    let layout = self.shaper.layout_plain(
                        text,
                        &font,
                        FONT_SIZE,
                        GlyphBrush::default(),
                    )?;
                    e.insert(layout)
                }
            };
            scene.draw_layout(
                layout,
                &font,
                Affine::translate((x, y)),
                Some(cell.color.to_rgba8(255)),
            );
        }
        scene.composite_over(surface)
    }

    // Block fallback: each cell as a solid slab, slightly inset so the
    // grid still reads.
    fn draw_blocks(&mut self, surface: &mut Surface) -> GlimtResult<()> {
        let w = surface.width();
        let h = surface.height();
        for (i, cell) in self.cells.iter().enumerate() {
            let cx = i as u32 % self.columns * CHAR_WIDTH;
            let cy = i as u32 / self.columns * CHAR_HEIGHT;
            let color = cell.color.to_rgba8(255);
            for y in (cy + 3)..(cy + CHAR_HEIGHT - 3).min(h) {
                for x in (cx + 1)..(cx + CHAR_WIDTH - 1).min(w) {
                    surface.put(x, y, color);
                }
            }
        }
        Ok(())
    }
}

impl Widget for LetterGlitch {
    fn name(&self) -> &'static str {
        "letter_glitch"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        if self.cells.is_empty() {
            self.init_cells(surface.width(), surface.height());
        }

        let glitch_interval = self.opts.glitch_speed_ms as f64 / 1000.0;
        if ctx.frame.0 == 0 || ctx.time_s - self.last_glitch_s >= glitch_interval {
            self.glitch_tick();
            self.last_glitch_s = ctx.time_s;
        }
        if self.opts.smooth {
            self.advance_transitions();
        }

        surface.clear(Rgba8::BLACK);
        self.draw_glyphs(surface)?;

        if self.opts.outer_vignette {
            apply_vignette(surface, VignetteKind::Outer);
        }
        if self.opts.center_vignette {
            apply_vignette(surface, VignetteKind::Center);
        }
        Ok(())
    }

    fn resized(&mut self, width: u32, height: u32) {
        self.init_cells(width, height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    fn glitch(seed: u64) -> LetterGlitch {
        LetterGlitch::new(LetterGlitchOpts {
            seed,
            ..Default::default()
        })
        .unwrap()
    }

    #[test]
    fn empty_color_list_is_rejected() {
        let opts = LetterGlitchOpts {
            glitch_colors: vec![],
            ..Default::default()
        };
        assert!(LetterGlitch::new(opts).is_err());
    }

    #[test]
    fn grid_covers_the_surface() {
        let mut w = glitch(1);
        w.resized(95, 41);
        assert_eq!(w.columns, 10);
        assert_eq!(w.rows, 3);
        assert_eq!(w.cells.len(), 30);
    }

    #[test]
    fn same_seed_renders_identically() {
        let ctx = FrameCtx::new(FrameIndex(0), Fps::display_refresh(), None);
        let mut a = Surface::new(SurfaceSize::new(40, 40).unwrap());
        let mut b = Surface::new(SurfaceSize::new(40, 40).unwrap());
        glitch(7).render(&ctx, &mut a).unwrap();
        glitch(7).render(&ctx, &mut b).unwrap();
        assert_eq!(a.data(), b.data());
    }

    #[test]
    fn glitch_tick_changes_some_cells() {
        let mut w = glitch(3);
        w.resized(200, 200);
        let before: Vec<usize> = w.cells.iter().map(|c| c.char_idx).collect();
        w.glitch_tick();
        let after: Vec<usize> = w.cells.iter().map(|c| c.char_idx).collect();
        assert_ne!(before, after);
        let changed = before
            .iter()
            .zip(&after)
            .filter(|(a, b)| a != b)
            .count();
        assert!(changed <= (w.cells.len() / 50).max(1) + 1);
    }

    #[test]
    fn smooth_transitions_reach_target() {
        let mut w = glitch(5);
        w.resized(40, 40);
        w.cells[0].progress = 0.0;
        w.cells[0].color = Rgb::new(0.0, 0.0, 0.0);
        w.cells[0].target = Rgb::new(1.0, 1.0, 1.0);
        for _ in 0..40 {
            w.advance_transitions();
        }
        assert!((w.cells[0].color.r - 1.0).abs() < 1e-3);
        assert!((w.cells[0].progress - 1.0).abs() < 1e-6);
    }
}
