//! Horizontal card navigation: categories flatten into one row of items,
//! each with a liquid-metal dot and a title. Pressing an item records its
//! page id for the host to pick up.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, Rect, Rgb, Rgba8};
use crate::foundation::error::GlimtResult;
use crate::raster::{GlyphBrush, LoadedFont, Scene, TextShaper};
use crate::surface::Surface;
use crate::widget::{FrameCtx, PointerState, Widget};
use crate::widgets::metallic_paint::{MaskImage, MetallicPaint, MetallicParams};

const ITEM_HEIGHT: f64 = 48.0;
const DOT_SIZE: u32 = 24;
const OUTER_PAD: f64 = 12.0;
const ITEM_PAD: f64 = 12.0;
const DOT_GAP: f64 = 8.0;
const ITEM_GAP: f64 = 10.0;
const TITLE_SIZE: f32 = 16.0;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NavSection {
    pub title: String,
    pub page_id: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct NavCategory {
    pub label: String,
    pub sections: Vec<NavSection>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CardNavOpts {
    pub categories: Vec<NavCategory>,
    pub text_color: String,
    pub card_color: String,
    pub font_path: Option<PathBuf>,
}

impl Default for CardNavOpts {
    fn default() -> Self {
        Self {
            categories: Vec::new(),
            text_color: "#ffffff".to_string(),
            card_color: "#131313".to_string(),
            font_path: None,
        }
    }
}

struct NavItem {
    page_id: String,
    title_width: f64,
    layout: Option<parley::Layout<GlyphBrush>>,
    dot: MetallicPaint,
}

impl NavItem {
    fn width(&self) -> f64 {
        ITEM_PAD + f64::from(DOT_SIZE) + DOT_GAP + self.title_width + ITEM_PAD
    }
}

pub struct CardNav {
    items: Vec<NavItem>,
    font: Option<LoadedFont>,
    text_color: Rgb,
    card_color: Rgb,
    width: u32,
    height: u32,
    activated: Option<String>,
}

// Every dot runs the same thick-liquid preset regardless of the widget's
// own MetallicPaint defaults.
fn dot_params() -> MetallicParams {
    MetallicParams {
        pattern_scale: 0.8,
        refraction: 0.12,
        edge: 0.6,
        pattern_blur: 0.001,
        liquid: 0.25,
        speed: 0.3,
    }
}

impl CardNav {
    pub fn new(opts: CardNavOpts) -> GlimtResult<Self> {
        let text_color = Rgb::from_hex(&opts.text_color)?;
        let card_color = Rgb::from_hex(&opts.card_color)?;
        let font = match &opts.font_path {
            Some(path) => Some(LoadedFont::from_path(path)?),
            None => None,
        };

        let mut shaper = TextShaper::new();
        let brush = GlyphBrush::from(text_color.to_rgba8(255));
        let mut items = Vec::new();
        for section in opts.categories.iter().flat_map(|c| c.sections.iter()) {
            let (layout, title_width) = match &font {
                Some(f) => {
                    let layout = shaper.layout_plain(&section.title, f, TITLE_SIZE, brush)?;
                    let w = f64::from(layout.width());
                    (Some(layout), w)
                }
                // No font: estimate from character count so items still
                // get proportional widths.
                None => (
                    None,
                    section.title.chars().count() as f64 * f64::from(TITLE_SIZE) * 0.55,
                ),
            };
            items.push(NavItem {
                page_id: section.page_id.clone(),
                title_width,
                layout,
                dot: MetallicPaint::with_mask(MaskImage::disc(64)?, dot_params()),
            });
        }

        Ok(Self {
            items,
            font,
            text_color,
            card_color,
            width: 0,
            height: 0,
            activated: None,
        })
    }

    /// Page id of the most recently pressed item, consumed on read.
    pub fn take_activated(&mut self) -> Option<String> {
        self.activated.take()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    fn row_top(&self) -> f64 {
        (f64::from(self.height) - ITEM_HEIGHT).max(0.0) * 0.5
    }

    /// Left x of each item in row order.
    fn item_lefts(&self) -> Vec<f64> {
        let mut lefts = Vec::with_capacity(self.items.len());
        let mut x = OUTER_PAD;
        for item in &self.items {
            lefts.push(x);
            x += item.width() + ITEM_GAP;
        }
        lefts
    }

    fn hit_test(&self, px: f64, py: f64) -> Option<usize> {
        let y0 = self.row_top();
        if py < y0 || py >= y0 + ITEM_HEIGHT {
            return None;
        }
        for (i, (item, left)) in self.items.iter().zip(self.item_lefts()).enumerate() {
            if px >= left && px < left + item.width() {
                return Some(i);
            }
        }
        None
    }
}

impl Widget for CardNav {
    fn name(&self) -> &'static str {
        "card_nav"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        self.width = surface.width();
        self.height = surface.height();
        if self.items.is_empty() {
            return Ok(());
        }

        let y0 = self.row_top();
        let lefts = self.item_lefts();
        let card = self.card_color.to_rgba8(235);
        let text = self.text_color.to_rgba8(255);

        let mut scene = Scene::new(surface.width(), surface.height())?;
        for (item, left) in self.items.iter().zip(&lefts) {
            scene.fill_rect(
                Rect::new(*left, y0, left + item.width(), y0 + ITEM_HEIGHT),
                Affine::IDENTITY,
                card,
            );

            let text_x = left + ITEM_PAD + f64::from(DOT_SIZE) + DOT_GAP;
            match (&item.layout, &self.font) {
                (Some(layout), Some(font)) => {
                    let text_y = y0 + (ITEM_HEIGHT - f64::from(TITLE_SIZE)) * 0.5;
                    scene.draw_layout(layout, font, Affine::translate((text_x, text_y)), None);
                }
                // Placeholder bar where the title would sit.
                _ => {
                    let bar_y = y0 + ITEM_HEIGHT * 0.5 - 1.5;
                    scene.fill_rect(
                        Rect::new(text_x, bar_y, text_x + item.title_width, bar_y + 3.0),
                        Affine::IDENTITY,
                        Rgba8::new(text.r, text.g, text.b, 140),
                    );
                }
            }
        }
        scene.composite_over(surface)?;

        // Dots go on top of the cards.
        let dot_y = (y0 + (ITEM_HEIGHT - f64::from(DOT_SIZE)) * 0.5).round() as u32;
        for (item, left) in self.items.iter().zip(&lefts) {
            let dot_x = (left + ITEM_PAD).round() as u32;
            item.dot
                .render_into(surface, dot_x, dot_y, DOT_SIZE, DOT_SIZE, ctx.time_s);
        }
        Ok(())
    }

    fn resized(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }

    fn pointer_pressed(&mut self, pointer: PointerState, _time_s: f64) {
        if let Some(i) = self.hit_test(pointer.px, pointer.py) {
            self.activated = Some(self.items[i].page_id.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    fn nav(titles: &[(&str, &str)]) -> CardNav {
        let opts = CardNavOpts {
            categories: vec![NavCategory {
                label: "main".to_string(),
                sections: titles
                    .iter()
                    .map(|(t, p)| NavSection {
                        title: (*t).to_string(),
                        page_id: (*p).to_string(),
                    })
                    .collect(),
            }],
            ..Default::default()
        };
        CardNav::new(opts).unwrap()
    }

    #[test]
    fn categories_flatten_into_one_row() {
        let opts = CardNavOpts {
            categories: vec![
                NavCategory {
                    label: "a".to_string(),
                    sections: vec![NavSection {
                        title: "Home".to_string(),
                        page_id: "home".to_string(),
                    }],
                },
                NavCategory {
                    label: "b".to_string(),
                    sections: vec![
                        NavSection {
                            title: "Docs".to_string(),
                            page_id: "docs".to_string(),
                        },
                        NavSection {
                            title: "About".to_string(),
                            page_id: "about".to_string(),
                        },
                    ],
                },
            ],
            ..Default::default()
        };
        let nav = CardNav::new(opts).unwrap();
        assert_eq!(nav.item_count(), 3);
    }

    #[test]
    fn empty_nav_renders_nothing() {
        let mut nav = CardNav::new(CardNavOpts::default()).unwrap();
        let mut s = Surface::new(SurfaceSize::new(200, 80).unwrap());
        nav.render(
            &FrameCtx::new(FrameIndex(0), Fps::display_refresh(), None),
            &mut s,
        )
        .unwrap();
        assert!(s.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn press_on_item_records_page_id_once() {
        let mut nav = nav(&[("Home", "home"), ("Docs", "docs")]);
        nav.resized(400, 80);

        // First item starts at OUTER_PAD; press inside it.
        nav.pointer_pressed(
            PointerState {
                px: OUTER_PAD + 5.0,
                py: 40.0,
                nx: 0.0,
                ny: 0.5,
            },
            0.0,
        );
        assert_eq!(nav.take_activated().as_deref(), Some("home"));
        assert_eq!(nav.take_activated(), None);
    }

    #[test]
    fn press_outside_row_activates_nothing() {
        let mut nav = nav(&[("Home", "home")]);
        nav.resized(400, 80);
        nav.pointer_pressed(
            PointerState {
                px: 20.0,
                py: 2.0,
                nx: 0.05,
                ny: 0.025,
            },
            0.0,
        );
        assert_eq!(nav.take_activated(), None);
    }

    #[test]
    fn second_item_hit_uses_measured_widths() {
        let nav = nav(&[("Home", "home"), ("Docs", "docs")]);
        let lefts = nav.item_lefts();
        assert_eq!(lefts.len(), 2);
        assert!(lefts[1] > lefts[0] + ITEM_PAD * 2.0 + f64::from(DOT_SIZE));
    }

    #[test]
    fn render_paints_cards_and_dots() {
        let mut nav = nav(&[("Home", "home")]);
        let mut s = Surface::new(SurfaceSize::new(300, 80).unwrap());
        nav.render(
            &FrameCtx::new(FrameIndex(3), Fps::display_refresh(), None),
            &mut s,
        )
        .unwrap();
        assert!(s.data().chunks_exact(4).any(|px| px[3] > 0));
    }
}
