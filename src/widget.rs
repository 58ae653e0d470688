//! Widget trait, per-frame context, and the kind-string registry.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::surface::Surface;

/// Pointer position over the surface, in both pixel and normalized space.
///
/// Normalized coordinates are 0..1 with the origin at the top-left pixel.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerState {
    pub px: f64,
    pub py: f64,
    pub nx: f64,
    pub ny: f64,
}

impl PointerState {
    pub(crate) fn from_pixels(px: f64, py: f64, width: u32, height: u32) -> Self {
        let w = width.max(1) as f64;
        let h = height.max(1) as f64;
        Self {
            px,
            py,
            nx: (px / w).clamp(0.0, 1.0),
            ny: (py / h).clamp(0.0, 1.0),
        }
    }
}

/// Everything a widget sees for a single frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameCtx {
    pub frame: FrameIndex,
    pub fps: Fps,
    /// Seconds elapsed since frame 0, derived from the frame index.
    pub time_s: f64,
    /// Seconds advanced per frame.
    pub dt_s: f64,
    /// Last reported pointer position, if any.
    pub pointer: Option<PointerState>,
}

impl FrameCtx {
    pub fn new(frame: FrameIndex, fps: Fps, pointer: Option<PointerState>) -> Self {
        Self {
            frame,
            fps,
            time_s: fps.frames_to_secs(frame.0),
            dt_s: fps.frame_duration_secs(),
            pointer,
        }
    }
}

/// An animated visual effect that paints itself onto a surface each frame.
///
/// Widgets are deterministic in `(options, seed, frame)`: rendering the same
/// frame twice produces identical pixels.
pub trait Widget {
    /// Stable kind string, matching the registry.
    fn name(&self) -> &'static str;

    /// Paint the frame. The surface arrives cleared to transparent black.
    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()>;

    /// Called after the surface changed dimensions.
    fn resized(&mut self, _width: u32, _height: u32) {}

    /// Pointer moved over the surface.
    fn pointer_moved(&mut self, _pointer: PointerState) {}

    /// Pointer pressed on the surface.
    fn pointer_pressed(&mut self, _pointer: PointerState, _time_s: f64) {}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WidgetKind {
    FaultyTerminal,
    Plasma,
    LiquidChrome,
    LightRays,
    LetterGlitch,
    MetallicPaint,
    ClickSpark,
    CardNav,
}

impl WidgetKind {
    pub const ALL: [WidgetKind; 8] = [
        WidgetKind::FaultyTerminal,
        WidgetKind::Plasma,
        WidgetKind::LiquidChrome,
        WidgetKind::LightRays,
        WidgetKind::LetterGlitch,
        WidgetKind::MetallicPaint,
        WidgetKind::ClickSpark,
        WidgetKind::CardNav,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WidgetKind::FaultyTerminal => "faulty_terminal",
            WidgetKind::Plasma => "plasma",
            WidgetKind::LiquidChrome => "liquid_chrome",
            WidgetKind::LightRays => "light_rays",
            WidgetKind::LetterGlitch => "letter_glitch",
            WidgetKind::MetallicPaint => "metallic_paint",
            WidgetKind::ClickSpark => "click_spark",
            WidgetKind::CardNav => "card_nav",
        }
    }

    /// Parse a kind string, accepting snake, kebab, and squashed forms.
    pub fn parse(kind: &str) -> GlimtResult<Self> {
        let kind = kind.trim().to_ascii_lowercase();
        if kind.is_empty() {
            return Err(GlimtError::validation("widget kind must be non-empty"));
        }
        match kind.as_str() {
            "faultyterminal" | "faulty_terminal" | "faulty-terminal" => {
                Ok(WidgetKind::FaultyTerminal)
            }
            "plasma" => Ok(WidgetKind::Plasma),
            "liquidchrome" | "liquid_chrome" | "liquid-chrome" => Ok(WidgetKind::LiquidChrome),
            "lightrays" | "light_rays" | "light-rays" => Ok(WidgetKind::LightRays),
            "letterglitch" | "letter_glitch" | "letter-glitch" => Ok(WidgetKind::LetterGlitch),
            "metallicpaint" | "metallic_paint" | "metallic-paint" => Ok(WidgetKind::MetallicPaint),
            "clickspark" | "click_spark" | "click-spark" => Ok(WidgetKind::ClickSpark),
            "cardnav" | "card_nav" | "card-nav" => Ok(WidgetKind::CardNav),
            _ => Err(GlimtError::validation(format!(
                "unknown widget kind '{kind}'"
            ))),
        }
    }
}

/// Build a widget from its kind and a JSON options object.
///
/// Missing fields take the widget's documented defaults; unknown fields are
/// rejected so option typos surface as errors.
pub fn build_widget(
    kind: WidgetKind,
    options: serde_json::Value,
) -> GlimtResult<Box<dyn Widget>> {
    use crate::widgets;

    fn opts<T: serde::de::DeserializeOwned>(v: serde_json::Value) -> GlimtResult<T> {
        serde_json::from_value(v).map_err(|e| GlimtError::serde(format!("widget options: {e}")))
    }

    let options = if options.is_null() {
        serde_json::json!({})
    } else {
        options
    };

    Ok(match kind {
        WidgetKind::FaultyTerminal => {
            Box::new(widgets::faulty_terminal::FaultyTerminal::new(opts(options)?)?)
        }
        WidgetKind::Plasma => Box::new(widgets::plasma::Plasma::new(opts(options)?)?),
        WidgetKind::LiquidChrome => {
            Box::new(widgets::liquid_chrome::LiquidChrome::new(opts(options)?)?)
        }
        WidgetKind::LightRays => Box::new(widgets::light_rays::LightRays::new(opts(options)?)?),
        WidgetKind::LetterGlitch => {
            Box::new(widgets::letter_glitch::LetterGlitch::new(opts(options)?)?)
        }
        WidgetKind::MetallicPaint => {
            Box::new(widgets::metallic_paint::MetallicPaint::new(opts(options)?)?)
        }
        WidgetKind::ClickSpark => Box::new(widgets::click_spark::ClickSpark::new(opts(options)?)?),
        WidgetKind::CardNav => Box::new(widgets::card_nav::CardNav::new(opts(options)?)?),
    })
}
