//! Click particle burst: each press spawns evenly-spaced sparks that fly
//! outward, shrink, and expire. The surface stays transparent between
//! sparks so the widget works as an overlay accent.

use serde::{Deserialize, Serialize};

use crate::foundation::core::{Affine, BezPath, Point, Rgb};
use crate::foundation::ease::Ease;
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::raster::Scene;
use crate::surface::Surface;
use crate::widget::{FrameCtx, PointerState, Widget};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SparkEasing {
    Linear,
    EaseIn,
    EaseInOut,
    #[default]
    EaseOut,
}

impl SparkEasing {
    fn ease(self) -> Ease {
        match self {
            SparkEasing::Linear => Ease::Linear,
            SparkEasing::EaseIn => Ease::InQuad,
            SparkEasing::EaseInOut => Ease::InOutQuad,
            SparkEasing::EaseOut => Ease::OutQuad,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClickSparkOpts {
    pub spark_color: String,
    pub spark_size: f64,
    pub spark_radius: f64,
    pub spark_count: u32,
    pub duration_ms: f64,
    pub easing: SparkEasing,
    pub extra_scale: f64,
}

impl Default for ClickSparkOpts {
    fn default() -> Self {
        Self {
            spark_color: "#ffffff".to_string(),
            spark_size: 10.0,
            spark_radius: 15.0,
            spark_count: 8,
            duration_ms: 400.0,
            easing: SparkEasing::EaseOut,
            extra_scale: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug)]
struct Spark {
    x: f64,
    y: f64,
    angle: f64,
    start_s: f64,
}

pub struct ClickSpark {
    opts: ClickSparkOpts,
    color: Rgb,
    sparks: Vec<Spark>,
}

impl ClickSpark {
    pub fn new(opts: ClickSparkOpts) -> GlimtResult<Self> {
        if opts.spark_count == 0 {
            return Err(GlimtError::validation("spark_count must be non-zero"));
        }
        if !(opts.duration_ms.is_finite() && opts.duration_ms > 0.0) {
            return Err(GlimtError::validation(
                "duration_ms must be finite and > 0",
            ));
        }
        let color = Rgb::from_hex(&opts.spark_color)?;
        Ok(Self {
            opts,
            color,
            sparks: Vec::new(),
        })
    }

    pub fn live_sparks(&self) -> usize {
        self.sparks.len()
    }
}

impl Widget for ClickSpark {
    fn name(&self) -> &'static str {
        "click_spark"
    }

    fn render(&mut self, ctx: &FrameCtx, surface: &mut Surface) -> GlimtResult<()> {
        let duration_s = self.opts.duration_ms / 1000.0;
        let now = ctx.time_s;
        self.sparks.retain(|s| now - s.start_s < duration_s);
        if self.sparks.is_empty() {
            return Ok(());
        }

        let mut scene = Scene::new(surface.width(), surface.height())?;
        let color = self.color.to_rgba8(255);
        let ease = self.opts.easing.ease();
        for spark in &self.sparks {
            let progress = (now - spark.start_s) / duration_s;
            let eased = ease.apply(progress);

            let distance = eased * self.opts.spark_radius * self.opts.extra_scale;
            let line_length = self.opts.spark_size * (1.0 - eased);

            let (sin, cos) = spark.angle.sin_cos();
            let x1 = spark.x + distance * cos;
            let y1 = spark.y + distance * sin;
            let x2 = spark.x + (distance + line_length) * cos;
            let y2 = spark.y + (distance + line_length) * sin;

            scene.fill_path(&segment_quad(x1, y1, x2, y2, 2.0), Affine::IDENTITY, color);
        }
        scene.composite_over(surface)
    }

    fn pointer_pressed(&mut self, pointer: PointerState, time_s: f64) {
        let count = self.opts.spark_count;
        for i in 0..count {
            self.sparks.push(Spark {
                x: pointer.px,
                y: pointer.py,
                angle: std::f64::consts::TAU * f64::from(i) / f64::from(count),
                start_s: time_s,
            });
        }
    }
}

// A stroked line as a filled quad of the given width.
fn segment_quad(x1: f64, y1: f64, x2: f64, y2: f64, width: f64) -> BezPath {
    let dx = x2 - x1;
    let dy = y2 - y1;
    let len = (dx * dx + dy * dy).sqrt().max(1e-9);
    let nx = -dy / len * width * 0.5;
    let ny = dx / len * width * 0.5;

    let mut path = BezPath::new();
    path.move_to(Point::new(x1 + nx, y1 + ny));
    path.line_to(Point::new(x2 + nx, y2 + ny));
    path.line_to(Point::new(x2 - nx, y2 - ny));
    path.line_to(Point::new(x1 - nx, y1 - ny));
    path.close_path();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::{Fps, FrameIndex, SurfaceSize};

    fn press(w: &mut ClickSpark, x: f64, y: f64, t: f64) {
        w.pointer_pressed(
            PointerState {
                px: x,
                py: y,
                nx: 0.5,
                ny: 0.5,
            },
            t,
        );
    }

    #[test]
    fn press_spawns_spark_count_sparks() {
        let mut w = ClickSpark::new(ClickSparkOpts::default()).unwrap();
        press(&mut w, 20.0, 20.0, 0.0);
        assert_eq!(w.live_sparks(), 8);
    }

    #[test]
    fn sparks_expire_after_duration() {
        let mut w = ClickSpark::new(ClickSparkOpts::default()).unwrap();
        press(&mut w, 20.0, 20.0, 0.0);

        let fps = Fps::display_refresh();
        let mut s = Surface::new(SurfaceSize::new(40, 40).unwrap());
        // 0.4 s at 60 fps is 24 frames; frame 30 is past expiry.
        w.render(&FrameCtx::new(FrameIndex(30), fps, None), &mut s)
            .unwrap();
        assert_eq!(w.live_sparks(), 0);
        assert!(s.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn live_sparks_leave_pixels() {
        let mut w = ClickSpark::new(ClickSparkOpts::default()).unwrap();
        press(&mut w, 20.0, 20.0, 0.0);
        let mut s = Surface::new(SurfaceSize::new(40, 40).unwrap());
        w.render(
            &FrameCtx::new(FrameIndex(6), Fps::display_refresh(), None),
            &mut s,
        )
        .unwrap();
        assert!(s.data().chunks_exact(4).any(|px| px[3] > 0));
    }

    #[test]
    fn zero_spark_count_is_rejected() {
        let opts = ClickSparkOpts {
            spark_count: 0,
            ..Default::default()
        };
        assert!(ClickSpark::new(opts).is_err());
    }

    #[test]
    fn segment_quad_is_closed_with_four_corners() {
        let p = segment_quad(0.0, 0.0, 10.0, 0.0, 2.0);
        assert_eq!(p.elements().len(), 5);
    }
}
