//! Player lifecycle: owns a widget, its surface, and the frame clock.

use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, FrameRange, Rgba8};
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::surface::{Surface, SurfaceOpts};
use crate::widget::{FrameCtx, PointerState, Widget};

/// Drives a widget's animation on a deterministic frame clock.
///
/// Time never comes from the wall clock: `tick` renders the current frame
/// index and advances by one, so a paused player resumes exactly where it
/// stopped and replays are pixel-identical.
pub struct Player {
    widget: Box<dyn Widget>,
    surface: Surface,
    opts: SurfaceOpts,
    fps: Fps,
    frame: FrameIndex,
    paused: bool,
    pointer: Option<PointerState>,
}

impl Player {
    /// Create a player at frame 0 with a freshly allocated surface.
    pub fn new(widget: Box<dyn Widget>, opts: SurfaceOpts, fps: Fps) -> GlimtResult<Self> {
        let size = opts.physical_size()?;
        let mut player = Self {
            widget,
            surface: Surface::new(size),
            opts,
            fps,
            frame: FrameIndex(0),
            paused: false,
            pointer: None,
        };
        player
            .widget
            .resized(player.surface.width(), player.surface.height());
        Ok(player)
    }

    pub fn fps(&self) -> Fps {
        self.fps
    }

    pub fn frame(&self) -> FrameIndex {
        self.frame
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn surface(&self) -> &Surface {
        &self.surface
    }

    pub fn widget(&self) -> &dyn Widget {
        self.widget.as_ref()
    }

    pub fn widget_mut(&mut self) -> &mut dyn Widget {
        self.widget.as_mut()
    }

    /// Stop advancing. Idempotent.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume from the frame where `pause` stopped. Idempotent.
    pub fn resume(&mut self) {
        self.paused = false;
    }

    /// Render the current frame and advance the clock by one.
    ///
    /// Returns `true` when a frame was rendered; a paused player does
    /// nothing and returns `false`, leaving the surface untouched.
    pub fn tick(&mut self) -> GlimtResult<bool> {
        if self.paused {
            return Ok(false);
        }
        let frame = self.frame;
        self.render_frame(frame)?;
        self.frame = FrameIndex(frame.0 + 1);
        Ok(true)
    }

    /// Render one specific frame into the surface without moving the clock.
    #[tracing::instrument(skip(self), fields(widget = self.widget.name(), frame = frame.0))]
    pub fn render_frame(&mut self, frame: FrameIndex) -> GlimtResult<()> {
        let ctx = FrameCtx::new(frame, self.fps, self.pointer);
        self.surface.clear(Rgba8::TRANSPARENT);
        self.widget.render(&ctx, &mut self.surface)
    }

    /// Re-validate the surface options with new logical dimensions and
    /// reallocate the surface. The widget is notified after the resize.
    pub fn resize(&mut self, logical_width: u32, logical_height: u32) -> GlimtResult<()> {
        self.opts.width = logical_width;
        self.opts.height = logical_height;
        let size = self.opts.physical_size()?;
        self.surface.resize(size);
        self.widget.resized(size.width, size.height);
        if let Some(p) = self.pointer {
            self.pointer = Some(PointerState::from_pixels(
                p.px, p.py, size.width, size.height,
            ));
        }
        Ok(())
    }

    /// Report a pointer move in physical surface pixels.
    pub fn pointer_moved(&mut self, px: f64, py: f64) {
        let state =
            PointerState::from_pixels(px, py, self.surface.width(), self.surface.height());
        self.pointer = Some(state);
        self.widget.pointer_moved(state);
    }

    /// Report a pointer press in physical surface pixels.
    pub fn pointer_pressed(&mut self, px: f64, py: f64) {
        let state =
            PointerState::from_pixels(px, py, self.surface.width(), self.surface.height());
        self.pointer = Some(state);
        let time_s = self.fps.frames_to_secs(self.frame.0);
        self.widget.pointer_pressed(state, time_s);
    }

    /// Render a frame range into a sink in strictly increasing order.
    ///
    /// The player's own clock is left unchanged.
    pub fn render_range(
        &mut self,
        range: FrameRange,
        sink: &mut dyn FrameSink,
    ) -> GlimtResult<()> {
        if range.is_empty() {
            return Err(GlimtError::validation("render range must be non-empty"));
        }
        sink.begin(SinkConfig {
            width: self.surface.width(),
            height: self.surface.height(),
            fps: self.fps,
        })?;
        for idx in range.start.0..range.end.0 {
            let frame = FrameIndex(idx);
            self.render_frame(frame)?;
            sink.push_frame(frame, &self.surface.frame())?;
        }
        sink.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::sink::InMemorySink;
    use crate::widget::build_widget;
    use crate::widget::WidgetKind;

    fn test_player() -> Player {
        let widget = build_widget(WidgetKind::Plasma, serde_json::Value::Null).unwrap();
        let opts = SurfaceOpts::logical(32, 24);
        Player::new(widget, opts, Fps::new(60, 1).unwrap()).unwrap()
    }

    #[test]
    fn tick_advances_clock() {
        let mut p = test_player();
        assert_eq!(p.frame(), FrameIndex(0));
        assert!(p.tick().unwrap());
        assert!(p.tick().unwrap());
        assert_eq!(p.frame(), FrameIndex(2));
    }

    #[test]
    fn pause_freezes_clock_and_resume_continues() {
        let mut p = test_player();
        p.tick().unwrap();
        p.pause();
        p.pause();
        assert!(!p.tick().unwrap());
        assert!(!p.tick().unwrap());
        assert_eq!(p.frame(), FrameIndex(1));
        p.resume();
        assert!(p.tick().unwrap());
        assert_eq!(p.frame(), FrameIndex(2));
    }

    #[test]
    fn resize_reallocates_surface() {
        let mut p = test_player();
        p.resize(64, 48).unwrap();
        assert_eq!(p.surface().width(), 64);
        assert_eq!(p.surface().height(), 48);
        assert!(p.resize(0, 48).is_err());
    }

    #[test]
    fn render_is_deterministic_per_frame() {
        let mut a = test_player();
        let mut b = test_player();
        a.render_frame(FrameIndex(7)).unwrap();
        b.render_frame(FrameIndex(7)).unwrap();
        assert_eq!(a.surface().data(), b.surface().data());
    }

    #[test]
    fn render_range_pushes_strictly_increasing_frames() {
        let mut p = test_player();
        let mut sink = InMemorySink::new();
        let range = FrameRange::new(FrameIndex(3), FrameIndex(7)).unwrap();
        p.render_range(range, &mut sink).unwrap();
        let idxs: Vec<u64> = sink.frames().iter().map(|(i, _)| i.0).collect();
        assert_eq!(idxs, vec![3, 4, 5, 6]);
        assert_eq!(p.frame(), FrameIndex(0));
    }

    #[test]
    fn render_range_rejects_empty() {
        let mut p = test_player();
        let mut sink = InMemorySink::new();
        let r = FrameRange::new(FrameIndex(5), FrameIndex(5)).unwrap();
        assert!(p.render_range(r, &mut sink).is_err());
    }
}
