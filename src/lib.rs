//! Glimt is a collection of animated visual-effect widgets rendered on the CPU.
//!
//! Every widget is deterministic in `(options, seed, frame)`: time is derived
//! from the frame index, never the wall clock, so the same frame always
//! produces the same pixels. The public API is player-oriented:
//!
//! - Build a widget from its kind and JSON options via [`build_widget`]
//! - Create a [`Player`] to drive it frame by frame
//! - Stream frame ranges into a [`FrameSink`] (memory, PNG directory, ffmpeg)
#![forbid(unsafe_code)]

mod foundation;

/// Frame sinks for recording widget output.
pub mod encode;
pub(crate) mod composite;
/// Widget lifecycle driver.
pub mod player;
/// vello_cpu and Parley rasterization helpers.
pub mod raster;
/// Pixel surfaces and sizing.
pub mod surface;
/// The widget contract and kind registry.
pub mod widget;
/// The widget catalogue.
pub mod widgets;

pub use crate::foundation::core::{
    Affine, BezPath, Fps, FrameIndex, FrameRange, Point, Rect, Rgb, Rgba8, SurfaceSize, Vec2,
};
pub use crate::foundation::ease::Ease;
pub use crate::foundation::error::{GlimtError, GlimtResult};

pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use crate::encode::png_dir::PngDirSink;
pub use crate::encode::sink::{FrameSink, InMemorySink, SinkConfig};
pub use crate::player::Player;
pub use crate::surface::{FrameRgba, Surface, SurfaceOpts};
pub use crate::widget::{FrameCtx, PointerState, Widget, WidgetKind, build_widget};
