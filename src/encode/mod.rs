//! Frame sinks: stream rendered frames to memory, PNG files, or ffmpeg.

pub mod ffmpeg;
pub mod png_dir;
pub mod sink;

pub use ffmpeg::{FfmpegSink, FfmpegSinkOpts};
pub use png_dir::PngDirSink;
pub use sink::{FrameSink, InMemorySink, SinkConfig};
