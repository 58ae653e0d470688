use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{GlimtError, GlimtResult};
use crate::surface::FrameRgba;
use std::path::PathBuf;

/// Sink that writes each frame as `frame_NNNNN.png` into a directory.
///
/// Alpha is preserved, so transparent widget backgrounds stay transparent
/// in the output files.
pub struct PngDirSink {
    dir: PathBuf,
    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl PngDirSink {
    /// Create a sink writing into `dir`, creating it on `begin`.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cfg: None,
            last_idx: None,
        }
    }
}

impl FrameSink for PngDirSink {
    fn begin(&mut self, cfg: SinkConfig) -> GlimtResult<()> {
        if cfg.width == 0 || cfg.height == 0 {
            return Err(GlimtError::validation(
                "png sink width/height must be non-zero",
            ));
        }
        use anyhow::Context as _;
        std::fs::create_dir_all(&self.dir)
            .with_context(|| format!("failed to create output directory '{}'", self.dir.display()))
            .map_err(GlimtError::Other)?;
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRgba) -> GlimtResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| GlimtError::render("png sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(GlimtError::render(
                "png sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width != cfg.width || frame.height != cfg.height {
            return Err(GlimtError::validation(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width, frame.height, cfg.width, cfg.height
            )));
        }

        let path = self.dir.join(format!("frame_{:05}.png", idx.0));
        image::save_buffer_with_format(
            &path,
            &frame.data,
            frame.width,
            frame.height,
            image::ColorType::Rgba8,
            image::ImageFormat::Png,
        )
        .map_err(|e| GlimtError::render(format!("failed to write '{}': {e}", path.display())))?;
        Ok(())
    }

    fn end(&mut self) -> GlimtResult<()> {
        self.cfg = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::Fps;

    fn cfg() -> SinkConfig {
        SinkConfig {
            width: 2,
            height: 2,
            fps: Fps::new(60, 1).unwrap(),
        }
    }

    fn frame() -> FrameRgba {
        FrameRgba {
            width: 2,
            height: 2,
            data: vec![0u8; 16],
            premultiplied: false,
        }
    }

    #[test]
    fn rejects_push_before_begin() {
        let mut sink = PngDirSink::new(std::env::temp_dir().join("glimt_png_sink_test"));
        assert!(sink.push_frame(FrameIndex(0), &frame()).is_err());
    }

    #[test]
    fn rejects_out_of_order_frames() {
        let dir = std::env::temp_dir().join("glimt_png_sink_order");
        let mut sink = PngDirSink::new(&dir);
        sink.begin(cfg()).unwrap();
        sink.push_frame(FrameIndex(3), &frame()).unwrap();
        assert!(sink.push_frame(FrameIndex(3), &frame()).is_err());
        assert!(sink.push_frame(FrameIndex(1), &frame()).is_err());
        let _ = std::fs::remove_dir_all(&dir);
    }
}
