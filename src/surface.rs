use crate::foundation::core::{Rgba8, SurfaceSize};
use crate::foundation::error::{GlimtError, GlimtResult};

/// How a widget's surface is sized from its container's bounding box.
///
/// Physical pixel size per axis is `max(1, floor(logical * dpr * scale))`.
/// The originals clamp device-pixel-ratio to 2 and render the heavier
/// widgets at 75% resolution; both knobs live here instead of per widget.
#[derive(Clone, Copy, Debug, serde::Serialize, serde::Deserialize)]
pub struct SurfaceOpts {
    /// Logical container width in CSS-pixel terms.
    pub width: u32,
    /// Logical container height.
    pub height: u32,
    /// Device pixel ratio, clamped into [1, 2].
    #[serde(default = "default_dpr")]
    pub dpr: f64,
    /// Resolution scale in (0, 1].
    #[serde(default = "default_scale")]
    pub scale: f64,
}

fn default_dpr() -> f64 {
    1.0
}

fn default_scale() -> f64 {
    1.0
}

impl SurfaceOpts {
    /// Options for a logical size at dpr 1 and full resolution.
    pub fn logical(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            dpr: 1.0,
            scale: 1.0,
        }
    }

    /// Validate and compute the physical pixel size.
    pub fn physical_size(&self) -> GlimtResult<SurfaceSize> {
        if self.width == 0 || self.height == 0 {
            return Err(GlimtError::validation(
                "surface logical width/height must be non-zero",
            ));
        }
        if !self.dpr.is_finite() || self.dpr <= 0.0 {
            return Err(GlimtError::validation("surface dpr must be finite and > 0"));
        }
        if !self.scale.is_finite() || self.scale <= 0.0 || self.scale > 1.0 {
            return Err(GlimtError::validation("surface scale must be in (0, 1]"));
        }

        let dpr = self.dpr.clamp(1.0, 2.0);
        let px = |logical: u32| -> u32 { ((f64::from(logical) * dpr * self.scale).floor() as u32).max(1) };
        SurfaceSize::new(px(self.width), px(self.height))
    }
}

/// A rendered frame as straight-alpha RGBA8 pixels.
#[derive(Clone, Debug)]
pub struct FrameRgba {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// RGBA8 bytes, tightly packed, row-major.
    pub data: Vec<u8>,
    /// Whether `data` is premultiplied alpha. Widget surfaces are straight.
    pub premultiplied: bool,
}

/// The RGBA8 pixel buffer a widget owns exclusively.
///
/// Pixels are straight alpha; compositing helpers in [`crate::composite`]
/// convert where premultiplied math is needed.
#[derive(Clone, Debug)]
pub struct Surface {
    size: SurfaceSize,
    data: Vec<u8>,
}

impl Surface {
    /// Allocate a transparent surface of the given size.
    pub fn new(size: SurfaceSize) -> Self {
        Self {
            size,
            data: vec![0u8; (size.area() * 4) as usize],
        }
    }

    /// Current pixel dimensions.
    pub fn size(&self) -> SurfaceSize {
        self.size
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.size.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.size.height
    }

    /// Reallocate for a new size. Contents are cleared to transparent.
    /// A same-size resize is a no-op that preserves pixels.
    pub fn resize(&mut self, size: SurfaceSize) {
        if size == self.size {
            return;
        }
        self.size = size;
        self.data.clear();
        self.data.resize((size.area() * 4) as usize, 0);
    }

    /// Fill every pixel with one color.
    pub fn clear(&mut self, color: Rgba8) {
        for px in self.data.chunks_exact_mut(4) {
            px.copy_from_slice(&[color.r, color.g, color.b, color.a]);
        }
    }

    /// Run a per-pixel shader over the whole surface.
    ///
    /// The closure receives pixel coordinates with `(0, 0)` at the top-left,
    /// matching canvas conventions; shaders that want GL-style bottom-left
    /// flip `y` themselves.
    pub fn fill_with(&mut self, mut shader: impl FnMut(u32, u32) -> Rgba8) {
        let width = self.size.width;
        for (i, px) in self.data.chunks_exact_mut(4).enumerate() {
            let x = (i as u32) % width;
            let y = (i as u32) / width;
            let c = shader(x, y);
            px.copy_from_slice(&[c.r, c.g, c.b, c.a]);
        }
    }

    /// Write one pixel, ignoring out-of-bounds coordinates.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba8) {
        if x >= self.size.width || y >= self.size.height {
            return;
        }
        let i = ((y * self.size.width + x) * 4) as usize;
        self.data[i..i + 4].copy_from_slice(&[color.r, color.g, color.b, color.a]);
    }

    /// Read one pixel. Out-of-bounds reads return transparent.
    pub fn get(&self, x: u32, y: u32) -> Rgba8 {
        if x >= self.size.width || y >= self.size.height {
            return Rgba8::TRANSPARENT;
        }
        let i = ((y * self.size.width + x) * 4) as usize;
        Rgba8::new(
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        )
    }

    /// Borrow the raw RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutably borrow the raw RGBA8 bytes.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Copy out the current contents as a frame.
    pub fn frame(&self) -> FrameRgba {
        FrameRgba {
            width: self.size.width,
            height: self.size.height,
            data: self.data.clone(),
            premultiplied: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn physical_size_applies_dpr_and_scale() {
        let opts = SurfaceOpts {
            width: 100,
            height: 50,
            dpr: 2.0,
            scale: 0.75,
        };
        let size = opts.physical_size().unwrap();
        assert_eq!((size.width, size.height), (150, 75));
    }

    #[test]
    fn physical_size_clamps_dpr_and_floors_to_one() {
        let opts = SurfaceOpts {
            width: 1,
            height: 1,
            dpr: 3.5, // clamped to 2
            scale: 0.1,
        };
        let size = opts.physical_size().unwrap();
        assert_eq!((size.width, size.height), (1, 1));
    }

    #[test]
    fn physical_size_rejects_bad_inputs() {
        assert!(SurfaceOpts::logical(0, 10).physical_size().is_err());
        let mut opts = SurfaceOpts::logical(10, 10);
        opts.scale = 0.0;
        assert!(opts.physical_size().is_err());
        opts.scale = 1.5;
        assert!(opts.physical_size().is_err());
        opts.scale = 1.0;
        opts.dpr = f64::NAN;
        assert!(opts.physical_size().is_err());
    }

    #[test]
    fn fill_with_visits_every_pixel_in_row_major_order() {
        let mut s = Surface::new(SurfaceSize::new(3, 2).unwrap());
        let mut seen = Vec::new();
        s.fill_with(|x, y| {
            seen.push((x, y));
            Rgba8::new(x as u8, y as u8, 0, 255)
        });
        assert_eq!(seen.len(), 6);
        assert_eq!(seen[0], (0, 0));
        assert_eq!(seen[3], (0, 1));
        assert_eq!(s.get(2, 1), Rgba8::new(2, 1, 0, 255));
    }

    #[test]
    fn resize_same_size_preserves_pixels() {
        let size = SurfaceSize::new(4, 4).unwrap();
        let mut s = Surface::new(size);
        s.put(1, 1, Rgba8::new(9, 9, 9, 255));
        s.resize(size);
        assert_eq!(s.get(1, 1), Rgba8::new(9, 9, 9, 255));

        s.resize(SurfaceSize::new(2, 2).unwrap());
        assert_eq!(s.get(1, 1), Rgba8::TRANSPARENT);
    }

    #[test]
    fn out_of_bounds_access_is_harmless() {
        let mut s = Surface::new(SurfaceSize::new(2, 2).unwrap());
        s.put(5, 5, Rgba8::BLACK);
        assert_eq!(s.get(5, 5), Rgba8::TRANSPARENT);
    }
}
