use crate::foundation::error::{GlimtError, GlimtResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Vec2};

/// Absolute 0-based frame index in a widget's animation timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct FrameIndex(pub u64);

/// Half-open frame range `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// Inclusive range start.
    pub start: FrameIndex,
    /// Exclusive range end.
    pub end: FrameIndex,
}

impl FrameRange {
    /// Create a validated range with `start <= end`.
    pub fn new(start: FrameIndex, end: FrameIndex) -> GlimtResult<Self> {
        if start.0 > end.0 {
            return Err(GlimtError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames contained in the range.
    pub fn len_frames(self) -> u64 {
        self.end.0.saturating_sub(self.start.0)
    }

    /// Return `true` when the range has no frames.
    pub fn is_empty(self) -> bool {
        self.start.0 == self.end.0
    }

    /// Return `true` when `f` is inside `[start, end)`.
    pub fn contains(self, f: FrameIndex) -> bool {
        self.start.0 <= f.0 && f.0 < self.end.0
    }
}

/// Frames-per-second represented as a rational `num/den`.
///
/// The display-refresh default used by widgets is 60/1.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Fps {
    /// Numerator (frames).
    pub num: u32,
    /// Denominator (seconds), must be non-zero.
    pub den: u32,
}

impl Fps {
    /// Create a validated FPS value.
    pub fn new(num: u32, den: u32) -> GlimtResult<Self> {
        if den == 0 {
            return Err(GlimtError::validation("Fps den must be > 0"));
        }
        if num == 0 {
            return Err(GlimtError::validation("Fps num must be > 0"));
        }
        Ok(Self { num, den })
    }

    /// The 60 Hz display-refresh rate every widget animates at by default.
    pub fn display_refresh() -> Self {
        Self { num: 60, den: 1 }
    }

    /// Convert to floating-point FPS.
    pub fn as_f64(self) -> f64 {
        f64::from(self.num) / f64::from(self.den)
    }

    /// Duration of one frame in seconds.
    pub fn frame_duration_secs(self) -> f64 {
        f64::from(self.den) / f64::from(self.num)
    }

    /// Convert frame count to seconds.
    pub fn frames_to_secs(self, frames: u64) -> f64 {
        (frames as f64) * self.frame_duration_secs()
    }

    /// Convert seconds to frame count using floor semantics.
    pub fn secs_to_frames_floor(self, secs: f64) -> u64 {
        (secs * self.as_f64()).floor().max(0.0) as u64
    }
}

/// Surface dimensions in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SurfaceSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl SurfaceSize {
    /// Create a validated non-zero size.
    pub fn new(width: u32, height: u32) -> GlimtResult<Self> {
        if width == 0 || height == 0 {
            return Err(GlimtError::validation(
                "surface width/height must be non-zero",
            ));
        }
        Ok(Self { width, height })
    }

    /// Total pixel count.
    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }
}

/// Linear-range RGB triple in [0, 1] used by shader-style widgets.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: f32,
    /// Green channel.
    pub g: f32,
    /// Blue channel.
    pub b: f32,
}

impl Rgb {
    /// Construct from raw channel values.
    pub fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` or `#rgb` hex color (leading `#` optional).
    ///
    /// Every original widget carried its own copy of this parser; invalid
    /// input here is a validation error rather than a silent fallback.
    pub fn from_hex(hex: &str) -> GlimtResult<Self> {
        let h = hex.trim().trim_start_matches('#');
        let expanded: String = match h.len() {
            3 => h.chars().flat_map(|c| [c, c]).collect(),
            6 => h.to_string(),
            _ => {
                return Err(GlimtError::validation(format!(
                    "invalid hex color '{hex}' (expected #rgb or #rrggbb)"
                )));
            }
        };
        let num = u32::from_str_radix(&expanded, 16)
            .map_err(|_| GlimtError::validation(format!("invalid hex color '{hex}'")))?;
        Ok(Self {
            r: ((num >> 16) & 255) as f32 / 255.0,
            g: ((num >> 8) & 255) as f32 / 255.0,
            b: (num & 255) as f32 / 255.0,
        })
    }

    /// Quantize to straight-alpha RGBA8 with the given alpha.
    pub fn to_rgba8(self, a: u8) -> Rgba8 {
        fn q(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Rgba8 {
            r: q(self.r),
            g: q(self.g),
            b: q(self.b),
            a,
        }
    }
}

/// Straight-alpha RGBA8 color (r,g,b not premultiplied).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Opaque black.
    pub const BLACK: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 255,
    };

    /// Construct from channels.
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Quantize f32 channels in [0, 1] (clamped) to straight-alpha RGBA8.
    pub fn from_f32(r: f32, g: f32, b: f32, a: f32) -> Self {
        fn q(c: f32) -> u8 {
            (c.clamp(0.0, 1.0) * 255.0).round() as u8
        }
        Self {
            r: q(r),
            g: q(g),
            b: q(b),
            a: q(a),
        }
    }

    /// Convert to premultiplied bytes.
    pub fn premultiply(self) -> [u8; 4] {
        fn premul(c: u8, a: u8) -> u8 {
            (((u16::from(c) * u16::from(a)) + 127) / 255) as u8
        }
        [
            premul(self.r, self.a),
            premul(self.g, self.a),
            premul(self.b, self.a),
            self.a,
        ]
    }
}
