use crate::foundation::error::{FlameError, FlameResult};

pub use kurbo::Affine;

/// Mutable point threaded through the transform chain.
///
/// Owned by the iteration driver and overwritten every iteration. `color` is a palette index in
/// `[0, 1]`; `hide` marks the point invisible for the current iteration only.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct XyzPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Z coordinate.
    pub z: f64,
    /// Palette index.
    pub color: f64,
    /// Set by crop-type variations.
    pub hide: bool,
}

impl XyzPoint {
    /// Create a visible point with color `0`.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self {
            x,
            y,
            z,
            color: 0.0,
            hide: false,
        }
    }

    /// Builder-style color override.
    pub fn with_color(mut self, color: f64) -> Self {
        self.color = color;
        self
    }

    /// Reset the coordinates to the origin, keeping color and hide.
    pub fn clear_xyz(&mut self) {
        self.x = 0.0;
        self.y = 0.0;
        self.z = 0.0;
    }

    /// Derived polar quantities of the x/y projection.
    pub fn polar(&self) -> Polar {
        Polar::of(self.x, self.y)
    }

    /// Return `true` when every coordinate is finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Polar quantities of a point's x/y projection, computed on demand.
///
/// `sin_a`/`cos_a` follow the flame convention `x / r` and `y / r` (angle measured from the
/// y axis). At the origin they degrade to `0` and `1` instead of dividing by zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Polar {
    /// `x² + y²`.
    pub sumsq: f64,
    /// `sqrt(x² + y²)`.
    pub sqrt: f64,
    /// `x / r`.
    pub sin_a: f64,
    /// `y / r`.
    pub cos_a: f64,
    /// `atan2(y, x)`.
    pub atan_yx: f64,
    /// `atan2(x, y)`.
    pub atan_xy: f64,
}

impl Polar {
    /// Compute the polar quantities of `(x, y)`.
    pub fn of(x: f64, y: f64) -> Self {
        let sumsq = x * x + y * y;
        let sqrt = sumsq.sqrt();
        let (sin_a, cos_a) = if sqrt > 0.0 {
            (x / sqrt, y / sqrt)
        } else {
            (0.0, 1.0)
        };
        Self {
            sumsq,
            sqrt,
            sin_a,
            cos_a,
            atan_yx: y.atan2(x),
            atan_xy: x.atan2(y),
        }
    }
}

/// One palette entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgb {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

/// Number of palette entries carried by a layer.
pub const PALETTE_SIZE: usize = 256;

/// Fixed-size RGB palette shared by the transforms of one layer.
#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    entries: Box<[Rgb; PALETTE_SIZE]>,
}

impl Default for Palette {
    fn default() -> Self {
        Self::grayscale()
    }
}

impl Palette {
    /// Linear black-to-white ramp.
    pub fn grayscale() -> Self {
        let mut entries = Box::new([Rgb::default(); PALETTE_SIZE]);
        for (i, e) in entries.iter_mut().enumerate() {
            let v = i as u8;
            *e = Rgb { r: v, g: v, b: v };
        }
        Self { entries }
    }

    /// Build from exactly [`PALETTE_SIZE`] entries.
    pub fn from_entries(entries: &[Rgb]) -> FlameResult<Self> {
        let arr: [Rgb; PALETTE_SIZE] = entries.try_into().map_err(|_| {
            FlameError::validation(format!(
                "palette must have exactly {PALETTE_SIZE} entries, got {}",
                entries.len()
            ))
        })?;
        Ok(Self {
            entries: Box::new(arr),
        })
    }

    /// Borrow all entries.
    pub fn entries(&self) -> &[Rgb] {
        &self.entries[..]
    }

    /// Map a color index in `[0, 1]` to its palette entry (clamped).
    pub fn lookup(&self, color: f64) -> Rgb {
        let c = if color.is_finite() {
            color.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let idx = (c * (PALETTE_SIZE - 1) as f64).round() as usize;
        self.entries[idx.min(PALETTE_SIZE - 1)]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
