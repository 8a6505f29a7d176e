pub(crate) use std::f64::consts::{FRAC_PI_2, PI};

/// Degeneracy threshold for angle and amount checks.
pub const EPSILON: f64 = 1.0e-10;
/// Additive guard used by variations that divide by small sums.
pub const SMALL_EPSILON: f64 = 1.0e-6;

pub(crate) const M_2PI: f64 = 2.0 * PI;
pub(crate) const M_1_PI: f64 = 1.0 / PI;
pub(crate) const M_2_PI: f64 = 2.0 / PI;

#[inline]
pub(crate) fn sqr(v: f64) -> f64 {
    v * v
}

/// `sqrt` that maps non-positive inputs to `0` instead of NaN.
#[inline]
pub(crate) fn sqrt_safe(v: f64) -> f64 {
    if v <= 0.0 { 0.0 } else { v.sqrt() }
}

/// C `fmod`: result carries the sign of the dividend.
#[inline]
pub(crate) fn fmod(a: f64, b: f64) -> f64 {
    a % b
}

/// Sign with `0` treated as positive.
#[inline]
pub(crate) fn sign_nonneg(v: f64) -> f64 {
    if v < 0.0 { -1.0 } else { 1.0 }
}

/// Minimal complex arithmetic for the handful of variations that need it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Complex {
    pub(crate) re: f64,
    pub(crate) im: f64,
}

impl Complex {
    pub(crate) fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }

    pub(crate) fn abs(self) -> f64 {
        self.re.hypot(self.im)
    }

    pub(crate) fn arg(self) -> f64 {
        self.im.atan2(self.re)
    }

    /// Principal square root.
    pub(crate) fn sqrt(self) -> Self {
        let m = self.abs().sqrt();
        let a = 0.5 * self.arg();
        Self::new(m * a.cos(), m * a.sin())
    }

    pub(crate) fn ln(self) -> Self {
        Self::new(0.5 * (self.re * self.re + self.im * self.im).ln(), self.arg())
    }

    /// `ln(z + sqrt(z² + 1))`.
    pub(crate) fn asinh(self) -> Self {
        let sq = Self::new(
            self.re * self.re - self.im * self.im + 1.0,
            2.0 * self.re * self.im,
        )
        .sqrt();
        Self::new(self.re + sq.re, self.im + sq.im).ln()
    }

    pub(crate) fn scale(self, s: f64) -> Self {
        Self::new(self.re * s, self.im * s)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/math.rs"]
mod tests;
