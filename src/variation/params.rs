//! Parameter schema shared by every variation function.

/// Value domain of a variation parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ParamKind {
    /// Unrestricted float.
    Float,
    /// Float clamped into `[min, max]`.
    FloatRange {
        /// Inclusive lower bound.
        min: f64,
        /// Inclusive upper bound.
        max: f64,
    },
    /// Integer coded as float; rounded half away from zero.
    Int,
    /// Integer coded as float; rounded then clamped into `[min, max]`.
    IntRange {
        /// Inclusive lower bound.
        min: i32,
        /// Inclusive upper bound.
        max: i32,
    },
    /// Integer coded as float; truncated toward zero.
    IntTrunc,
    /// Integer coded as float; truncated toward zero then clamped into `[min, max]`.
    IntTruncRange {
        /// Inclusive lower bound.
        min: i32,
        /// Inclusive upper bound.
        max: i32,
    },
}

impl ParamKind {
    /// Coerce an authored value into this domain.
    ///
    /// Out-of-domain values are clamped silently; animation curves routinely overshoot.
    pub fn clamp(self, v: f64) -> f64 {
        match self {
            Self::Float => v,
            Self::FloatRange { min, max } => v.clamp(min, max),
            Self::Int => round_to_int(v),
            Self::IntRange { min, max } => round_to_int(v).clamp(f64::from(min), f64::from(max)),
            Self::IntTrunc => trunc_to_int(v),
            Self::IntTruncRange { min, max } => {
                trunc_to_int(v).clamp(f64::from(min), f64::from(max))
            }
        }
    }

    /// Whether the parameter is integer-coded.
    pub fn is_integer(self) -> bool {
        matches!(
            self,
            Self::Int | Self::IntRange { .. } | Self::IntTrunc | Self::IntTruncRange { .. }
        )
    }

    /// Inclusive bounds of a ranged kind.
    pub fn bounds(self) -> Option<(f64, f64)> {
        match self {
            Self::FloatRange { min, max } => Some((min, max)),
            Self::IntRange { min, max } | Self::IntTruncRange { min, max } => {
                Some((f64::from(min), f64::from(max)))
            }
            Self::Float | Self::Int | Self::IntTrunc => None,
        }
    }
}

fn round_to_int(v: f64) -> f64 {
    if v.is_finite() {
        v.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX))
    } else {
        0.0
    }
}

fn trunc_to_int(v: f64) -> f64 {
    if v.is_finite() {
        v.trunc().clamp(f64::from(i32::MIN), f64::from(i32::MAX))
    } else {
        0.0
    }
}

/// Declared parameter of a variation function.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParamSpec {
    /// Canonical name; also the kernel symbol suffix.
    pub name: &'static str,
    /// Legacy name accepted by the setter (older authoring files).
    pub alias: Option<&'static str>,
    /// Value domain.
    pub kind: ParamKind,
}

impl ParamSpec {
    /// Unrestricted float parameter.
    pub const fn float(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: ParamKind::Float,
        }
    }

    /// Clamped float parameter.
    pub const fn float_range(name: &'static str, min: f64, max: f64) -> Self {
        Self {
            name,
            alias: None,
            kind: ParamKind::FloatRange { min, max },
        }
    }

    /// Unbounded integer parameter.
    pub const fn int(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: ParamKind::Int,
        }
    }

    /// Bounded integer parameter.
    pub const fn int_range(name: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            alias: None,
            kind: ParamKind::IntRange { min, max },
        }
    }

    /// Unbounded integer parameter that truncates fractional input.
    pub const fn int_trunc(name: &'static str) -> Self {
        Self {
            name,
            alias: None,
            kind: ParamKind::IntTrunc,
        }
    }

    /// Bounded integer parameter that truncates fractional input.
    pub const fn int_trunc_range(name: &'static str, min: i32, max: i32) -> Self {
        Self {
            name,
            alias: None,
            kind: ParamKind::IntTruncRange { min, max },
        }
    }

    /// Attach a legacy alias.
    pub const fn with_alias(mut self, alias: &'static str) -> Self {
        self.alias = Some(alias);
        self
    }

    /// Case-insensitive match against the name or alias.
    pub fn matches(&self, key: &str) -> bool {
        self.name.eq_ignore_ascii_case(key)
            || self.alias.is_some_and(|a| a.eq_ignore_ascii_case(key))
    }
}

/// Position of `key` in `specs`, matched case-insensitively.
pub fn find_param(specs: &[ParamSpec], key: &str) -> Option<usize> {
    specs.iter().position(|s| s.matches(key))
}

#[cfg(test)]
#[path = "../../tests/unit/variation/params.rs"]
mod tests;
