//! Canonical symbol names shared by kernel fragments and their bindings.

use crate::foundation::math::{EPSILON, FRAC_PI_2, M_1_PI, M_2_PI, M_2PI, PI};
use crate::variation::Variation;

/// Per-point symbols every fragment may read, in slot order.
///
/// `__x/__y/__z` hold the (mutable) input, `__px/__py/__pz` the output accumulator and `__pal` the
/// color; the rest are the polar quantities of the input.
pub const ENV_SYMBOLS: [&str; 14] = [
    "__x", "__y", "__z", "__px", "__py", "__pz", "__pal", "__r", "__r2", "__rinv", "__theta",
    "__phi", "__sinA", "__cosA",
];

pub(crate) const SLOT_X: u32 = 0;
pub(crate) const SLOT_Y: u32 = 1;
pub(crate) const SLOT_Z: u32 = 2;
pub(crate) const SLOT_PX: u32 = 3;
pub(crate) const SLOT_PY: u32 = 4;
pub(crate) const SLOT_PZ: u32 = 5;
pub(crate) const SLOT_PAL: u32 = 6;

pub(crate) const CONSTANTS: [(&str, f64); 10] = [
    ("PI", PI),
    ("M_PI", PI),
    ("M_PI_F", PI),
    ("M_PI_2", FRAC_PI_2),
    ("M_1_PI", M_1_PI),
    ("M_1_PI_F", M_1_PI),
    ("M_2_PI", M_2_PI),
    ("M_2PI", M_2PI),
    ("epsilon", EPSILON),
    ("EPSILON", EPSILON),
];

pub(crate) fn constant(name: &str) -> Option<f64> {
    CONSTANTS.iter().find(|(n, _)| *n == name).map(|(_, v)| *v)
}

fn sanitize(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect()
}

/// Symbol carrying the amount of function `name`: `__<name>`.
pub fn amount_symbol(name: &str) -> String {
    format!("__{}", sanitize(name))
}

/// Symbol carrying parameter `param` of function `name`: `__<name>_<param>`.
pub fn param_symbol(name: &str, param: &str) -> String {
    format!("__{}_{}", sanitize(name), sanitize(param))
}

/// Amount and parameter bindings of one variation instance.
pub fn bindings(variation: &Variation) -> Vec<(String, f64)> {
    let name = variation.name();
    let mut out = Vec::with_capacity(1 + variation.func().params().len());
    out.push((amount_symbol(name), variation.amount()));
    out.extend(
        variation
            .parameters()
            .into_iter()
            .map(|(p, v)| (param_symbol(name, p), v)),
    );
    out
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/symbols.rs"]
mod tests;
