//! JSON authoring model for flames.
//!
//! Kept separate from the runtime types: a definition is plain data with serde defaults, and
//! [`crate::Flame::from_def`] validates it into a runtime flame.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::flame::DrawMode;
use crate::flame::model::{Camera, Quality};
use crate::foundation::core::Rgb;

/// Root of a flame definition.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FlameDef {
    /// Free-text name.
    #[serde(default)]
    pub name: String,
    /// Whether 2D variations carry the input z.
    #[serde(default)]
    pub preserve_z: bool,
    /// Camera parameters.
    #[serde(default)]
    pub camera: Camera,
    /// Quality knobs.
    #[serde(default)]
    pub quality: Quality,
    /// At least one layer.
    pub layers: Vec<LayerDef>,
}

/// One layer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LayerDef {
    /// Layer weight.
    #[serde(default = "one")]
    pub weight: f64,
    /// Whether the layer is rendered.
    #[serde(default = "yes")]
    pub visible: bool,
    /// Exactly 256 entries, or empty for a grayscale ramp.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub palette: Vec<Rgb>,
    /// Weight-selected transforms.
    pub xforms: Vec<XFormDef>,
    /// Final transforms, applied in order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub final_xforms: Vec<XFormDef>,
}

/// One transform.
///
/// `affine` and `post_affine` use the coefficient order `[c00, c01, c10, c11, c20, c21]`:
/// `x' = c00*x + c10*y + c20`, `y' = c01*x + c11*y + c21`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct XFormDef {
    /// Free-text label.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Selection weight.
    #[serde(default = "one")]
    pub weight: f64,
    /// Transform color.
    #[serde(default)]
    pub color: f64,
    /// Color symmetry.
    #[serde(default)]
    pub color_symmetry: f64,
    /// Opacity for [`DrawMode::Opaque`].
    #[serde(default = "one")]
    pub opacity: f64,
    /// Draw mode.
    #[serde(default)]
    pub draw_mode: DrawMode,
    /// Affine coefficients.
    #[serde(default = "identity")]
    pub affine: [f64; 6],
    /// Optional post-affine coefficients.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub post_affine: Option<[f64; 6]>,
    /// Relative weights of the next selection.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub modified_weights: Vec<f64>,
    /// Variations in authored order.
    #[serde(default)]
    pub variations: Vec<VariationDef>,
}

/// One variation binding.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VariationDef {
    /// Registry name (exact).
    pub name: String,
    /// Binding amount.
    #[serde(default = "one")]
    pub amount: f64,
    /// Parameter values by (case-insensitive) name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub params: BTreeMap<String, f64>,
}

fn one() -> f64 {
    1.0
}

fn yes() -> bool {
    true
}

fn identity() -> [f64; 6] {
    [1.0, 0.0, 0.0, 1.0, 0.0, 0.0]
}
