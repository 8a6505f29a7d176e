use std::collections::BTreeSet;

use crate::context::Context;
use crate::flame::def::{FlameDef, LayerDef, VariationDef, XFormDef};
use crate::flame::layer::Layer;
use crate::flame::xform::XForm;
use crate::foundation::core::{Affine, Palette};
use crate::foundation::error::{FlameError, FlameResult};
use crate::variation::Variation;

/// View parameters carried with a flame for the downstream renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Camera {
    /// Rotation in degrees.
    pub rot: f64,
    /// View center x.
    pub center_x: f64,
    /// View center y.
    pub center_y: f64,
    /// Zoom exponent.
    pub zoom: f64,
    /// Output scale.
    pub pixels_per_unit: f64,
    /// Pitch in degrees.
    pub pitch: f64,
    /// Yaw in degrees.
    pub yaw: f64,
    /// Perspective strength.
    pub perspective: f64,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            rot: 0.0,
            center_x: 0.0,
            center_y: 0.0,
            zoom: 0.0,
            pixels_per_unit: 50.0,
            pitch: 0.0,
            yaw: 0.0,
            perspective: 0.0,
        }
    }
}

/// Quality knobs carried with a flame for the downstream renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Quality {
    /// Supersampling factor per axis.
    pub spatial_oversample: u32,
    /// Samples per output pixel.
    pub sample_density: f64,
}

impl Default for Quality {
    fn default() -> Self {
        Self {
            spatial_oversample: 1,
            sample_density: 100.0,
        }
    }
}

/// A complete fractal flame: layers of transforms plus view parameters.
///
/// `Clone` is a deep copy: every variation instance (and its cached state) is duplicated, which
/// is how workers get independent copies.
#[derive(Clone, Debug, Default)]
pub struct Flame {
    name: String,
    layers: Vec<Layer>,
    camera: Camera,
    quality: Quality,
    preserve_z: bool,
}

impl Flame {
    /// Empty flame.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style layer append.
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.add_layer(layer);
        self
    }

    /// Append a layer.
    pub fn add_layer(&mut self, mut layer: Layer) {
        layer.set_index(self.layers.len());
        self.layers.push(layer);
    }

    /// Free-text name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the name.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Layers in order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Mutable layers.
    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    /// Camera parameters.
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable camera parameters.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Quality knobs.
    pub fn quality(&self) -> &Quality {
        &self.quality
    }

    /// Mutable quality knobs.
    pub fn quality_mut(&mut self) -> &mut Quality {
        &mut self.quality
    }

    /// Whether 2D variations carry the input z.
    pub fn preserve_z(&self) -> bool {
        self.preserve_z
    }

    /// Set the preserve-Z flag.
    pub fn set_preserve_z(&mut self, preserve_z: bool) {
        self.preserve_z = preserve_z;
    }

    /// Sorted distinct names of every variation used.
    pub fn variation_names(&self) -> Vec<&'static str> {
        let names: BTreeSet<&'static str> = self
            .layers
            .iter()
            .flat_map(|l| l.xforms().iter().chain(l.final_xforms()))
            .flat_map(|xf| xf.variations().iter().map(Variation::name))
            .collect();
        names.into_iter().collect()
    }

    /// Prepare for a render pass: publish preserve-Z to `ctx` and initialize every variation.
    #[tracing::instrument(skip_all, fields(flame = %self.name, layers = self.layers.len()))]
    pub fn init_pass(&mut self, ctx: &mut Context) {
        ctx.set_preserve_z(self.preserve_z);
        for layer in &mut self.layers {
            layer.init(ctx);
        }
    }

    /// Parse a flame definition from JSON and validate it.
    pub fn from_json_reader<R: std::io::Read>(r: R) -> FlameResult<Self> {
        let def: FlameDef = serde_json::from_reader(r)
            .map_err(|e| FlameError::serde(format!("parse flame JSON: {e}")))?;
        Self::from_def(&def)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> FlameResult<String> {
        serde_json::to_string_pretty(&self.to_def())
            .map_err(|e| FlameError::serde(format!("serialize flame JSON: {e}")))
    }

    /// Validate a definition into a runtime flame.
    pub fn from_def(def: &FlameDef) -> FlameResult<Self> {
        if def.layers.is_empty() {
            return Err(FlameError::validation("flame must have at least one layer"));
        }
        let mut flame = Flame {
            name: def.name.clone(),
            layers: Vec::new(),
            camera: def.camera,
            quality: def.quality,
            preserve_z: def.preserve_z,
        };
        if flame.quality.spatial_oversample == 0 {
            return Err(FlameError::validation("quality.spatial_oversample must be >= 1"));
        }
        for (li, ld) in def.layers.iter().enumerate() {
            flame.add_layer(layer_from_def(ld).map_err(|e| in_context(e, &format!("layer {li}")))?);
        }
        Ok(flame)
    }

    /// Convert back to the authoring model.
    pub fn to_def(&self) -> FlameDef {
        FlameDef {
            name: self.name.clone(),
            preserve_z: self.preserve_z,
            camera: self.camera,
            quality: self.quality,
            layers: self.layers.iter().map(layer_to_def).collect(),
        }
    }
}

fn in_context(e: FlameError, at: &str) -> FlameError {
    match e {
        FlameError::Validation(msg) => FlameError::validation(format!("{at}: {msg}")),
        other => other,
    }
}

fn check_weight(what: &str, v: f64) -> FlameResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(FlameError::validation(format!(
            "{what} must be finite and >= 0, got {v}"
        )))
    }
}

fn layer_from_def(def: &LayerDef) -> FlameResult<Layer> {
    check_weight("layer weight", def.weight)?;
    let mut layer = Layer::new();
    layer.set_weight(def.weight);
    layer.set_visible(def.visible);
    if !def.palette.is_empty() {
        layer.set_palette(Palette::from_entries(&def.palette)?);
    }
    for (i, xd) in def.xforms.iter().enumerate() {
        layer.add_xform(xform_from_def(xd).map_err(|e| in_context(e, &format!("xform {i}")))?);
    }
    for (i, xd) in def.final_xforms.iter().enumerate() {
        layer.add_final_xform(
            xform_from_def(xd).map_err(|e| in_context(e, &format!("final xform {i}")))?,
        );
    }
    Ok(layer)
}

fn xform_from_def(def: &XFormDef) -> FlameResult<XForm> {
    check_weight("weight", def.weight)?;
    for &w in &def.modified_weights {
        check_weight("modified weight", w)?;
    }
    if !(0.0..=1.0).contains(&def.opacity) {
        return Err(FlameError::validation(format!(
            "opacity must be in [0, 1], got {}",
            def.opacity
        )));
    }
    if def.affine.iter().any(|c| !c.is_finite()) {
        return Err(FlameError::validation("affine coefficients must be finite"));
    }

    let mut xf = XForm::new();
    xf.set_name(def.name.clone());
    xf.set_weight(def.weight);
    xf.set_color(def.color);
    xf.set_color_symmetry(def.color_symmetry);
    xf.set_opacity(def.opacity);
    xf.set_draw_mode(def.draw_mode);
    xf.set_affine(Affine::new(def.affine));
    xf.set_post_affine(def.post_affine.map(Affine::new));
    xf.set_modified_weights(def.modified_weights.clone());
    for vd in &def.variations {
        xf.add_variation(variation_from_def(vd)?);
    }
    Ok(xf)
}

fn variation_from_def(def: &VariationDef) -> FlameResult<Variation> {
    let mut v = Variation::by_name(&def.name, def.amount)?;
    for (name, value) in &def.params {
        v.set_parameter(name, *value)?;
    }
    Ok(v)
}

fn layer_to_def(layer: &Layer) -> LayerDef {
    let palette = if *layer.palette() == Palette::grayscale() {
        Vec::new()
    } else {
        layer.palette().entries().to_vec()
    };
    LayerDef {
        weight: layer.weight(),
        visible: layer.is_visible(),
        palette,
        xforms: layer.xforms().iter().map(xform_to_def).collect(),
        final_xforms: layer.final_xforms().iter().map(xform_to_def).collect(),
    }
}

fn xform_to_def(xf: &XForm) -> XFormDef {
    XFormDef {
        name: xf.name().to_owned(),
        weight: xf.weight(),
        color: xf.color(),
        color_symmetry: xf.color_symmetry(),
        opacity: xf.opacity(),
        draw_mode: xf.draw_mode(),
        affine: xf.affine().as_coeffs(),
        post_affine: xf.post_affine().map(|a| a.as_coeffs()),
        modified_weights: xf.modified_weights().to_vec(),
        variations: xf
            .variations()
            .iter()
            .map(|v| VariationDef {
                name: v.name().to_owned(),
                amount: v.amount(),
                params: v
                    .parameters()
                    .into_iter()
                    .map(|(n, val)| (n.to_owned(), val))
                    .collect(),
            })
            .collect(),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flame/model.rs"]
mod tests;
