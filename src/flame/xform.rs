use kurbo::Point;
use smallvec::SmallVec;

use crate::context::Context;
use crate::foundation::core::{Affine, XyzPoint};
use crate::variation::{LayerView, Role, Variation, XFormView};

/// How points produced by a transform are plotted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawMode {
    /// Always plotted.
    #[default]
    Normal,
    /// Never plotted; the point still feeds the next iteration.
    Hidden,
    /// Plotted with probability `opacity`.
    Opaque,
}

/// Affine frame plus an ordered bundle of variations.
#[derive(Clone, Debug)]
pub struct XForm {
    name: String,
    index: usize,
    affine: Affine,
    post_affine: Option<Affine>,
    variations: Vec<Variation>,
    pre: SmallVec<[usize; 2]>,
    regular: SmallVec<[usize; 4]>,
    post: SmallVec<[usize; 2]>,
    weight: f64,
    modified_weights: Vec<f64>,
    color: f64,
    color_symmetry: f64,
    opacity: f64,
    draw_mode: DrawMode,
}

impl Default for XForm {
    fn default() -> Self {
        Self::new()
    }
}

impl XForm {
    /// Identity transform with weight `1` and no variations.
    pub fn new() -> Self {
        Self {
            name: String::new(),
            index: 0,
            affine: Affine::IDENTITY,
            post_affine: None,
            variations: Vec::new(),
            pre: SmallVec::new(),
            regular: SmallVec::new(),
            post: SmallVec::new(),
            weight: 1.0,
            modified_weights: Vec::new(),
            color: 0.0,
            color_symmetry: 0.0,
            opacity: 1.0,
            draw_mode: DrawMode::Normal,
        }
    }

    /// Builder-style variation append.
    pub fn with_variation(mut self, variation: Variation) -> Self {
        self.add_variation(variation);
        self
    }

    /// Builder-style affine override.
    pub fn with_affine(mut self, affine: Affine) -> Self {
        self.affine = affine;
        self
    }

    /// Builder-style weight override.
    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    /// Builder-style color override.
    pub fn with_color(mut self, color: f64, symmetry: f64) -> Self {
        self.color = color;
        self.color_symmetry = symmetry;
        self
    }

    /// Append a variation; its role is taken from its priority.
    pub fn add_variation(&mut self, variation: Variation) {
        self.variations.push(variation);
        self.partition();
    }

    /// Remove and return the variation at `idx`.
    pub fn remove_variation(&mut self, idx: usize) -> Option<Variation> {
        if idx >= self.variations.len() {
            return None;
        }
        let v = self.variations.remove(idx);
        self.partition();
        Some(v)
    }

    fn partition(&mut self) {
        self.pre.clear();
        self.regular.clear();
        self.post.clear();
        for (i, v) in self.variations.iter().enumerate() {
            match v.role() {
                Role::Pre => self.pre.push(i),
                Role::Regular => self.regular.push(i),
                Role::Post => self.post.push(i),
            }
        }
    }

    /// Variations in authored order.
    pub fn variations(&self) -> &[Variation] {
        &self.variations
    }

    /// Mutable access for parameter edits; roles are fixed per function so the partition holds.
    pub fn variations_mut(&mut self) -> &mut [Variation] {
        &mut self.variations
    }

    /// Indices of the variations with role `role`, in authored order.
    pub fn role_indices(&self, role: Role) -> &[usize] {
        match role {
            Role::Pre => &self.pre,
            Role::Regular => &self.regular,
            Role::Post => &self.post,
        }
    }

    /// Free-text label.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the label.
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    /// Position within the owning layer.
    pub fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Affine coefficients.
    pub fn affine(&self) -> Affine {
        self.affine
    }

    /// Replace the affine coefficients.
    pub fn set_affine(&mut self, affine: Affine) {
        self.affine = affine;
    }

    /// Optional post-affine applied to the composed output.
    pub fn post_affine(&self) -> Option<Affine> {
        self.post_affine
    }

    /// Set or clear the post-affine.
    pub fn set_post_affine(&mut self, affine: Option<Affine>) {
        self.post_affine = affine;
    }

    /// Selection weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Set the selection weight. The owning layer must rebuild its selection table.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Relative weights applied to the next selection after this transform.
    pub fn modified_weights(&self) -> &[f64] {
        &self.modified_weights
    }

    /// Replace the relative weights (missing entries count as `1`).
    pub fn set_modified_weights(&mut self, weights: Vec<f64>) {
        self.modified_weights = weights;
    }

    /// Transform color.
    pub fn color(&self) -> f64 {
        self.color
    }

    /// Set the transform color.
    pub fn set_color(&mut self, color: f64) {
        self.color = color;
    }

    /// Color symmetry in `[-1, 1]`.
    pub fn color_symmetry(&self) -> f64 {
        self.color_symmetry
    }

    /// Set the color symmetry.
    pub fn set_color_symmetry(&mut self, symmetry: f64) {
        self.color_symmetry = symmetry;
    }

    /// Opacity used by [`DrawMode::Opaque`].
    pub fn opacity(&self) -> f64 {
        self.opacity
    }

    /// Set the opacity.
    pub fn set_opacity(&mut self, opacity: f64) {
        self.opacity = opacity;
    }

    /// Draw mode.
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Set the draw mode.
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.draw_mode = mode;
    }

    /// Read-only view handed to variations.
    pub fn view(&self) -> XFormView {
        XFormView {
            index: self.index,
            affine: self.affine,
            color: self.color,
            color_symmetry: self.color_symmetry,
            weight: self.weight,
        }
    }

    /// Blend the incoming color with the transform color.
    pub fn blend_color(&self, color: f64) -> f64 {
        color * (1.0 + self.color_symmetry) / 2.0 + self.color * (1.0 - self.color_symmetry) / 2.0
    }

    /// Initialize every bound variation.
    pub fn init(&mut self, ctx: &mut Context, layer: &LayerView) {
        let view = self.view();
        for v in &mut self.variations {
            v.init(ctx, layer, &view);
        }
    }

    /// Apply the transform to `input`, writing the composed point to `output`.
    ///
    /// Order: pre-variations on a copy of the input, affine map, regular variations summed into
    /// a zeroed accumulator seeded with the blended color, post-variations on the accumulator,
    /// post-affine.
    pub fn apply(
        &mut self,
        ctx: &mut Context,
        layer: &LayerView,
        input: &XyzPoint,
        output: &mut XyzPoint,
    ) {
        let view = self.view();
        let mut acc = XyzPoint::new(0.0, 0.0, 0.0).with_color(self.blend_color(input.color));

        let mut src = *input;
        src.hide = false;
        for &i in &self.pre {
            self.variations[i].apply(ctx, layer, &view, &mut src, &mut acc);
        }

        let p = self.affine * Point::new(src.x, src.y);
        src.x = p.x;
        src.y = p.y;

        acc.clear_xyz();
        acc.hide = src.hide;
        for &i in &self.regular {
            self.variations[i].apply(ctx, layer, &view, &mut src, &mut acc);
        }

        for &i in &self.post {
            let mut composed = acc;
            self.variations[i].apply(ctx, layer, &view, &mut composed, &mut acc);
        }

        if let Some(post) = self.post_affine {
            let p = post * Point::new(acc.x, acc.y);
            acc.x = p.x;
            acc.y = p.y;
        }

        *output = acc;
    }

    /// Whether a point produced by this transform is plotted this iteration.
    pub fn plots(&self, ctx: &mut Context) -> bool {
        match self.draw_mode {
            DrawMode::Normal => true,
            DrawMode::Hidden => false,
            DrawMode::Opaque => ctx.random() < self.opacity,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flame/xform.rs"]
mod tests;
