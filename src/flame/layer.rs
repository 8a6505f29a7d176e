use crate::context::Context;
use crate::flame::selection::SelectionTable;
use crate::flame::xform::XForm;
use crate::foundation::core::{Palette, XyzPoint};
use crate::variation::LayerView;

/// Ordered transforms sharing a palette.
#[derive(Clone, Debug)]
pub struct Layer {
    xforms: Vec<XForm>,
    final_xforms: Vec<XForm>,
    palette: Palette,
    weight: f64,
    visible: bool,
    index: usize,
    table: Option<SelectionTable>,
}

impl Default for Layer {
    fn default() -> Self {
        Self::new()
    }
}

impl Layer {
    /// Empty visible layer with weight `1` and a grayscale palette.
    pub fn new() -> Self {
        Self {
            xforms: Vec::new(),
            final_xforms: Vec::new(),
            palette: Palette::default(),
            weight: 1.0,
            visible: true,
            index: 0,
            table: None,
        }
    }

    /// Builder-style transform append.
    pub fn with_xform(mut self, xform: XForm) -> Self {
        self.add_xform(xform);
        self
    }

    /// Append a weight-selected transform.
    pub fn add_xform(&mut self, mut xform: XForm) {
        xform.set_index(self.xforms.len());
        self.xforms.push(xform);
        self.table = None;
    }

    /// Append a final transform; finals run in order on the emitted point and are never selected.
    pub fn add_final_xform(&mut self, mut xform: XForm) {
        xform.set_index(self.final_xforms.len());
        self.final_xforms.push(xform);
    }

    /// Weight-selected transforms.
    pub fn xforms(&self) -> &[XForm] {
        &self.xforms
    }

    /// Mutable transforms; the selection table is rebuilt on next use.
    pub fn xforms_mut(&mut self) -> &mut [XForm] {
        self.table = None;
        &mut self.xforms
    }

    /// Final transforms.
    pub fn final_xforms(&self) -> &[XForm] {
        &self.final_xforms
    }

    /// Mutable final transforms.
    pub fn final_xforms_mut(&mut self) -> &mut [XForm] {
        &mut self.final_xforms
    }

    /// Layer palette.
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Replace the palette.
    pub fn set_palette(&mut self, palette: Palette) {
        self.palette = palette;
    }

    /// Layer weight.
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Set the layer weight.
    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
    }

    /// Whether the layer is rendered.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show or hide the layer.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Read-only view handed to variation `init`.
    pub fn view(&self) -> LayerView {
        LayerView {
            index: self.index,
            xform_count: self.xforms.len(),
        }
    }

    pub(crate) fn set_index(&mut self, index: usize) {
        self.index = index;
    }

    /// Initialize every transform and rebuild the selection table.
    pub fn init(&mut self, ctx: &mut Context) {
        let view = self.view();
        for xf in self.xforms.iter_mut().chain(self.final_xforms.iter_mut()) {
            xf.init(ctx, &view);
        }
        self.rebuild_table();
    }

    /// Selection table, rebuilt if transforms changed since the last call.
    pub fn selection_table(&mut self) -> &SelectionTable {
        if self.table.is_none() {
            self.rebuild_table();
        }
        self.table.get_or_insert_with(|| SelectionTable::build(&[], &[]))
    }

    fn rebuild_table(&mut self) {
        let weights: Vec<f64> = self.xforms.iter().map(XForm::weight).collect();
        let modified: Vec<&[f64]> = self.xforms.iter().map(XForm::modified_weights).collect();
        tracing::debug!(layer = self.index, xforms = weights.len(), "rebuild selection table");
        self.table = Some(SelectionTable::build(&weights, &modified));
    }

    /// Pick the next transform, biased by `prev`'s relative weights.
    ///
    /// Returns `None` when every weight is zero.
    pub fn select(&mut self, prev: Option<usize>, ctx: &mut Context) -> Option<usize> {
        let u = ctx.random();
        self.selection_table().pick(prev, u)
    }

    /// Run the final transforms in order on `point`.
    pub fn apply_finals(&mut self, ctx: &mut Context, point: &mut XyzPoint) {
        let view = self.view();
        for xf in &mut self.final_xforms {
            let input = *point;
            xf.apply(ctx, &view, &input, point);
        }
    }

    /// Apply transform `idx` to `point` in place.
    pub fn apply_xform(&mut self, idx: usize, ctx: &mut Context, point: &mut XyzPoint) {
        let view = self.view();
        if let Some(xf) = self.xforms.get_mut(idx) {
            let input = *point;
            xf.apply(ctx, &view, &input, point);
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/flame/layer.rs"]
mod tests;
