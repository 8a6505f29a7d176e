//! Transforms, layers and flames: how variations are composed and selected.

pub mod def;
pub(crate) mod layer;
pub(crate) mod model;
pub(crate) mod selection;
pub(crate) mod xform;

pub use def::{FlameDef, LayerDef, VariationDef, XFormDef};
pub use layer::Layer;
pub use model::{Camera, Flame, Quality};
pub use selection::SelectionTable;
pub use xform::{DrawMode, XForm};
