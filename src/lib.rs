//! flamekit is the variation transform pipeline of a fractal flame renderer.
//!
//! Every variation ships twice: a scalar `transform` and a kernel-source fragment for GPU
//! exporters, and the crate can check one against the other. The public API is layered:
//!
//! - Look functions up in the [`variation::registry`] and bind them as [`Variation`]s
//! - Compose them into [`XForm`]s, [`Layer`]s and a [`Flame`] (or load a [`FlameDef`])
//! - Drive the chaos game with an [`IterationSession`] into a [`PointSink`]
//! - Export kernels with [`export_kernels`] and verify them with [`parity::check_function`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod context;
mod foundation;

pub mod flame;
pub mod kernel;
pub mod parity;
pub mod session;
pub mod variation;

pub use crate::context::Context;
pub use crate::foundation::core::{Affine, PALETTE_SIZE, Palette, Polar, Rgb, XyzPoint};
pub use crate::foundation::error::{FlameError, FlameResult};
pub use crate::foundation::math::{EPSILON, SMALL_EPSILON};

pub use crate::flame::{
    Camera, DrawMode, Flame, FlameDef, Layer, LayerDef, Quality, SelectionTable, VariationDef,
    XForm, XFormDef,
};
pub use crate::kernel::{CompiledKernel, KernelBundle, KernelEntry, KernelError, export_kernels};
pub use crate::parity::{ParityReport, check_function, check_function_sampled};
pub use crate::session::{
    BoundsSink, InMemorySink, IterationSession, IterationStats, PointSink, SessionOpts,
    SinkConfig,
};
pub use crate::variation::{
    Capabilities, LayerView, ParamKind, ParamSpec, Role, Variation, VariationFunc,
    VariationState, XFormView,
};
