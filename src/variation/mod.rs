//! Variation functions: the nonlinear maps bound to transforms.
//!
//! Every function implements [`VariationFunc`] twice over: a scalar `transform` evaluated on the
//! CPU and a `kernel_source` fragment in the C-like kernel dialect (see [`crate::kernel`]). Both
//! must compute the same result for finite inputs.

use bitflags::bitflags;

use crate::context::Context;
use crate::foundation::core::{Affine, XyzPoint};
use crate::foundation::error::{FlameError, FlameResult};

pub(crate) mod funcs;
pub mod params;
pub mod registry;

pub use params::{ParamKind, ParamSpec, find_param};

bitflags! {
    /// Declared capability set of a variation function.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
    pub struct Capabilities: u16 {
        /// Maps the x/y plane.
        const D2 = 1 << 0;
        /// Defines its own z output.
        const D3 = 1 << 1;
        /// Only touches z.
        const Z_TRANSFORM = 1 << 2;
        /// Stochastic blur.
        const BLUR = 1 << 3;
        /// Evaluated before the affine stage.
        const PRE = 1 << 4;
        /// Evaluated after regular variations.
        const POST = 1 << 5;
        /// May hide points.
        const CROP = 1 << 6;
        /// Writes the color channel directly.
        const DIRECT_COLOR = 1 << 7;
        /// Iterative/simulation-like evaluation.
        const SIMULATION = 1 << 8;
        /// Has an equivalent kernel-source form.
        const SUPPORTS_GPU = 1 << 9;
    }
}

impl Capabilities {
    /// Whether the function writes its own z coordinate (and so ignores preserve-Z).
    pub fn defines_z(self) -> bool {
        self.intersects(Self::D3 | Self::Z_TRANSFORM)
    }

    /// Human-readable labels, in declaration order.
    pub fn labels(self) -> Vec<&'static str> {
        self.iter_names().map(|(name, _)| name).collect()
    }
}

/// Evaluation role derived from a function's priority.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    /// Priority `< 0`: before the affine stage, may mutate the input.
    Pre,
    /// Priority `== 0`: sums into the output accumulator.
    Regular,
    /// Priority `> 0`: sees the composed output and may overwrite it.
    Post,
}

impl Role {
    /// Role for a priority value.
    pub fn from_priority(priority: i32) -> Self {
        match priority {
            p if p < 0 => Self::Pre,
            0 => Self::Regular,
            _ => Self::Post,
        }
    }
}

/// Read-only view of the owning transform handed to variation calls.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct XFormView {
    /// Index of the transform within its layer.
    pub index: usize,
    /// Affine coefficients.
    pub affine: Affine,
    /// Transform color.
    pub color: f64,
    /// Transform color symmetry.
    pub color_symmetry: f64,
    /// Selection weight.
    pub weight: f64,
}

impl Default for XFormView {
    fn default() -> Self {
        Self {
            index: 0,
            affine: Affine::IDENTITY,
            color: 0.0,
            color_symmetry: 0.0,
            weight: 1.0,
        }
    }
}

/// Read-only view of the owning layer handed to `init`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LayerView {
    /// Index of the layer within its flame.
    pub index: usize,
    /// Number of weight-selected transforms.
    pub xform_count: usize,
}

/// A single nonlinear map.
///
/// Implementations own their parameters and any `init`-derived cache, so one instance must never
/// be shared across workers; deep-copy the owning [`crate::Flame`] instead.
pub trait VariationFunc: Send + Sync + std::fmt::Debug {
    /// Registry name (exact, case-sensitive).
    fn name(&self) -> &'static str;

    /// Declared capability bits.
    fn capabilities(&self) -> Capabilities;

    /// Ordering class: negative runs before the affine stage, positive after regular variations.
    fn priority(&self) -> i32 {
        let caps = self.capabilities();
        if caps.contains(Capabilities::PRE) {
            -1
        } else if caps.contains(Capabilities::POST) {
            1
        } else {
            0
        }
    }

    /// Declared parameters in stable order.
    fn params(&self) -> &'static [ParamSpec] {
        &[]
    }

    /// Current value of parameter `idx` (index into [`VariationFunc::params`]).
    fn param(&self, _idx: usize) -> f64 {
        0.0
    }

    /// Store an already-coerced value for parameter `idx`.
    fn store_param(&mut self, _idx: usize, _value: f64) {}

    /// Recompute cached constants from the current parameters.
    fn init(&mut self, _ctx: &mut Context, _layer: &LayerView, _xform: &XFormView, _amount: f64) {}

    /// Apply the map. Regular roles accumulate into `output` with `+=`.
    fn transform(
        &mut self,
        ctx: &mut Context,
        xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
        amount: f64,
    );

    /// Kernel-source fragment equivalent to [`VariationFunc::transform`].
    fn kernel_source(&self, _ctx: &Context) -> Option<String> {
        None
    }

    /// The kernel form draws its randomness differently from the scalar form (ring-buffered
    /// Gaussian blurs), so parity is statistical rather than exact.
    fn stochastic_kernel(&self) -> bool {
        false
    }

    /// Deep copy behind a box.
    fn box_clone(&self) -> Box<dyn VariationFunc>;

    /// Parameter names, same order as [`VariationFunc::parameter_values`].
    fn parameter_names(&self) -> Vec<&'static str> {
        self.params().iter().map(|p| p.name).collect()
    }

    /// Parameter values; integer parameters are exposed as `f64`.
    fn parameter_values(&self) -> Vec<f64> {
        (0..self.params().len()).map(|i| self.param(i)).collect()
    }

    /// Set a parameter by case-insensitive name, coercing it into its domain.
    fn set_parameter(&mut self, name: &str, value: f64) -> FlameResult<()> {
        let specs = self.params();
        let idx = find_param(specs, name).ok_or_else(|| FlameError::invalid_parameter(name))?;
        let v = specs[idx].kind.clamp(value);
        self.store_param(idx, v);
        Ok(())
    }

    /// Read a parameter by case-insensitive name.
    fn get_parameter(&self, name: &str) -> FlameResult<f64> {
        find_param(self.params(), name)
            .map(|i| self.param(i))
            .ok_or_else(|| FlameError::invalid_parameter(name))
    }
}

impl Clone for Box<dyn VariationFunc> {
    fn clone(&self) -> Self {
        self.box_clone()
    }
}

/// Lifecycle of one binding within a render pass.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VariationState {
    /// Built or edited since the last `init`.
    Constructed,
    /// `init` ran; no `transform` yet.
    Initialized,
    /// At least one `transform` since `init`.
    Active,
}

/// A variation function bound to a transform with an amount.
#[derive(Clone, Debug)]
pub struct Variation {
    func: Box<dyn VariationFunc>,
    amount: f64,
    state: VariationState,
}

impl Variation {
    /// Bind `func` with `amount`.
    pub fn new(func: Box<dyn VariationFunc>, amount: f64) -> Self {
        Self {
            func,
            amount,
            state: VariationState::Constructed,
        }
    }

    /// Look `name` up in the registry and bind it.
    pub fn by_name(name: &str, amount: f64) -> FlameResult<Self> {
        Ok(Self::new(registry::create(name)?, amount))
    }

    /// Function name.
    pub fn name(&self) -> &'static str {
        self.func.name()
    }

    /// Borrow the bound function.
    pub fn func(&self) -> &dyn VariationFunc {
        self.func.as_ref()
    }

    /// Weight of this binding.
    pub fn amount(&self) -> f64 {
        self.amount
    }

    /// Change the amount; cached constants are recomputed before the next transform.
    pub fn set_amount(&mut self, amount: f64) {
        self.amount = amount;
        self.state = VariationState::Constructed;
    }

    /// Current lifecycle state.
    pub fn state(&self) -> VariationState {
        self.state
    }

    /// Evaluation role.
    pub fn role(&self) -> Role {
        Role::from_priority(self.func.priority())
    }

    /// Set a parameter; fails with [`FlameError::InvalidParameter`] for unknown names.
    pub fn set_parameter(&mut self, name: &str, value: f64) -> FlameResult<()> {
        self.func.set_parameter(name, value)?;
        self.state = VariationState::Constructed;
        Ok(())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn parameters(&self) -> Vec<(&'static str, f64)> {
        self.func
            .parameter_names()
            .into_iter()
            .zip(self.func.parameter_values())
            .collect()
    }

    /// Run `init` and enter [`VariationState::Initialized`].
    pub fn init(&mut self, ctx: &mut Context, layer: &LayerView, xform: &XFormView) {
        self.func.init(ctx, layer, xform, self.amount);
        self.state = VariationState::Initialized;
    }

    /// Apply the bound function with this binding's amount.
    ///
    /// Bindings edited since their last `init` are re-initialized first.
    pub fn apply(
        &mut self,
        ctx: &mut Context,
        layer: &LayerView,
        xform: &XFormView,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
    ) {
        if self.state == VariationState::Constructed {
            self.init(ctx, layer, xform);
        }
        self.func.transform(ctx, xform, input, output, self.amount);
        self.state = VariationState::Active;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/variation/binding.rs"]
mod tests;
