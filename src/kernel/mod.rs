//! Kernel-source dialect: the data-parallel form of every variation.
//!
//! Fragments are written in a small C subset (float/int/bool locals, `if`/`while`, compound
//! assignment, the usual math builtins, `RANDFLOAT()`), as consumed by GPU exporters. The crate
//! compiles them to bytecode so the scalar and kernel forms can be checked against each other
//! without a GPU.

use crate::context::Context;
use crate::foundation::core::XyzPoint;
use crate::foundation::error::{FlameError, FlameResult};
use crate::variation::Variation;

pub(crate) mod ast;
pub(crate) mod bytecode;
pub mod error;
pub mod export;
pub(crate) mod lexer;
pub(crate) mod lower;
pub(crate) mod parser;
pub mod symbols;
pub(crate) mod vm;

pub use error::KernelError;
pub use export::{KernelBundle, KernelEntry, export_kernels};

use crate::kernel::lower::LoweredKernel;
use crate::kernel::symbols::{
    ENV_SYMBOLS, SLOT_PAL, SLOT_PX, SLOT_PY, SLOT_PZ, SLOT_X, SLOT_Y, SLOT_Z,
};
use crate::kernel::vm::ValueSlot;

/// A fragment compiled against a fixed set of bindings.
#[derive(Debug, Clone)]
pub struct CompiledKernel {
    lowered: LoweredKernel,
}

impl CompiledKernel {
    /// Compile `src` with `bindings` (`(symbol, value)` pairs, e.g. `("__linear", 1.0)`).
    pub fn compile(src: &str, bindings: &[(String, f64)]) -> FlameResult<Self> {
        let stmts = parser::parse_fragment(src)?;
        let lowered = lower::lower_fragment(&stmts, bindings)?;
        Ok(Self { lowered })
    }

    /// Compile the kernel form of `variation` with its current amount and parameters.
    ///
    /// Fails with [`FlameError::UnsupportedCapability`] for scalar-only functions.
    pub fn for_variation(variation: &Variation, ctx: &Context) -> FlameResult<Self> {
        let src = variation
            .func()
            .kernel_source(ctx)
            .ok_or_else(|| FlameError::unsupported(variation.name(), "SUPPORTS_GPU"))?;
        Self::compile(&src, &symbols::bindings(variation))
    }

    /// Number of value slots the fragment uses.
    pub fn slot_count(&self) -> usize {
        self.lowered.slot_count
    }

    /// Run the fragment once.
    ///
    /// `input` may be mutated (pre-role fragments write `__x/__y/__z`); `output` receives
    /// `__px/__py/__pz` and `__pal`.
    pub fn run(
        &self,
        ctx: &mut Context,
        input: &mut XyzPoint,
        output: &mut XyzPoint,
    ) -> FlameResult<()> {
        let mut slots = vec![ValueSlot::default(); self.lowered.slot_count];
        let polar = input.polar();
        let env = [
            input.x,
            input.y,
            input.z,
            output.x,
            output.y,
            output.z,
            output.color,
            polar.sqrt,
            polar.sumsq,
            1.0 / polar.sqrt,
            polar.atan_yx,
            polar.atan_xy,
            polar.sin_a,
            polar.cos_a,
        ];
        for (slot, v) in slots.iter_mut().zip(env) {
            *slot = ValueSlot::F64(v);
        }
        let base = ENV_SYMBOLS.len();
        for (slot, v) in slots[base..].iter_mut().zip(&self.lowered.bindings) {
            *slot = ValueSlot::F64(*v);
        }

        let mut stack = Vec::with_capacity(16);
        vm::run_program(&self.lowered.program, &mut slots, &mut stack, ctx)?;

        let read = |s: u32| slots[s as usize].as_f64();
        input.x = read(SLOT_X);
        input.y = read(SLOT_Y);
        input.z = read(SLOT_Z);
        output.x = read(SLOT_PX);
        output.y = read(SLOT_PY);
        output.z = read(SLOT_PZ);
        output.color = read(SLOT_PAL);
        Ok(())
    }
}

/// Parse and lower `src` without running it; returns the first error with its byte offset.
pub fn check_source(src: &str, bindings: &[(String, f64)]) -> Result<(), KernelError> {
    let stmts = parser::parse_fragment(src)?;
    lower::lower_fragment(&stmts, bindings)?;
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/compiled.rs"]
mod tests;
