pub(crate) mod basic;
pub(crate) mod blur;
pub(crate) mod hyperbolic;
pub(crate) mod post;
pub(crate) mod shapes;
pub(crate) mod waves;
pub(crate) mod z3d;

use crate::context::Context;
use crate::foundation::core::XyzPoint;

/// Carry `amount * z` through a 2D function when preserve-Z is on.
#[inline]
pub(crate) fn carry_z(ctx: &Context, input: &XyzPoint, output: &mut XyzPoint, amount: f64) {
    if ctx.is_preserve_z() {
        output.z += amount * input.z;
    }
}

/// Kernel counterpart of [`carry_z`]: `__pz += __<name>*__z;` or nothing.
pub(crate) fn kernel_carry_z(ctx: &Context, name: &str) -> String {
    if ctx.is_preserve_z() {
        format!("__pz += __{name}*__z;\n")
    } else {
        String::new()
    }
}
