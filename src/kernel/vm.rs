use crate::context::Context;
use crate::foundation::math::sqrt_safe;
use crate::kernel::bytecode::{BuiltinId, BytecodeProgram, ConstVal, Op};
use crate::kernel::error::KernelError;

/// Upper bound on executed instructions per run; guards against runaway `while` loops.
pub(crate) const STEP_BUDGET: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ValueSlot {
    F64(f64),
    Bool(bool),
}

impl Default for ValueSlot {
    fn default() -> Self {
        Self::F64(0.0)
    }
}

impl ValueSlot {
    pub(crate) fn as_f64(self) -> f64 {
        match self {
            Self::F64(v) => v,
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
        }
    }

    /// C truthiness: any non-zero number (NaN included) is true.
    pub(crate) fn as_bool(self) -> bool {
        match self {
            Self::Bool(v) => v,
            Self::F64(v) => v != 0.0,
        }
    }
}

/// Execute `p` against `slots`, drawing randomness from `ctx`.
pub(crate) fn run_program(
    p: &BytecodeProgram,
    slots: &mut [ValueSlot],
    stack: &mut Vec<ValueSlot>,
    ctx: &mut Context,
) -> Result<(), KernelError> {
    stack.clear();
    let mut pc = 0usize;
    let mut steps = 0usize;

    while pc < p.ops.len() {
        steps += 1;
        if steps > STEP_BUDGET {
            return Err(KernelError::runtime("step budget exhausted"));
        }
        let op = p.ops[pc];
        pc += 1;

        match op {
            Op::PushConst(idx) => {
                let c = p
                    .consts
                    .get(idx.0 as usize)
                    .ok_or_else(|| KernelError::runtime("const idx out of range"))?;
                stack.push(match *c {
                    ConstVal::F64(v) => ValueSlot::F64(v),
                    ConstVal::Bool(v) => ValueSlot::Bool(v),
                });
            }
            Op::Load(slot) => {
                let v = slots
                    .get(slot as usize)
                    .copied()
                    .ok_or_else(|| KernelError::runtime("slot out of range"))?;
                stack.push(v);
            }
            Op::Store(slot) => {
                let v = pop(stack)?;
                let dst = slots
                    .get_mut(slot as usize)
                    .ok_or_else(|| KernelError::runtime("slot out of range"))?;
                *dst = v;
            }

            Op::Trunc => {
                let v = pop_f64(stack)?;
                stack.push(ValueSlot::F64(v.trunc()));
            }
            Op::ToBool => {
                let v = pop(stack)?;
                stack.push(ValueSlot::Bool(v.as_bool()));
            }

            Op::Neg => {
                let v = pop_f64(stack)?;
                stack.push(ValueSlot::F64(-v));
            }
            Op::Not => {
                let v = pop(stack)?;
                stack.push(ValueSlot::Bool(!v.as_bool()));
            }
            Op::Add => bin_f64(stack, |a, b| a + b)?,
            Op::Sub => bin_f64(stack, |a, b| a - b)?,
            Op::Mul => bin_f64(stack, |a, b| a * b)?,
            Op::Div => bin_f64(stack, |a, b| a / b)?,
            Op::Mod => bin_f64(stack, |a, b| a % b)?,

            Op::Eq => bin_cmp(stack, |a, b| a == b)?,
            Op::Ne => bin_cmp(stack, |a, b| a != b)?,
            Op::Lt => bin_cmp(stack, |a, b| a < b)?,
            Op::Le => bin_cmp(stack, |a, b| a <= b)?,
            Op::Gt => bin_cmp(stack, |a, b| a > b)?,
            Op::Ge => bin_cmp(stack, |a, b| a >= b)?,

            Op::Dup => {
                let v = stack
                    .last()
                    .copied()
                    .ok_or_else(|| KernelError::runtime("stack underflow"))?;
                stack.push(v);
            }
            Op::Pop => {
                pop(stack)?;
            }
            Op::Jump(target) => pc = target as usize,
            Op::JumpIfFalse(target) => {
                if !pop(stack)?.as_bool() {
                    pc = target as usize;
                }
            }
            Op::JumpIfTrue(target) => {
                if pop(stack)?.as_bool() {
                    pc = target as usize;
                }
            }

            Op::CallBuiltin { id, argc } => call_builtin(stack, id, argc, ctx)?,
        }
    }

    if !stack.is_empty() {
        return Err(KernelError::runtime(format!(
            "stack has {} values at end of fragment",
            stack.len()
        )));
    }
    Ok(())
}

fn pop(stack: &mut Vec<ValueSlot>) -> Result<ValueSlot, KernelError> {
    stack
        .pop()
        .ok_or_else(|| KernelError::runtime("stack underflow"))
}

fn pop_f64(stack: &mut Vec<ValueSlot>) -> Result<f64, KernelError> {
    pop(stack).map(ValueSlot::as_f64)
}

fn bin_f64(stack: &mut Vec<ValueSlot>, f: impl FnOnce(f64, f64) -> f64) -> Result<(), KernelError> {
    let b = pop_f64(stack)?;
    let a = pop_f64(stack)?;
    stack.push(ValueSlot::F64(f(a, b)));
    Ok(())
}

fn bin_cmp(
    stack: &mut Vec<ValueSlot>,
    f: impl FnOnce(f64, f64) -> bool,
) -> Result<(), KernelError> {
    let b = pop_f64(stack)?;
    let a = pop_f64(stack)?;
    stack.push(ValueSlot::Bool(f(a, b)));
    Ok(())
}

fn call_builtin(
    stack: &mut Vec<ValueSlot>,
    id: BuiltinId,
    argc: u8,
    ctx: &mut Context,
) -> Result<(), KernelError> {
    if argc != id.arity() {
        return Err(KernelError::runtime(format!(
            "{id:?} expects {} args, got {argc}",
            id.arity()
        )));
    }
    if stack.len() < argc as usize {
        return Err(KernelError::runtime("stack underflow in builtin call"));
    }

    let v = match id {
        BuiltinId::Rand => ctx.random(),
        BuiltinId::Atan2
        | BuiltinId::Pow
        | BuiltinId::Fmod
        | BuiltinId::Hypot
        | BuiltinId::Min
        | BuiltinId::Max => {
            let b = pop_f64(stack)?;
            let a = pop_f64(stack)?;
            match id {
                BuiltinId::Atan2 => a.atan2(b),
                BuiltinId::Pow => a.powf(b),
                BuiltinId::Fmod => a % b,
                BuiltinId::Hypot => a.hypot(b),
                BuiltinId::Min => a.min(b),
                _ => a.max(b),
            }
        }
        unary => {
            let x = pop_f64(stack)?;
            match unary {
                BuiltinId::Sin => x.sin(),
                BuiltinId::Cos => x.cos(),
                BuiltinId::Tan => x.tan(),
                BuiltinId::Sinh => x.sinh(),
                BuiltinId::Cosh => x.cosh(),
                BuiltinId::Tanh => x.tanh(),
                BuiltinId::Asin => x.asin(),
                BuiltinId::Acos => x.acos(),
                BuiltinId::Atan => x.atan(),
                BuiltinId::Asinh => x.asinh(),
                BuiltinId::Acosh => x.acosh(),
                BuiltinId::Sqrt => x.sqrt(),
                BuiltinId::SqrtSafe => sqrt_safe(x),
                BuiltinId::Exp => x.exp(),
                BuiltinId::Log => x.ln(),
                BuiltinId::Abs => x.abs(),
                BuiltinId::Floor => x.floor(),
                BuiltinId::Ceil => x.ceil(),
                BuiltinId::Round => x.round(),
                BuiltinId::Sqr => x * x,
                _ => {
                    return Err(KernelError::runtime(format!(
                        "{unary:?} is not a unary builtin"
                    )));
                }
            }
        }
    };
    stack.push(ValueSlot::F64(v));
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/vm.rs"]
mod tests;
