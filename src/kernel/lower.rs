use std::collections::HashMap;

use crate::kernel::ast::{AssignOp, BinaryOp, Declarator, Expr, Lit, ScalarType, Stmt, UnaryOp};
use crate::kernel::bytecode::{BuiltinId, BytecodeProgram, ConstVal, Op};
use crate::kernel::error::KernelError;
use crate::kernel::symbols::{ENV_SYMBOLS, constant};

/// Lowered fragment plus the slot layout it expects.
#[derive(Debug, Clone)]
pub(crate) struct LoweredKernel {
    pub(crate) program: BytecodeProgram,
    /// Total slots: environment, then bindings, then locals.
    pub(crate) slot_count: usize,
    /// Binding values, stored from slot `ENV_SYMBOLS.len()` onward.
    pub(crate) bindings: Vec<f64>,
}

#[derive(Debug, Clone, Copy)]
enum Global {
    Env(u32),
    Binding(u32),
}

struct Lowerer {
    prog: BytecodeProgram,
    globals: HashMap<String, Global>,
    scopes: Vec<Vec<(String, u32, ScalarType)>>,
    next_slot: u32,
}

pub(crate) fn lower_fragment(
    stmts: &[Stmt],
    bindings: &[(String, f64)],
) -> Result<LoweredKernel, KernelError> {
    let mut globals = HashMap::new();
    for (i, s) in ENV_SYMBOLS.iter().enumerate() {
        globals.insert((*s).to_owned(), Global::Env(i as u32));
    }
    let base = ENV_SYMBOLS.len() as u32;
    for (i, (name, _)) in bindings.iter().enumerate() {
        globals.insert(name.clone(), Global::Binding(base + i as u32));
    }

    let mut l = Lowerer {
        prog: BytecodeProgram::new(),
        globals,
        scopes: vec![Vec::new()],
        next_slot: base + bindings.len() as u32,
    };
    for s in stmts {
        l.lower_stmt(s)?;
    }

    Ok(LoweredKernel {
        program: l.prog,
        slot_count: l.next_slot as usize,
        bindings: bindings.iter().map(|(_, v)| *v).collect(),
    })
}

impl Lowerer {
    fn local(&self, name: &str) -> Option<(u32, ScalarType)> {
        self.scopes
            .iter()
            .rev()
            .flat_map(|s| s.iter().rev())
            .find(|(n, _, _)| n == name)
            .map(|(_, slot, ty)| (*slot, *ty))
    }

    fn declare(&mut self, d: &Declarator, ty: ScalarType) -> Result<u32, KernelError> {
        let scope = self.scopes.last_mut().ok_or_else(|| KernelError::new(d.offset, "no scope"))?;
        if scope.iter().any(|(n, _, _)| *n == d.name) {
            return Err(KernelError::new(
                d.offset,
                format!("'{}' is already declared in this scope", d.name),
            ));
        }
        let slot = self.next_slot;
        self.next_slot += 1;
        scope.push((d.name.clone(), slot, ty));
        Ok(slot)
    }

    fn coerce(&mut self, ty: ScalarType) {
        match ty {
            ScalarType::Float => {}
            ScalarType::Int => {
                self.prog.emit(Op::Trunc);
            }
            ScalarType::Bool => {
                self.prog.emit(Op::ToBool);
            }
        }
    }

    fn lower_stmt(&mut self, s: &Stmt) -> Result<(), KernelError> {
        match s {
            Stmt::Decl { ty, vars } => {
                for d in vars {
                    match &d.init {
                        Some(e) => {
                            self.lower_expr(e)?;
                            self.coerce(*ty);
                        }
                        None => {
                            let c = self.prog.push_const(ConstVal::F64(0.0));
                            self.prog.emit(Op::PushConst(c));
                            self.coerce(*ty);
                        }
                    }
                    let slot = self.declare(d, *ty)?;
                    self.prog.emit(Op::Store(slot));
                }
            }
            Stmt::Assign {
                target,
                offset,
                op,
                value,
            } => {
                let (slot, ty) = self.assignable(target, *offset)?;
                if *op != AssignOp::Set {
                    self.prog.emit(Op::Load(slot));
                }
                self.lower_expr(value)?;
                match op {
                    AssignOp::Set => {}
                    AssignOp::Add => {
                        self.prog.emit(Op::Add);
                    }
                    AssignOp::Sub => {
                        self.prog.emit(Op::Sub);
                    }
                    AssignOp::Mul => {
                        self.prog.emit(Op::Mul);
                    }
                    AssignOp::Div => {
                        self.prog.emit(Op::Div);
                    }
                }
                self.coerce(ty);
                self.prog.emit(Op::Store(slot));
            }
            Stmt::If {
                cond,
                then,
                otherwise,
            } => {
                self.lower_expr(cond)?;
                let to_else = self.prog.emit(Op::JumpIfFalse(0));
                self.lower_scoped(then)?;
                match otherwise {
                    Some(o) => {
                        let to_end = self.prog.emit(Op::Jump(0));
                        let else_at = self.prog.here();
                        self.prog.patch_jump(to_else, else_at);
                        self.lower_scoped(o)?;
                        let end = self.prog.here();
                        self.prog.patch_jump(to_end, end);
                    }
                    None => {
                        let end = self.prog.here();
                        self.prog.patch_jump(to_else, end);
                    }
                }
            }
            Stmt::While { cond, body } => {
                let start = self.prog.here();
                self.lower_expr(cond)?;
                let to_end = self.prog.emit(Op::JumpIfFalse(0));
                self.lower_scoped(body)?;
                self.prog.emit(Op::Jump(start));
                let end = self.prog.here();
                self.prog.patch_jump(to_end, end);
            }
            Stmt::Block(body) => {
                self.scopes.push(Vec::new());
                for s in body {
                    self.lower_stmt(s)?;
                }
                self.scopes.pop();
            }
            Stmt::Expr(e) => {
                self.lower_expr(e)?;
                self.prog.emit(Op::Pop);
            }
            Stmt::Empty => {}
        }
        Ok(())
    }

    /// Branch bodies get their own scope even without braces.
    fn lower_scoped(&mut self, s: &Stmt) -> Result<(), KernelError> {
        self.scopes.push(Vec::new());
        let r = self.lower_stmt(s);
        self.scopes.pop();
        r
    }

    fn assignable(&self, name: &str, offset: usize) -> Result<(u32, ScalarType), KernelError> {
        if let Some(local) = self.local(name) {
            return Ok(local);
        }
        match self.globals.get(name) {
            Some(Global::Env(slot)) => Ok((*slot, ScalarType::Float)),
            Some(Global::Binding(_)) => Err(KernelError::new(
                offset,
                format!("cannot assign to binding '{name}'"),
            )),
            None if constant(name).is_some() => Err(KernelError::new(
                offset,
                format!("cannot assign to constant '{name}'"),
            )),
            None => Err(KernelError::new(
                offset,
                format!("unknown identifier '{name}'"),
            )),
        }
    }

    fn lower_expr(&mut self, e: &Expr) -> Result<(), KernelError> {
        match e {
            Expr::Lit(Lit::F64(v)) => {
                let c = self.prog.push_const(ConstVal::F64(*v));
                self.prog.emit(Op::PushConst(c));
            }
            Expr::Lit(Lit::Bool(v)) => {
                let c = self.prog.push_const(ConstVal::Bool(*v));
                self.prog.emit(Op::PushConst(c));
            }
            Expr::Var { name, offset } => {
                if let Some((slot, _)) = self.local(name) {
                    self.prog.emit(Op::Load(slot));
                } else if let Some(g) = self.globals.get(name) {
                    let slot = match *g {
                        Global::Env(s) | Global::Binding(s) => s,
                    };
                    self.prog.emit(Op::Load(slot));
                } else if let Some(v) = constant(name) {
                    let c = self.prog.push_const(ConstVal::F64(v));
                    self.prog.emit(Op::PushConst(c));
                } else {
                    return Err(KernelError::new(
                        *offset,
                        format!("unknown identifier '{name}'"),
                    ));
                }
            }
            Expr::Unary { op, expr } => {
                self.lower_expr(expr)?;
                self.prog.emit(match op {
                    UnaryOp::Neg => Op::Neg,
                    UnaryOp::Not => Op::Not,
                });
            }
            Expr::Binary { op, left, right } => match arith_op(*op) {
                Some(code) => {
                    self.lower_expr(left)?;
                    self.lower_expr(right)?;
                    self.prog.emit(code);
                }
                None => {
                    self.lower_expr(left)?;
                    self.prog.emit(Op::ToBool);
                    self.prog.emit(Op::Dup);
                    let short = if *op == BinaryOp::And {
                        self.prog.emit(Op::JumpIfFalse(0))
                    } else {
                        self.prog.emit(Op::JumpIfTrue(0))
                    };
                    self.prog.emit(Op::Pop);
                    self.lower_expr(right)?;
                    self.prog.emit(Op::ToBool);
                    let end = self.prog.here();
                    self.prog.patch_jump(short, end);
                }
            },
            Expr::Call { func, args, offset } => {
                let id = BuiltinId::lookup(func).ok_or_else(|| {
                    KernelError::new(*offset, format!("unknown function '{func}'"))
                })?;
                if args.len() != id.arity() as usize {
                    return Err(KernelError::new(
                        *offset,
                        format!(
                            "{func} expects {} argument(s), got {}",
                            id.arity(),
                            args.len()
                        ),
                    ));
                }
                for a in args {
                    self.lower_expr(a)?;
                }
                self.prog.emit(Op::CallBuiltin {
                    id,
                    argc: args.len() as u8,
                });
            }
            Expr::Cast { ty, expr } => {
                self.lower_expr(expr)?;
                self.coerce(*ty);
            }
            Expr::Ternary {
                cond,
                then,
                otherwise,
            } => {
                self.lower_expr(cond)?;
                let to_else = self.prog.emit(Op::JumpIfFalse(0));
                self.lower_expr(then)?;
                let to_end = self.prog.emit(Op::Jump(0));
                let else_at = self.prog.here();
                self.prog.patch_jump(to_else, else_at);
                self.lower_expr(otherwise)?;
                let end = self.prog.here();
                self.prog.patch_jump(to_end, end);
            }
        }
        Ok(())
    }
}

/// Eager binary operators; `&&`/`||` short-circuit and have no single opcode.
fn arith_op(op: BinaryOp) -> Option<Op> {
    Some(match op {
        BinaryOp::Add => Op::Add,
        BinaryOp::Sub => Op::Sub,
        BinaryOp::Mul => Op::Mul,
        BinaryOp::Div => Op::Div,
        BinaryOp::Mod => Op::Mod,
        BinaryOp::Eq => Op::Eq,
        BinaryOp::Ne => Op::Ne,
        BinaryOp::Lt => Op::Lt,
        BinaryOp::Le => Op::Le,
        BinaryOp::Gt => Op::Gt,
        BinaryOp::Ge => Op::Ge,
        BinaryOp::And | BinaryOp::Or => return None,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/lower.rs"]
mod tests;
