#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct ConstIdx(pub(crate) u32);

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ConstVal {
    F64(f64),
    Bool(bool),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BuiltinId {
    Sin,
    Cos,
    Tan,
    Sinh,
    Cosh,
    Tanh,
    Asin,
    Acos,
    Atan,
    Atan2,
    Asinh,
    Acosh,
    Sqrt,
    SqrtSafe,
    Pow,
    Exp,
    Log,
    Abs,
    Floor,
    Ceil,
    Round,
    Fmod,
    Hypot,
    Sqr,
    Min,
    Max,
    Rand,
}

impl BuiltinId {
    /// Resolve a kernel function name, accepting both the `f`-suffixed and plain spellings.
    pub(crate) fn lookup(name: &str) -> Option<Self> {
        Some(match name {
            "sinf" | "sin" => Self::Sin,
            "cosf" | "cos" => Self::Cos,
            "tanf" | "tan" => Self::Tan,
            "sinhf" | "sinh" => Self::Sinh,
            "coshf" | "cosh" => Self::Cosh,
            "tanhf" | "tanh" => Self::Tanh,
            "asinf" | "asin" => Self::Asin,
            "acosf" | "acos" => Self::Acos,
            "atanf" | "atan" => Self::Atan,
            "atan2f" | "atan2" => Self::Atan2,
            "asinhf" | "asinh" => Self::Asinh,
            "acoshf" | "acosh" => Self::Acosh,
            "sqrtf" | "sqrt" => Self::Sqrt,
            "sqrtf_safe" => Self::SqrtSafe,
            "powf" | "pow" => Self::Pow,
            "expf" | "exp" => Self::Exp,
            "logf" | "log" => Self::Log,
            "fabsf" | "fabs" | "abs" => Self::Abs,
            "floorf" | "floor" => Self::Floor,
            "ceilf" | "ceil" => Self::Ceil,
            "roundf" | "round" | "lroundf" => Self::Round,
            "fmodf" | "fmod" => Self::Fmod,
            "hypotf" | "hypot" => Self::Hypot,
            "sqrf" => Self::Sqr,
            "fminf" | "fmin" => Self::Min,
            "fmaxf" | "fmax" => Self::Max,
            "RANDFLOAT" => Self::Rand,
            _ => return None,
        })
    }

    pub(crate) fn arity(self) -> u8 {
        match self {
            Self::Rand => 0,
            Self::Atan2 | Self::Pow | Self::Fmod | Self::Hypot | Self::Min | Self::Max => 2,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    PushConst(ConstIdx),
    Load(u32),
    Store(u32),

    /// Truncate toward zero (stores into integer locals and `(int)` casts).
    Trunc,
    ToBool,

    Neg,
    Not,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,

    Dup,
    Pop,
    Jump(u32),
    JumpIfFalse(u32),
    JumpIfTrue(u32),

    CallBuiltin { id: BuiltinId, argc: u8 },
}

#[derive(Debug, Clone)]
pub(crate) struct BytecodeProgram {
    pub(crate) ops: Vec<Op>,
    pub(crate) consts: Vec<ConstVal>,
}

impl BytecodeProgram {
    pub(crate) fn new() -> Self {
        Self {
            ops: Vec::new(),
            consts: Vec::new(),
        }
    }

    pub(crate) fn push_const(&mut self, c: ConstVal) -> ConstIdx {
        if let Some(i) = self.consts.iter().position(|k| same_const(*k, c)) {
            return ConstIdx(i as u32);
        }
        let idx = ConstIdx(self.consts.len() as u32);
        self.consts.push(c);
        idx
    }

    /// Append `op` and return its position, for later jump patching.
    pub(crate) fn emit(&mut self, op: Op) -> u32 {
        self.ops.push(op);
        (self.ops.len() - 1) as u32
    }

    pub(crate) fn here(&self) -> u32 {
        self.ops.len() as u32
    }

    pub(crate) fn patch_jump(&mut self, at: u32, target: u32) {
        if let Some(op) = self.ops.get_mut(at as usize) {
            *op = match *op {
                Op::Jump(_) => Op::Jump(target),
                Op::JumpIfFalse(_) => Op::JumpIfFalse(target),
                Op::JumpIfTrue(_) => Op::JumpIfTrue(target),
                other => other,
            };
        }
    }
}

fn same_const(a: ConstVal, b: ConstVal) -> bool {
    match (a, b) {
        (ConstVal::F64(x), ConstVal::F64(y)) => x.to_bits() == y.to_bits(),
        (ConstVal::Bool(x), ConstVal::Bool(y)) => x == y,
        _ => false,
    }
}
