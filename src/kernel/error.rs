//! Kernel-language errors.

use std::fmt;

use crate::foundation::error::FlameError;

/// Lex, parse, lowering or execution failure in a kernel fragment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KernelError {
    /// Byte offset into the fragment source (`0` for runtime failures).
    pub offset: usize,
    /// Human-readable reason.
    pub message: String,
}

impl KernelError {
    pub(crate) fn new(offset: usize, message: impl Into<String>) -> Self {
        Self {
            offset,
            message: message.into(),
        }
    }

    pub(crate) fn runtime(message: impl Into<String>) -> Self {
        Self::new(0, message)
    }
}

impl fmt::Display for KernelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "kernel error at byte {}: {}", self.offset, self.message)
    }
}

impl std::error::Error for KernelError {}

impl From<KernelError> for FlameError {
    fn from(e: KernelError) -> Self {
        FlameError::kernel(format!("at byte {}: {}", e.offset, e.message))
    }
}
