//! Runtime error types for SIMX

use simx_spec::{ConfigError, SpecError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("Memory access out of bounds: address {address}, width {width}")]
    OutOfBounds { address: i64, width: u32 },

    #[error("Stack overflow: sp = {sp}")]
    StackOverflow { sp: i32 },

    #[error("Stack underflow: sp = {sp}")]
    StackUnderflow { sp: i32 },

    #[error("Program counter {pc:#x} outside program (end {end:#x})")]
    PcOutOfRange { pc: u32, end: u32 },

    #[error("Misaligned program counter: {pc:#x}")]
    MisalignedPc { pc: u32 },

    #[error("Jump target out of range: pc {pc:#x}, offset {offset}")]
    JumpOutOfRange { pc: u32, offset: i32 },

    #[error("Malformed input for readr: {token:?}")]
    MalformedInput { token: String },

    #[error("Input exhausted on readr")]
    InputExhausted,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RuntimeError {
    /// Errors raised before the first instruction executes
    pub fn is_load_error(&self) -> bool {
        matches!(self, RuntimeError::Spec(e) if e.is_load_error())
    }
}

impl From<ConfigError> for RuntimeError {
    fn from(err: ConfigError) -> Self {
        RuntimeError::Spec(err.into())
    }
}

pub type Result<T> = std::result::Result<T, RuntimeError>;
