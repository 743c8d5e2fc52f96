//! Assembler errors

use simx_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssemblerError {
    #[error("Syntax error at column {column}: {message}")]
    SyntaxError { column: usize, message: String },

    #[error("Unknown instruction: {0}")]
    UnknownInstruction(String),

    #[error("Invalid register: %{0}")]
    InvalidRegister(String),

    #[error("Invalid operands for {mnemonic}: expected `{expected}`")]
    InvalidOperands {
        mnemonic: String,
        expected: &'static str,
    },

    #[error("Immediate out of range: {0} (must fit in 16 signed bits)")]
    InvalidImmediate(i64),

    #[error("Undefined label: {0}")]
    UndefinedLabel(String),

    #[error("Duplicate label: {0}")]
    DuplicateLabel(String),

    #[error("Invalid directive: .{0}")]
    InvalidDirective(String),

    #[error(transparent)]
    Spec(#[from] SpecError),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<AssemblerError>,
    },
}

impl AssemblerError {
    /// Attach a 1-based source line
    pub fn at_line(self, line: usize) -> Self {
        match self {
            AssemblerError::AtLine { .. } => self,
            other => AssemblerError::AtLine {
                line,
                source: Box::new(other),
            },
        }
    }

    /// Source line, if known
    pub fn line(&self) -> Option<usize> {
        match self {
            AssemblerError::AtLine { line, .. } => Some(*line),
            _ => None,
        }
    }

    /// The error without its line annotation
    pub fn kind(&self) -> &AssemblerError {
        match self {
            AssemblerError::AtLine { source, .. } => source,
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, AssemblerError>;
