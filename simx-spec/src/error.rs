//! # Error Types for the SIMX instruction set

use crate::config::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpecError {
    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(#[from] ConfigError),

    // Program image errors
    #[error("Invalid program image: length {len} is not a multiple of 4 bytes")]
    MisalignedImage { len: usize },

    // Instruction errors
    #[error("Invalid opcode: {0} (valid range: 0-21)")]
    InvalidOpcode(u8),

    #[error("Invalid register index: {0} (valid range: 0-15)")]
    InvalidRegister(u8),
}

impl SpecError {
    /// Errors raised while loading a program, before any instruction runs
    pub fn is_load_error(&self) -> bool {
        matches!(
            self,
            SpecError::InvalidConfig(_) | SpecError::MisalignedImage { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SpecError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SpecError::InvalidRegister(16);
        assert_eq!(
            err.to_string(),
            "Invalid register index: 16 (valid range: 0-15)"
        );

        let err = SpecError::InvalidOpcode(22);
        assert_eq!(err.to_string(), "Invalid opcode: 22 (valid range: 0-21)");

        let err = SpecError::MisalignedImage { len: 6 };
        assert_eq!(
            err.to_string(),
            "Invalid program image: length 6 is not a multiple of 4 bytes"
        );
    }

    #[test]
    fn test_is_load_error() {
        assert!(SpecError::MisalignedImage { len: 3 }.is_load_error());
        assert!(SpecError::InvalidConfig(ConfigError::StackTooSmall).is_load_error());
        assert!(!SpecError::InvalidOpcode(31).is_load_error());
        assert!(!SpecError::InvalidRegister(20).is_load_error());
    }
}
