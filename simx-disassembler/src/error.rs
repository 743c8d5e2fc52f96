//! Disassembler errors

use simx_spec::SpecError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DisassemblerError {
    #[error("Unknown opcode: {0}")]
    UnknownOpcode(u8),

    #[error("Invalid register field {index} in 0x{word:08X}")]
    InvalidRegister { word: u32, index: u8 },
}

impl DisassemblerError {
    /// Attach the offending word to a decode failure
    pub(crate) fn from_spec(err: SpecError, word: u32) -> Self {
        match err {
            SpecError::InvalidRegister(index) => DisassemblerError::InvalidRegister { word, index },
            SpecError::InvalidOpcode(opcode) => DisassemblerError::UnknownOpcode(opcode),
            // Decoding a single word raises nothing else
            _ => DisassemblerError::UnknownOpcode(simx_spec::encoding::extract_opcode(word)),
        }
    }
}

pub type Result<T> = std::result::Result<T, DisassemblerError>;
