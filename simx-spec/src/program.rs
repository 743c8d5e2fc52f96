//! # Program Image
//!
//! A program is a flat sequence of 32-bit instruction words with no header.
//! On disk each word is stored in the host's native byte order.

use crate::error::{Result, SpecError};
use crate::instruction::{Instruction, RawInstruction};
use crate::INSTRUCTION_SIZE;
use sha2::{Digest, Sha256};
use std::fmt;

/// Loaded program image
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Program {
    /// Instruction words, in execution order
    pub code: Vec<u32>,
}

impl Program {
    /// Create a program from raw words
    pub fn new(code: Vec<u32>) -> Self {
        Self { code }
    }

    /// Create a program by encoding typed instructions
    pub fn from_instructions(instructions: &[Instruction]) -> Self {
        Self::new(instructions.iter().map(Instruction::encode).collect())
    }

    /// Load from an image; the length must be a multiple of 4
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        if bytes.len() % INSTRUCTION_SIZE as usize != 0 {
            return Err(SpecError::MisalignedImage { len: bytes.len() });
        }

        let code = bytes
            .chunks_exact(INSTRUCTION_SIZE as usize)
            .map(|chunk| u32::from_ne_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]))
            .collect();

        Ok(Self { code })
    }

    /// Serialize to an image
    pub fn to_bytes(&self) -> Vec<u8> {
        self.code.iter().flat_map(|word| word.to_ne_bytes()).collect()
    }

    /// Number of instructions
    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    /// Program counter one past the last instruction
    pub fn end_pc(&self) -> u32 {
        (self.code.len() as u32).wrapping_mul(INSTRUCTION_SIZE)
    }

    /// Decode every word into its raw fields
    pub fn decode(&self) -> Vec<RawInstruction> {
        self.code.iter().map(|&word| RawInstruction::from_word(word)).collect()
    }

    /// SHA-256 of the image
    pub fn hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.to_bytes());
        hasher.finalize().into()
    }

    /// Hex rendering of [`Program::hash`]
    pub fn hash_hex(&self) -> String {
        self.hash().iter().map(|b| format!("{:02x}", b)).collect()
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Program {{ {} instructions, {} bytes }}",
            self.len(),
            self.end_pc()
        )
    }
}
