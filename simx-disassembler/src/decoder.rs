//! Instruction decoder

use crate::error::{DisassemblerError, Result};
use simx_spec::{Instruction, RawInstruction};

/// Decode 32-bit instruction word
///
/// Unlike the runtime, which only resolves an instruction when it executes,
/// this rejects undefined opcodes and out-of-range register fields up front.
pub fn decode(word: u32) -> Result<Instruction> {
    Instruction::from_raw(&RawInstruction::from_word(word))
        .map_err(|err| DisassemblerError::from_spec(err, word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use simx_spec::encoding::encode_word;
    use simx_spec::{Opcode, Register};

    #[test]
    fn test_decode_movl_imm() {
        assert_eq!(
            decode(0x4000_0005).unwrap(),
            Instruction::MovlImmReg {
                reg: Register::R0,
                imm: 5
            }
        );
    }

    #[test]
    fn test_decode_sign_extends_offsets() {
        let word = encode_word(Opcode::Jmp.to_u8(), 0, 0, 0xFFF8);
        assert_eq!(decode(word).unwrap(), Instruction::Jmp { offset: -8 });
    }

    #[test]
    fn test_decode_unknown_opcode() {
        assert_eq!(
            decode(encode_word(23, 0, 0, 0)),
            Err(DisassemblerError::UnknownOpcode(23))
        );
    }

    #[test]
    fn test_decode_invalid_register() {
        let word = encode_word(Opcode::Printr.to_u8(), 17, 0, 0);
        assert_eq!(
            decode(word),
            Err(DisassemblerError::InvalidRegister { word, index: 17 })
        );
    }
}
