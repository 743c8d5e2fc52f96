//! Instruction formatting to assembly text

use simx_spec::{Instruction, RawInstruction, INSTRUCTION_SIZE};

/// Format instruction as assembly text
///
/// The output is accepted back by the assembler.
pub fn format(instr: &Instruction) -> String {
    instr.to_string()
}

/// Format an instruction located at `pc`, annotating branches and calls
/// with their absolute target
pub fn format_at(instr: &Instruction, pc: u32) -> String {
    match instr.jump_offset() {
        Some(offset) => {
            let target = pc as i64 + INSTRUCTION_SIZE as i64 + offset as i64;
            format!("{:<24}# -> 0x{:04x}", instr.to_string(), target)
        }
        None => instr.to_string(),
    }
}

/// One line of the raw field dump
pub fn format_fields(raw: &RawInstruction) -> String {
    format!(
        "op: {}, reg1: {}, reg2: {}, imm: {}",
        raw.opcode,
        raw.first_register,
        raw.second_register,
        raw.signed_immediate()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use simx_spec::Register;

    #[test]
    fn test_format_att_syntax() {
        assert_eq!(
            format(&Instruction::MovlDerefReg {
                base: Register::R6,
                dst: Register::R1,
                offset: 4
            }),
            "movl 4(%r6), %r1"
        );
        assert_eq!(
            format(&Instruction::AddlImmReg {
                reg: Register::R2,
                imm: -1
            }),
            "addl $-1, %r2"
        );
    }

    #[test]
    fn test_format_at_annotates_targets() {
        let text = format_at(&Instruction::Jle { offset: -8 }, 12);
        assert!(text.starts_with("jle -8"));
        assert!(text.ends_with("# -> 0x0008"));

        assert_eq!(format_at(&Instruction::Ret, 12), "ret");
    }

    #[test]
    fn test_format_fields() {
        let raw = RawInstruction::from_word(0x4040_0003);
        assert_eq!(format_fields(&raw), "op: 8, reg1: 1, reg2: 0, imm: 3");

        let raw = RawInstruction::from_word(0x7800_FFFC);
        assert_eq!(format_fields(&raw), "op: 15, reg1: 0, reg2: 0, imm: -4");
    }
}
