//! Main disassembler logic

use crate::decoder::decode;
use crate::formatter::{format_at, format_fields};
use simx_spec::{Program, RawInstruction, INSTRUCTION_SIZE};
use std::fmt::Write;

/// Disassemble a program into an address/hex/assembly listing
///
/// Words that do not decode are listed with an `; ERROR` comment.
pub fn disassemble(program: &Program) -> String {
    let mut output = String::new();

    output.push_str("; SIMX Disassembly\n");
    let _ = writeln!(
        output,
        "; Code size: {} bytes ({} instructions)",
        program.end_pc(),
        program.len()
    );
    let _ = writeln!(output, "; SHA-256: {}", program.hash_hex());
    output.push('\n');

    for (index, &word) in program.code.iter().enumerate() {
        let pc = index as u32 * INSTRUCTION_SIZE;
        let _ = write!(output, "0x{:04x}:  {:08x}  ", pc, word);

        match decode(word) {
            Ok(instr) => output.push_str(&format_at(&instr, pc)),
            Err(e) => {
                let _ = write!(output, "; ERROR: {}", e);
            }
        }

        output.push('\n');
    }

    output
}

/// Dump decoded fields, one instruction per line
pub fn listing(instructions: &[RawInstruction]) -> String {
    let mut output = String::from("instructions: \n");
    for raw in instructions {
        output.push_str(&format_fields(raw));
        output.push('\n');
    }
    output.push_str("--------------\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disassemble_simple() {
        let program = Program::new(vec![0x4000_0005, 0x8800_0000]);
        let asm = disassemble(&program);

        assert!(asm.contains("; Code size: 8 bytes (2 instructions)"));
        assert!(asm.contains("0x0000:  40000005  movl $5, %r0"));
        assert!(asm.contains("0x0004:  88000000  ret"));
    }

    #[test]
    fn test_disassemble_bad_word() {
        let program = Program::new(vec![0xF800_0000]);
        let asm = disassemble(&program);
        assert!(asm.contains("; ERROR: Unknown opcode: 31"));
    }

    #[test]
    fn test_listing_format() {
        let program = Program::new(vec![0x4000_0005, 0x0802_0000]);
        assert_eq!(
            listing(&program.decode()),
            "instructions: \n\
             op: 8, reg1: 0, reg2: 0, imm: 5\n\
             op: 1, reg1: 0, reg2: 1, imm: 0\n\
             --------------\n"
        );
    }

    #[test]
    fn test_listing_empty() {
        assert_eq!(listing(&[]), "instructions: \n--------------\n");
    }
}
