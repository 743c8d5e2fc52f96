//! Lowering parsed statements to instructions, and instructions to words

use crate::error::{AssemblerError, Result};
use crate::parser::{Operand, Statement, Target};
use simx_spec::encoding::imm_to_field;
use simx_spec::{Instruction, INSTRUCTION_SIZE};
use std::collections::HashMap;

/// Operand shapes accepted by each mnemonic, for error messages
fn usage(mnemonic: &str) -> Option<&'static str> {
    let usage = match mnemonic {
        "subl" => "subl $imm, %reg",
        "addl" => "addl %src, %dst | addl $imm, %reg",
        "imull" => "imull %src, %dst",
        "shrl" => "shrl %reg",
        "movl" => "movl %src, %dst | movl $imm, %reg | movl off(%base), %dst | movl %src, off(%base)",
        "cmpl" => "cmpl %first, %second",
        "je" | "jl" | "jle" | "jge" | "jbe" | "jmp" | "call" => "<mnemonic> label | <mnemonic> offset",
        "ret" => "ret",
        "pushl" => "pushl %reg",
        "popl" => "popl %reg",
        "printr" => "printr %reg",
        "readr" => "readr %reg",
        _ => return None,
    };
    Some(usage)
}

/// Check that a value fits the 16-bit signed immediate field
fn immediate(value: i64) -> Result<i32> {
    i32::try_from(value)
        .ok()
        .filter(|&v| imm_to_field(v).is_some())
        .ok_or(AssemblerError::InvalidImmediate(value))
}

/// Offset from the instruction after `pc` to the target
fn resolve(target: &Target, pc: u32, labels: &HashMap<String, u32>) -> Result<i32> {
    let offset = match target {
        Target::Offset(offset) => *offset,
        Target::Label(name) => {
            let address = labels
                .get(name)
                .ok_or_else(|| AssemblerError::UndefinedLabel(name.clone()))?;
            *address as i64 - (pc as i64 + INSTRUCTION_SIZE as i64)
        }
    };
    immediate(offset)
}

/// Lower a parsed instruction at `pc`
pub fn lower(statement: &Statement, pc: u32, labels: &HashMap<String, u32>) -> Result<Instruction> {
    let (mnemonic, operands) = match statement {
        Statement::Instruction { mnemonic, operands } => (mnemonic.as_str(), operands.as_slice()),
        Statement::Word(word) => return Ok(Instruction::decode(*word)?),
    };

    let instr = match (mnemonic, operands) {
        // ========== Arithmetic ==========
        ("subl", [Operand::Immediate(imm), Operand::Register(reg)]) => Instruction::Subl {
            reg: *reg,
            imm: immediate(*imm)?,
        },
        ("addl", [Operand::Register(src), Operand::Register(dst)]) => {
            Instruction::AddlRegReg { src: *src, dst: *dst }
        }
        ("addl", [Operand::Immediate(imm), Operand::Register(reg)]) => Instruction::AddlImmReg {
            reg: *reg,
            imm: immediate(*imm)?,
        },
        ("imull", [Operand::Register(src), Operand::Register(dst)]) => {
            Instruction::Imull { src: *src, dst: *dst }
        }
        ("shrl", [Operand::Register(reg)]) => Instruction::Shrl { reg: *reg },

        // ========== Moves ==========
        ("movl", [Operand::Register(src), Operand::Register(dst)]) => {
            Instruction::MovlRegReg { src: *src, dst: *dst }
        }
        ("movl", [Operand::Memory { offset, base }, Operand::Register(dst)]) => Instruction::MovlDerefReg {
            base: *base,
            dst: *dst,
            offset: immediate(*offset)?,
        },
        ("movl", [Operand::Register(src), Operand::Memory { offset, base }]) => Instruction::MovlRegDeref {
            src: *src,
            base: *base,
            offset: immediate(*offset)?,
        },
        ("movl", [Operand::Immediate(imm), Operand::Register(reg)]) => Instruction::MovlImmReg {
            reg: *reg,
            imm: immediate(*imm)?,
        },

        // ========== Compare / Branch ==========
        ("cmpl", [Operand::Register(first), Operand::Register(second)]) => Instruction::Cmpl {
            first: *first,
            second: *second,
        },
        ("je", [Operand::Target(t)]) => Instruction::Je { offset: resolve(t, pc, labels)? },
        ("jl", [Operand::Target(t)]) => Instruction::Jl { offset: resolve(t, pc, labels)? },
        ("jle", [Operand::Target(t)]) => Instruction::Jle { offset: resolve(t, pc, labels)? },
        ("jge", [Operand::Target(t)]) => Instruction::Jge { offset: resolve(t, pc, labels)? },
        ("jbe", [Operand::Target(t)]) => Instruction::Jbe { offset: resolve(t, pc, labels)? },
        ("jmp", [Operand::Target(t)]) => Instruction::Jmp { offset: resolve(t, pc, labels)? },

        // ========== Stack ==========
        ("call", [Operand::Target(t)]) => Instruction::Call { offset: resolve(t, pc, labels)? },
        ("ret", []) => Instruction::Ret,
        ("pushl", [Operand::Register(reg)]) => Instruction::Pushl { reg: *reg },
        ("popl", [Operand::Register(reg)]) => Instruction::Popl { reg: *reg },

        // ========== Console ==========
        ("printr", [Operand::Register(reg)]) => Instruction::Printr { reg: *reg },
        ("readr", [Operand::Register(reg)]) => Instruction::Readr { reg: *reg },

        (mnemonic, _) => {
            return Err(match usage(mnemonic) {
                Some(expected) => AssemblerError::InvalidOperands {
                    mnemonic: mnemonic.to_string(),
                    expected,
                },
                None => AssemblerError::UnknownInstruction(mnemonic.to_string()),
            })
        }
    };

    Ok(instr)
}

/// Encode instruction to a 32-bit word, checking the immediate fits
pub fn encode(instr: &Instruction) -> Result<u32> {
    let imm = match *instr {
        Instruction::Subl { imm, .. }
        | Instruction::AddlImmReg { imm, .. }
        | Instruction::MovlImmReg { imm, .. } => Some(imm),
        Instruction::MovlDerefReg { offset, .. } | Instruction::MovlRegDeref { offset, .. } => {
            Some(offset)
        }
        _ => instr.jump_offset(),
    };

    if let Some(imm) = imm {
        immediate(imm as i64)?;
    }

    Ok(instr.encode())
}
