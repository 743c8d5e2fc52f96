//! # SIMX Opcode Definitions
//!
//! Opcodes are 5 bits wide; values 0-21 are defined, 22-31 are invalid.
//!
//! ## Opcode Families
//! - 0-4: Arithmetic (SUBL, ADDL, ADDL imm, IMULL, SHRL)
//! - 5-8: Moves (register, load, store, immediate)
//! - 9: Compare (CMPL)
//! - 10-15: Branch (JE, JL, JLE, JGE, JBE, JMP)
//! - 16-19: Stack (CALL, RET, PUSHL, POPL)
//! - 20-21: Console I/O (PRINTR, READR)

use serde::{Deserialize, Serialize};

/// Instruction opcode (5 bits, values 0-21)
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    // ========== Arithmetic (0-4) ==========
    /// SUBL: r1 -= imm
    Subl = 0,
    /// ADDL: r2 += r1
    AddlRegReg = 1,
    /// ADDL: r1 += imm
    AddlImmReg = 2,
    /// IMULL: r2 *= r1
    Imull = 3,
    /// SHRL: r1 = r1 >> 1 (logical)
    Shrl = 4,

    // ========== Moves (5-8) ==========
    /// MOVL: r2 = r1
    MovlRegReg = 5,
    /// MOVL: r2 = mem[r1 + imm] (byte, zero-extended)
    MovlDerefReg = 6,
    /// MOVL: mem[r2 + imm] = r1 (low byte)
    MovlRegDeref = 7,
    /// MOVL: r1 = imm (low byte, zero-extended)
    MovlImmReg = 8,

    // ========== Compare (9) ==========
    /// CMPL: flags = compare(r2 - r1)
    Cmpl = 9,

    // ========== Branch (10-15) ==========
    /// JE: jump if ZF
    Je = 10,
    /// JL: jump if SF != OF
    Jl = 11,
    /// JLE: jump if ZF or SF != OF
    Jle = 12,
    /// JGE: jump if SF == OF
    Jge = 13,
    /// JBE: jump if CF or ZF
    Jbe = 14,
    /// JMP: always jump
    Jmp = 15,

    // ========== Stack (16-19) ==========
    /// CALL: push return address, jump
    Call = 16,
    /// RET: pop return address (or halt on an empty stack)
    Ret = 17,
    /// PUSHL: push r1
    Pushl = 18,
    /// POPL: pop into r1
    Popl = 19,

    // ========== Console I/O (20-21) ==========
    /// PRINTR: print r1
    Printr = 20,
    /// READR: read an integer into r1
    Readr = 21,
}

impl Opcode {
    /// All defined opcodes, in numeric order
    pub const ALL: [Opcode; 22] = [
        Opcode::Subl,
        Opcode::AddlRegReg,
        Opcode::AddlImmReg,
        Opcode::Imull,
        Opcode::Shrl,
        Opcode::MovlRegReg,
        Opcode::MovlDerefReg,
        Opcode::MovlRegDeref,
        Opcode::MovlImmReg,
        Opcode::Cmpl,
        Opcode::Je,
        Opcode::Jl,
        Opcode::Jle,
        Opcode::Jge,
        Opcode::Jbe,
        Opcode::Jmp,
        Opcode::Call,
        Opcode::Ret,
        Opcode::Pushl,
        Opcode::Popl,
        Opcode::Printr,
        Opcode::Readr,
    ];

    /// Convert opcode to u8
    #[inline]
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Convert u8 to opcode
    #[inline]
    pub fn from_u8(value: u8) -> Option<Self> {
        Self::ALL.get(value as usize).copied()
    }

    /// Assembly mnemonic
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Subl => "subl",
            Opcode::AddlRegReg | Opcode::AddlImmReg => "addl",
            Opcode::Imull => "imull",
            Opcode::Shrl => "shrl",
            Opcode::MovlRegReg
            | Opcode::MovlDerefReg
            | Opcode::MovlRegDeref
            | Opcode::MovlImmReg => "movl",
            Opcode::Cmpl => "cmpl",
            Opcode::Je => "je",
            Opcode::Jl => "jl",
            Opcode::Jle => "jle",
            Opcode::Jge => "jge",
            Opcode::Jbe => "jbe",
            Opcode::Jmp => "jmp",
            Opcode::Call => "call",
            Opcode::Ret => "ret",
            Opcode::Pushl => "pushl",
            Opcode::Popl => "popl",
            Opcode::Printr => "printr",
            Opcode::Readr => "readr",
        }
    }

    /// Check if this opcode transfers control by a relative offset
    pub fn is_relative_jump(self) -> bool {
        matches!(
            self,
            Opcode::Je
                | Opcode::Jl
                | Opcode::Jle
                | Opcode::Jge
                | Opcode::Jbe
                | Opcode::Jmp
                | Opcode::Call
        )
    }
}

impl std::fmt::Display for Opcode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_values_are_dense() {
        for (i, op) in Opcode::ALL.iter().enumerate() {
            assert_eq!(op.to_u8() as usize, i);
            assert_eq!(Opcode::from_u8(i as u8), Some(*op));
        }
    }

    #[test]
    fn test_undefined_opcodes() {
        for value in 22..=31u8 {
            assert_eq!(Opcode::from_u8(value), None);
        }
        assert_eq!(Opcode::from_u8(0xFF), None);
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Opcode::Subl.mnemonic(), "subl");
        assert_eq!(Opcode::AddlImmReg.mnemonic(), "addl");
        assert_eq!(Opcode::MovlDerefReg.mnemonic(), "movl");
        assert_eq!(Opcode::Readr.to_string(), "readr");
    }

    #[test]
    fn test_relative_jumps() {
        assert!(Opcode::Call.is_relative_jump());
        assert!(Opcode::Jbe.is_relative_jump());
        assert!(!Opcode::Ret.is_relative_jump());
        assert!(!Opcode::Cmpl.is_relative_jump());
    }
}
