//! SIMX Instruction Set
//!
//! Two views of an instruction:
//! - [`RawInstruction`]: the four bit fields exactly as decoded. Decoding is
//!   total, so every word produces one, including words with undefined opcodes.
//! - [`Instruction`]: a typed operation with resolved register operands.
//!   Built from a raw record only when it is about to run, which is where an
//!   undefined opcode or a bad register index becomes an error.

use crate::encoding;
use crate::error::{Result, SpecError};
use crate::flags::Condition;
use crate::opcode::Opcode;
use crate::register::Register;
use serde::{Deserialize, Serialize};

/// Decoded bit fields of one instruction word
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct RawInstruction {
    /// Opcode field (0-31)
    pub opcode: u8,
    /// First register field (0-31)
    pub first_register: u8,
    /// Second register field (0-31)
    pub second_register: u8,
    /// Low 16 bits of the immediate window
    pub immediate: u16,
}

impl RawInstruction {
    /// Decode a word; never fails
    pub const fn from_word(word: u32) -> Self {
        Self {
            opcode: encoding::extract_opcode(word),
            first_register: encoding::extract_first_register(word),
            second_register: encoding::extract_second_register(word),
            immediate: encoding::extract_imm(word),
        }
    }

    /// Encode back to a word (bit 16 clear)
    pub const fn to_word(&self) -> u32 {
        encoding::encode_word(
            self.opcode,
            self.first_register,
            self.second_register,
            self.immediate,
        )
    }

    /// Opcode, if defined
    pub fn opcode(&self) -> Option<Opcode> {
        Opcode::from_u8(self.opcode)
    }

    /// Immediate sign-extended from 16 bits
    #[inline]
    pub const fn signed_immediate(&self) -> i32 {
        self.immediate as i16 as i32
    }
}

/// SIMX instruction
///
/// Operand naming follows the encoding: for two-register forms the first
/// register field is the source and the second is the destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Instruction {
    // ========== Arithmetic ==========
    /// SUBL: reg -= imm
    Subl { reg: Register, imm: i32 },

    /// ADDL: dst += src
    AddlRegReg { src: Register, dst: Register },

    /// ADDL: reg += imm
    AddlImmReg { reg: Register, imm: i32 },

    /// IMULL: dst *= src (low 32 bits)
    Imull { src: Register, dst: Register },

    /// SHRL: reg = reg >> 1 (logical)
    Shrl { reg: Register },

    // ========== Moves ==========
    /// MOVL: dst = src
    MovlRegReg { src: Register, dst: Register },

    /// MOVL: dst = zero_extend(mem[base + offset][7:0])
    MovlDerefReg { base: Register, dst: Register, offset: i32 },

    /// MOVL: mem[base + offset] = src[7:0]
    MovlRegDeref { src: Register, base: Register, offset: i32 },

    /// MOVL: reg = zero_extend(imm[7:0])
    MovlImmReg { reg: Register, imm: i32 },

    // ========== Compare ==========
    /// CMPL: flags = compare(second - first)
    Cmpl { first: Register, second: Register },

    // ========== Branch ==========
    /// JE: if ZF, PC += 4 + offset
    Je { offset: i32 },

    /// JL: if SF != OF, PC += 4 + offset
    Jl { offset: i32 },

    /// JLE: if ZF or SF != OF, PC += 4 + offset
    Jle { offset: i32 },

    /// JGE: if SF == OF, PC += 4 + offset
    Jge { offset: i32 },

    /// JBE: if CF or ZF, PC += 4 + offset
    Jbe { offset: i32 },

    /// JMP: PC += 4 + offset
    Jmp { offset: i32 },

    // ========== Stack ==========
    /// CALL: push PC + 4; PC += 4 + offset
    Call { offset: i32 },

    /// RET: halt on an empty stack, otherwise pop PC
    Ret,

    /// PUSHL: push reg
    Pushl { reg: Register },

    /// POPL: pop into reg
    Popl { reg: Register },

    // ========== Console ==========
    /// PRINTR: write reg as decimal and hex
    Printr { reg: Register },

    /// READR: read a decimal integer into reg
    Readr { reg: Register },
}

/// Resolve a register field used as an operand
fn operand(index: u8) -> Result<Register> {
    Register::from_index(index as usize).ok_or(SpecError::InvalidRegister(index))
}

impl Instruction {
    /// Resolve a raw record into a typed instruction
    ///
    /// Only the register fields the operation actually uses are checked.
    pub fn from_raw(raw: &RawInstruction) -> Result<Self> {
        let opcode = raw.opcode().ok_or(SpecError::InvalidOpcode(raw.opcode))?;
        let imm = raw.signed_immediate();
        let first = || operand(raw.first_register);
        let second = || operand(raw.second_register);

        let instr = match opcode {
            Opcode::Subl => Instruction::Subl { reg: first()?, imm },
            Opcode::AddlRegReg => Instruction::AddlRegReg {
                src: first()?,
                dst: second()?,
            },
            Opcode::AddlImmReg => Instruction::AddlImmReg { reg: first()?, imm },
            Opcode::Imull => Instruction::Imull {
                src: first()?,
                dst: second()?,
            },
            Opcode::Shrl => Instruction::Shrl { reg: first()? },
            Opcode::MovlRegReg => Instruction::MovlRegReg {
                src: first()?,
                dst: second()?,
            },
            Opcode::MovlDerefReg => Instruction::MovlDerefReg {
                base: first()?,
                dst: second()?,
                offset: imm,
            },
            Opcode::MovlRegDeref => Instruction::MovlRegDeref {
                src: first()?,
                base: second()?,
                offset: imm,
            },
            Opcode::MovlImmReg => Instruction::MovlImmReg { reg: first()?, imm },
            Opcode::Cmpl => Instruction::Cmpl {
                first: first()?,
                second: second()?,
            },
            Opcode::Je => Instruction::Je { offset: imm },
            Opcode::Jl => Instruction::Jl { offset: imm },
            Opcode::Jle => Instruction::Jle { offset: imm },
            Opcode::Jge => Instruction::Jge { offset: imm },
            Opcode::Jbe => Instruction::Jbe { offset: imm },
            Opcode::Jmp => Instruction::Jmp { offset: imm },
            Opcode::Call => Instruction::Call { offset: imm },
            Opcode::Ret => Instruction::Ret,
            Opcode::Pushl => Instruction::Pushl { reg: first()? },
            Opcode::Popl => Instruction::Popl { reg: first()? },
            Opcode::Printr => Instruction::Printr { reg: first()? },
            Opcode::Readr => Instruction::Readr { reg: first()? },
        };

        Ok(instr)
    }

    /// Decode a word straight to a typed instruction
    pub fn decode(word: u32) -> Result<Self> {
        Self::from_raw(&RawInstruction::from_word(word))
    }

    /// Lower to raw fields; unused fields are zero and the immediate keeps
    /// its low 16 bits
    pub fn to_raw(&self) -> RawInstruction {
        let (first, second, imm) = match *self {
            Instruction::Subl { reg, imm }
            | Instruction::AddlImmReg { reg, imm }
            | Instruction::MovlImmReg { reg, imm } => (reg.index(), 0, imm),
            Instruction::AddlRegReg { src, dst }
            | Instruction::Imull { src, dst }
            | Instruction::MovlRegReg { src, dst } => (src.index(), dst.index(), 0),
            Instruction::Shrl { reg }
            | Instruction::Pushl { reg }
            | Instruction::Popl { reg }
            | Instruction::Printr { reg }
            | Instruction::Readr { reg } => (reg.index(), 0, 0),
            Instruction::MovlDerefReg { base, dst, offset } => (base.index(), dst.index(), offset),
            Instruction::MovlRegDeref { src, base, offset } => (src.index(), base.index(), offset),
            Instruction::Cmpl { first, second } => (first.index(), second.index(), 0),
            Instruction::Je { offset }
            | Instruction::Jl { offset }
            | Instruction::Jle { offset }
            | Instruction::Jge { offset }
            | Instruction::Jbe { offset }
            | Instruction::Jmp { offset }
            | Instruction::Call { offset } => (0, 0, offset),
            Instruction::Ret => (0, 0, 0),
        };

        RawInstruction {
            opcode: self.opcode().to_u8(),
            first_register: first as u8,
            second_register: second as u8,
            immediate: imm as u16,
        }
    }

    /// Encode to a 32-bit word
    pub fn encode(&self) -> u32 {
        self.to_raw().to_word()
    }

    /// Get the opcode
    pub fn opcode(&self) -> Opcode {
        match self {
            Instruction::Subl { .. } => Opcode::Subl,
            Instruction::AddlRegReg { .. } => Opcode::AddlRegReg,
            Instruction::AddlImmReg { .. } => Opcode::AddlImmReg,
            Instruction::Imull { .. } => Opcode::Imull,
            Instruction::Shrl { .. } => Opcode::Shrl,
            Instruction::MovlRegReg { .. } => Opcode::MovlRegReg,
            Instruction::MovlDerefReg { .. } => Opcode::MovlDerefReg,
            Instruction::MovlRegDeref { .. } => Opcode::MovlRegDeref,
            Instruction::MovlImmReg { .. } => Opcode::MovlImmReg,
            Instruction::Cmpl { .. } => Opcode::Cmpl,
            Instruction::Je { .. } => Opcode::Je,
            Instruction::Jl { .. } => Opcode::Jl,
            Instruction::Jle { .. } => Opcode::Jle,
            Instruction::Jge { .. } => Opcode::Jge,
            Instruction::Jbe { .. } => Opcode::Jbe,
            Instruction::Jmp { .. } => Opcode::Jmp,
            Instruction::Call { .. } => Opcode::Call,
            Instruction::Ret => Opcode::Ret,
            Instruction::Pushl { .. } => Opcode::Pushl,
            Instruction::Popl { .. } => Opcode::Popl,
            Instruction::Printr { .. } => Opcode::Printr,
            Instruction::Readr { .. } => Opcode::Readr,
        }
    }

    /// Get instruction mnemonic
    pub fn mnemonic(&self) -> &'static str {
        self.opcode().mnemonic()
    }

    /// Branch condition for jumps (`Always` for `jmp`), `None` otherwise
    pub fn condition(&self) -> Option<Condition> {
        match self {
            Instruction::Je { .. } => Some(Condition::Equal),
            Instruction::Jl { .. } => Some(Condition::Less),
            Instruction::Jle { .. } => Some(Condition::LessOrEqual),
            Instruction::Jge { .. } => Some(Condition::GreaterOrEqual),
            Instruction::Jbe { .. } => Some(Condition::BelowOrEqual),
            Instruction::Jmp { .. } => Some(Condition::Always),
            _ => None,
        }
    }

    /// Relative offset for jumps and calls
    pub fn jump_offset(&self) -> Option<i32> {
        match self {
            Instruction::Je { offset }
            | Instruction::Jl { offset }
            | Instruction::Jle { offset }
            | Instruction::Jge { offset }
            | Instruction::Jbe { offset }
            | Instruction::Jmp { offset }
            | Instruction::Call { offset } => Some(*offset),
            _ => None,
        }
    }

    /// Check if this instruction touches the stack region
    pub fn is_stack_op(&self) -> bool {
        matches!(
            self,
            Instruction::Call { .. }
                | Instruction::Ret
                | Instruction::Pushl { .. }
                | Instruction::Popl { .. }
        )
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let m = self.mnemonic();
        match self {
            Instruction::Subl { reg, imm }
            | Instruction::AddlImmReg { reg, imm }
            | Instruction::MovlImmReg { reg, imm } => write!(f, "{} ${}, {}", m, imm, reg),

            Instruction::AddlRegReg { src, dst }
            | Instruction::Imull { src, dst }
            | Instruction::MovlRegReg { src, dst } => write!(f, "{} {}, {}", m, src, dst),

            Instruction::MovlDerefReg { base, dst, offset } => {
                write!(f, "{} {}({}), {}", m, offset, base, dst)
            }
            Instruction::MovlRegDeref { src, base, offset } => {
                write!(f, "{} {}, {}({})", m, src, offset, base)
            }

            Instruction::Cmpl { first, second } => write!(f, "{} {}, {}", m, first, second),

            Instruction::Je { offset }
            | Instruction::Jl { offset }
            | Instruction::Jle { offset }
            | Instruction::Jge { offset }
            | Instruction::Jbe { offset }
            | Instruction::Jmp { offset }
            | Instruction::Call { offset } => write!(f, "{} {}", m, offset),

            Instruction::Ret => write!(f, "ret"),

            Instruction::Shrl { reg }
            | Instruction::Pushl { reg }
            | Instruction::Popl { reg }
            | Instruction::Printr { reg }
            | Instruction::Readr { reg } => write!(f, "{} {}", m, reg),
        }
    }
}
