//! Instruction execution for SIMX

use crate::error::{Result, RuntimeError};
use crate::io::Console;
use crate::state::MachineState;
use simx_spec::{Flags, Instruction, RawInstruction, INSTRUCTION_SIZE};

/// Outcome of executing one instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Continue at this program counter
    Continue(u32),
    /// `ret` on an empty stack
    Exit,
}

/// Look up the instruction at `pc`
pub fn fetch(pc: u32, instructions: &[RawInstruction]) -> Result<&RawInstruction> {
    if pc % INSTRUCTION_SIZE != 0 {
        return Err(RuntimeError::MisalignedPc { pc });
    }
    instructions
        .get((pc / INSTRUCTION_SIZE) as usize)
        .ok_or(RuntimeError::PcOutOfRange {
            pc,
            end: (instructions.len() as u32).wrapping_mul(INSTRUCTION_SIZE),
        })
}

/// PC + 4 + offset, rejecting targets outside the address space
#[inline]
fn relative_target(pc: u32, offset: i32) -> Result<u32> {
    let target = pc as i64 + INSTRUCTION_SIZE as i64 + offset as i64;
    u32::try_from(target).map_err(|_| RuntimeError::JumpOutOfRange { pc, offset })
}

/// Execute the instruction at `pc` and return where to go next
pub fn execute<C: Console + ?Sized>(
    pc: u32,
    instructions: &[RawInstruction],
    state: &mut MachineState,
    io: &mut C,
) -> Result<Step> {
    let instr = Instruction::from_raw(fetch(pc, instructions)?)?;
    let next = pc.wrapping_add(INSTRUCTION_SIZE);

    match instr {
        // ========== Arithmetic ==========
        Instruction::Subl { reg, imm } => {
            state.write_reg(reg, state.read_reg(reg).wrapping_sub(imm));
        }

        Instruction::AddlRegReg { src, dst } => {
            state.write_reg(dst, state.read_reg(dst).wrapping_add(state.read_reg(src)));
        }

        Instruction::AddlImmReg { reg, imm } => {
            state.write_reg(reg, state.read_reg(reg).wrapping_add(imm));
        }

        Instruction::Imull { src, dst } => {
            state.write_reg(dst, state.read_reg(dst).wrapping_mul(state.read_reg(src)));
        }

        Instruction::Shrl { reg } => {
            state.write_reg(reg, ((state.read_reg(reg) as u32) >> 1) as i32);
        }

        // ========== Moves ==========
        Instruction::MovlRegReg { src, dst } => {
            state.write_reg(dst, state.read_reg(src));
        }

        Instruction::MovlDerefReg { base, dst, offset } => {
            let address = state.read_reg(base) as i64 + offset as i64;
            let byte = state.memory.load_byte(address)?;
            state.write_reg(dst, byte as i32);
        }

        Instruction::MovlRegDeref { src, base, offset } => {
            let address = state.read_reg(base) as i64 + offset as i64;
            state.memory.store_byte(address, state.read_reg(src) as u8)?;
        }

        Instruction::MovlImmReg { reg, imm } => {
            state.write_reg(reg, imm as u8 as i32);
        }

        // ========== Compare ==========
        Instruction::Cmpl { first, second } => {
            state.flags = Flags::compare(state.read_reg(first), state.read_reg(second));
        }

        // ========== Branch ==========
        Instruction::Je { offset }
        | Instruction::Jl { offset }
        | Instruction::Jle { offset }
        | Instruction::Jge { offset }
        | Instruction::Jbe { offset }
        | Instruction::Jmp { offset } => {
            let taken = instr
                .condition()
                .map_or(false, |cond| state.flags.satisfies(cond));
            if taken {
                return relative_target(pc, offset).map(Step::Continue);
            }
        }

        // ========== Stack ==========
        Instruction::Call { offset } => {
            let target = relative_target(pc, offset)?;
            state.push(next as i32)?;
            return Ok(Step::Continue(target));
        }

        Instruction::Ret => {
            if state.stack_is_empty() {
                return Ok(Step::Exit);
            }
            return state.pop().map(|addr| Step::Continue(addr as u32));
        }

        Instruction::Pushl { reg } => state.push_reg(reg)?,

        Instruction::Popl { reg } => state.pop_reg(reg)?,

        // ========== Console ==========
        Instruction::Printr { reg } => io.print_register(state.read_reg(reg))?,

        Instruction::Readr { reg } => {
            if let Some(value) = io.read_register()? {
                state.write_reg(reg, value);
            }
        }
    }

    Ok(Step::Continue(next))
}
