//! # Execution Trace Types

use crate::flags::Flags;
use crate::register::{FLAGS_SLOT, NUM_REGISTERS, NUM_REGISTER_SLOTS};
use serde::{Deserialize, Serialize};

/// A single execution trace row
///
/// Records the machine state *before* the instruction at `pc` executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceRow {
    /// Cycle number (0-based)
    pub cycle: u64,

    /// Program counter
    pub pc: u32,

    /// Encoded instruction word
    pub word: u32,

    /// General-purpose registers
    pub registers: [i32; NUM_REGISTERS],

    /// Packed flags (bits 0, 6, 7, 11)
    pub flags: u32,
}

impl TraceRow {
    pub fn new(cycle: u64, pc: u32, word: u32, registers: [i32; NUM_REGISTERS], flags: Flags) -> Self {
        Self {
            cycle,
            pc,
            word,
            registers,
            flags: flags.pack(),
        }
    }

    /// All 17 slots, with the packed flags in slot 16
    pub fn register_file(&self) -> [i32; NUM_REGISTER_SLOTS] {
        let mut slots = [0; NUM_REGISTER_SLOTS];
        slots[..NUM_REGISTERS].copy_from_slice(&self.registers);
        slots[FLAGS_SLOT] = self.flags as i32;
        slots
    }
}
