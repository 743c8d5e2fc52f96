//! Machine state for SIMX

use crate::error::{Result, RuntimeError};
use crate::memory::StackMemory;
use simx_spec::{
    Flags, MachineConfig, Register, StackSlot, FLAGS_SLOT, NUM_REGISTERS, NUM_REGISTER_SLOTS,
};

/// Slot stride on the stack; `sp` always moves by this much
pub const SLOT_STRIDE: i32 = 4;

/// Register file, condition codes and stack memory
#[derive(Debug, Clone)]
pub struct MachineState {
    /// General-purpose registers (r0-r15)
    pub registers: [i32; NUM_REGISTERS],

    /// Condition codes (slot 16)
    pub flags: Flags,

    /// Stack region
    pub memory: StackMemory,

    config: MachineConfig,
}

impl MachineState {
    pub fn new(config: MachineConfig) -> Self {
        let mut state = MachineState {
            registers: [0; NUM_REGISTERS],
            flags: Flags::default(),
            memory: StackMemory::new(config.stack_size),
            config,
        };

        state.registers[Register::SP.index()] = config.initial_sp();

        state
    }

    #[inline]
    pub fn read_reg(&self, reg: Register) -> i32 {
        self.registers[reg.index()]
    }

    #[inline]
    pub fn write_reg(&mut self, reg: Register, value: i32) {
        self.registers[reg.index()] = value;
    }

    #[inline]
    pub fn sp(&self) -> i32 {
        self.read_reg(Register::SP)
    }

    pub fn config(&self) -> &MachineConfig {
        &self.config
    }

    /// True when `sp` is back at its initial value
    pub fn stack_is_empty(&self) -> bool {
        self.sp() == self.config.initial_sp()
    }

    /// All 17 slots, with the packed flags in slot 16
    pub fn register_file(&self) -> [i32; NUM_REGISTER_SLOTS] {
        let mut slots = [0; NUM_REGISTER_SLOTS];
        slots[..NUM_REGISTERS].copy_from_slice(&self.registers);
        slots[FLAGS_SLOT] = self.flags.pack() as i32;
        slots
    }

    /// Address of the next slot below `sp`; `sp` itself is not moved
    fn next_top(&self) -> Result<i64> {
        let sp = self.sp();
        let top = sp as i64 - SLOT_STRIDE as i64;
        if top < 0 {
            return Err(RuntimeError::StackOverflow { sp });
        }
        Ok(top)
    }

    fn store_slot(&mut self, address: i64, value: i32) -> Result<()> {
        match self.config.stack_slot {
            StackSlot::Word => self.memory.store_word(address, value as u32),
            StackSlot::Byte => self.memory.store_byte(address, value as u8),
        }
    }

    fn load_slot(&self, address: i64) -> Result<i32> {
        match self.config.stack_slot {
            StackSlot::Word => self.memory.load_word(address).map(|v| v as i32),
            StackSlot::Byte => self.memory.load_byte(address).map(|v| v as i32),
        }
    }

    /// Push an immediate value (used for return addresses)
    pub fn push(&mut self, value: i32) -> Result<()> {
        let top = self.next_top()?;
        self.store_slot(top, value)?;
        self.write_reg(Register::SP, top as i32);
        Ok(())
    }

    /// Push a register; `pushl %r6` stores the decremented value
    pub fn push_reg(&mut self, reg: Register) -> Result<()> {
        let top = self.next_top()?;
        let value = if reg.is_sp() {
            top as i32
        } else {
            self.read_reg(reg)
        };
        self.store_slot(top, value)?;
        self.write_reg(Register::SP, top as i32);
        Ok(())
    }

    /// Pop the top slot
    pub fn pop(&mut self) -> Result<i32> {
        let value = self.peek()?;
        self.write_reg(Register::SP, self.sp().wrapping_add(SLOT_STRIDE));
        Ok(value)
    }

    /// Pop into a register; the register is written before `sp` is
    /// incremented, so `popl %r6` leaves the popped value plus 4
    pub fn pop_reg(&mut self, reg: Register) -> Result<()> {
        let value = self.peek()?;
        self.write_reg(reg, value);
        self.write_reg(Register::SP, self.sp().wrapping_add(SLOT_STRIDE));
        Ok(())
    }

    fn peek(&self) -> Result<i32> {
        let sp = self.sp();
        let width = self.config.stack_slot.width() as i64;
        if sp as i64 + width > self.memory.size() as i64 {
            return Err(RuntimeError::StackUnderflow { sp });
        }
        self.load_slot(sp as i64)
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new(MachineConfig::DEFAULT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_state() {
        let state = MachineState::default();
        assert_eq!(state.sp(), 1024);
        assert!(state.stack_is_empty());
        assert_eq!(state.flags, Flags::default());
        for reg in 0..NUM_REGISTERS {
            if reg != Register::SP.index() {
                assert_eq!(state.registers[reg], 0);
            }
        }
        assert_eq!(state.register_file()[FLAGS_SLOT], 0);
    }

    #[test]
    fn test_push_pop_word() {
        let mut state = MachineState::default();
        state.push(0x1234_5678).unwrap();
        assert_eq!(state.sp(), 1020);
        assert_eq!(state.memory.load_word(1020).unwrap(), 0x1234_5678);
        assert_eq!(state.pop().unwrap(), 0x1234_5678);
        assert!(state.stack_is_empty());
    }

    #[test]
    fn test_push_pop_negative_word() {
        let mut state = MachineState::default();
        state.write_reg(Register::R3, -7);
        state.push_reg(Register::R3).unwrap();
        state.pop_reg(Register::R4).unwrap();
        assert_eq!(state.read_reg(Register::R4), -7);
        assert_eq!(state.sp(), 1024);
    }

    #[test]
    fn test_byte_slots_truncate() {
        let config = MachineConfig::new(1024, StackSlot::Byte).unwrap();
        let mut state = MachineState::new(config);
        state.push(0x1FF).unwrap();
        assert_eq!(state.sp(), 1020);
        assert_eq!(state.pop().unwrap(), 0xFF);
    }

    #[test]
    fn test_overflow() {
        let config = MachineConfig::new(8, StackSlot::Word).unwrap();
        let mut state = MachineState::new(config);
        state.push(1).unwrap();
        state.push(2).unwrap();
        assert!(matches!(
            state.push(3),
            Err(RuntimeError::StackOverflow { sp: 0 })
        ));
        assert_eq!(state.sp(), 0);
    }

    #[test]
    fn test_underflow() {
        let mut state = MachineState::default();
        assert!(matches!(
            state.pop(),
            Err(RuntimeError::StackUnderflow { sp: 1024 })
        ));
        assert_eq!(state.sp(), 1024);
    }

    #[test]
    fn test_push_sp_stores_decremented_value() {
        let mut state = MachineState::default();
        state.push_reg(Register::SP).unwrap();
        assert_eq!(state.memory.load_word(1020).unwrap(), 1020);
    }

    #[test]
    fn test_pop_into_sp() {
        let mut state = MachineState::default();
        state.push(100).unwrap();
        state.pop_reg(Register::SP).unwrap();
        assert_eq!(state.sp(), 104);
    }

    #[test]
    fn test_failed_push_leaves_sp_alone() {
        let mut state = MachineState::default();
        state.write_reg(Register::SP, 2000);

        assert!(matches!(
            state.push(1),
            Err(RuntimeError::OutOfBounds { address: 1996, .. })
        ));
        assert_eq!(state.sp(), 2000);

        assert!(state.push_reg(Register::SP).is_err());
        assert_eq!(state.sp(), 2000);
    }

    #[test]
    fn test_register_file_packs_flags() {
        let mut state = MachineState::default();
        state.flags = Flags::compare(1, 1);
        assert_eq!(state.register_file()[FLAGS_SLOT], 0x40);
        assert_eq!(state.register_file()[6], 1024);
    }
}
