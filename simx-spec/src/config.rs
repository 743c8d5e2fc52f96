//! # Machine Configuration
//!
//! Sizes the stack region and selects how wide a stack slot is. The default
//! is the 1024-byte stack with 4-byte slots.

use std::fmt;

/// Width of a value moved by `call`, `ret`, `pushl` and `popl`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum StackSlot {
    /// Four bytes, little-endian
    #[default]
    Word,
    /// A single byte: the value is truncated on push and zero-extended on pop
    Byte,
}

impl StackSlot {
    /// Number of bytes actually stored for one slot
    #[inline]
    pub const fn width(&self) -> u32 {
        match self {
            StackSlot::Word => 4,
            StackSlot::Byte => 1,
        }
    }
}

/// Machine configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MachineConfig {
    /// Stack region size in bytes (multiple of 4, 4..=65536)
    pub stack_size: u32,
    /// Stack slot width
    pub stack_slot: StackSlot,
}

impl MachineConfig {
    /// Smallest allowed stack region
    pub const MIN_STACK_SIZE: u32 = 4;

    /// Largest allowed stack region
    pub const MAX_STACK_SIZE: u32 = 1 << 16;

    /// Default configuration: 1024-byte stack, word-sized slots
    pub const DEFAULT: Self = Self {
        stack_size: crate::DEFAULT_STACK_SIZE,
        stack_slot: StackSlot::Word,
    };

    /// Create a new configuration with validation
    pub const fn new(stack_size: u32, stack_slot: StackSlot) -> Result<Self, ConfigError> {
        if stack_size < Self::MIN_STACK_SIZE {
            return Err(ConfigError::StackTooSmall);
        }
        if stack_size > Self::MAX_STACK_SIZE {
            return Err(ConfigError::StackTooLarge);
        }
        if stack_size % 4 != 0 {
            return Err(ConfigError::UnalignedStackSize);
        }

        Ok(Self {
            stack_size,
            stack_slot,
        })
    }

    /// Initial stack pointer: the top of the stack region
    #[inline]
    pub const fn initial_sp(&self) -> i32 {
        self.stack_size as i32
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::new(self.stack_size, self.stack_slot).map(|_| ())
    }
}

impl Default for MachineConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for MachineConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MachineConfig {{ stack: {} bytes, slot: {} byte(s) }}",
            self.stack_size,
            self.stack_slot.width(),
        )
    }
}

/// Configuration error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Stack must hold at least one slot
    StackTooSmall,
    /// Stack must fit in 64 KB
    StackTooLarge,
    /// Stack size must be a multiple of 4
    UnalignedStackSize,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::StackTooSmall => write!(f, "stack_size must be at least 4 bytes"),
            ConfigError::StackTooLarge => write!(f, "stack_size must be at most 65536 bytes"),
            ConfigError::UnalignedStackSize => write!(f, "stack_size must be a multiple of 4"),
        }
    }
}

impl std::error::Error for ConfigError {}
