//! Stack memory
//!
//! A fixed, zero-initialized, byte-addressable region. Every access is
//! bounds-checked; addresses are computed in `i64` so that a negative base
//! plus offset is reported instead of wrapping.

use crate::error::{Result, RuntimeError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StackMemory {
    bytes: Vec<u8>,
}

impl StackMemory {
    pub fn new(size: u32) -> Self {
        StackMemory {
            bytes: vec![0; size as usize],
        }
    }

    /// Region size in bytes
    pub fn size(&self) -> u32 {
        self.bytes.len() as u32
    }

    /// Check that `[address, address + width)` lies in the region
    fn range(&self, address: i64, width: u32) -> Result<std::ops::Range<usize>> {
        let end = address + width as i64;
        if address < 0 || end > self.bytes.len() as i64 {
            return Err(RuntimeError::OutOfBounds { address, width });
        }
        Ok(address as usize..end as usize)
    }

    pub fn load_byte(&self, address: i64) -> Result<u8> {
        let range = self.range(address, 1)?;
        Ok(self.bytes[range.start])
    }

    pub fn store_byte(&mut self, address: i64, value: u8) -> Result<()> {
        let range = self.range(address, 1)?;
        self.bytes[range.start] = value;
        Ok(())
    }

    /// Little-endian 32-bit load
    pub fn load_word(&self, address: i64) -> Result<u32> {
        let range = self.range(address, 4)?;
        let b = &self.bytes[range];
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    /// Little-endian 32-bit store
    pub fn store_word(&mut self, address: i64, value: u32) -> Result<()> {
        let range = self.range(address, 4)?;
        self.bytes[range].copy_from_slice(&value.to_le_bytes());
        Ok(())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
