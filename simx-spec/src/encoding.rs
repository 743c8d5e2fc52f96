//! # Instruction Encoding Constants and Helpers
//!
//! ## Instruction Format (32-bit, most significant bit first)
//!
//! ```text
//! [opcode:5][first_register:5][second_register:5][immediate window:17]
//!  31..27    26..22             21..17              16..0
//! ```
//!
//! The immediate window is 17 bits wide but only its low 16 bits are
//! extracted; bit 16 of the word never reaches an instruction. Encoders on
//! the other side of the format rely on that truncation, so it is kept.

// ============================================================================
// Bit Position Constants
// ============================================================================

/// Opcode field: bits 27-31 (5 bits)
pub const OPCODE_SHIFT: u32 = 27;

/// First register field: bits 22-26 (5 bits)
pub const FIRST_REGISTER_SHIFT: u32 = 22;

/// Second register field: bits 17-21 (5 bits)
pub const SECOND_REGISTER_SHIFT: u32 = 17;

/// Immediate field: bits 0-15
pub const IMM_SHIFT: u32 = 0;

// ============================================================================
// Field Masks
// ============================================================================

/// Opcode and register fields are all 5 bits
pub const FIELD_MASK: u32 = 0x1F;

/// Extracted immediate (16 bits)
pub const IMM_MASK: u32 = 0xFFFF;

/// Space left below the register fields (17 bits)
pub const IMM_WINDOW_MASK: u32 = 0x1FFFF;

/// The window bit that extraction discards
pub const DISCARDED_BIT: u32 = 1 << 16;

// ============================================================================
// Field Extraction Functions
// ============================================================================

/// Extract opcode from instruction (bits 27-31)
#[inline]
pub const fn extract_opcode(word: u32) -> u8 {
    ((word >> OPCODE_SHIFT) & FIELD_MASK) as u8
}

/// Extract first register index (bits 22-26)
#[inline]
pub const fn extract_first_register(word: u32) -> u8 {
    ((word >> FIRST_REGISTER_SHIFT) & FIELD_MASK) as u8
}

/// Extract second register index (bits 17-21)
#[inline]
pub const fn extract_second_register(word: u32) -> u8 {
    ((word >> SECOND_REGISTER_SHIFT) & FIELD_MASK) as u8
}

/// Extract the 16-bit immediate (bits 0-15)
#[inline]
pub const fn extract_imm(word: u32) -> u16 {
    ((word >> IMM_SHIFT) & IMM_MASK) as u16
}

/// Extract the immediate with sign extension from 16 bits
#[inline]
pub const fn extract_imm_signed(word: u32) -> i32 {
    extract_imm(word) as i16 as i32
}

// ============================================================================
// Encoding Functions
// ============================================================================

/// Pack the four fields into a word; bit 16 is always left clear
#[inline]
pub const fn encode_word(opcode: u8, first: u8, second: u8, imm: u16) -> u32 {
    ((opcode as u32 & FIELD_MASK) << OPCODE_SHIFT)
        | ((first as u32 & FIELD_MASK) << FIRST_REGISTER_SHIFT)
        | ((second as u32 & FIELD_MASK) << SECOND_REGISTER_SHIFT)
        | ((imm as u32 & IMM_MASK) << IMM_SHIFT)
}

/// Convert a signed immediate to its 16-bit field, if it fits
#[inline]
pub fn imm_to_field(imm: i32) -> Option<u16> {
    i16::try_from(imm).ok().map(|v| v as u16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_layout() {
        let word = encode_word(21, 15, 9, 0xBEEF);
        assert_eq!(word >> 27, 21);
        assert_eq!(extract_opcode(word), 21);
        assert_eq!(extract_first_register(word), 15);
        assert_eq!(extract_second_register(word), 9);
        assert_eq!(extract_imm(word), 0xBEEF);
    }

    #[test]
    fn test_bit_16_is_discarded() {
        let word = encode_word(2, 1, 0, 5) | DISCARDED_BIT;
        assert_eq!(extract_imm(word), 5);
        assert_eq!(extract_second_register(word), 0);
    }

    #[test]
    fn test_sign_extension() {
        assert_eq!(extract_imm_signed(0x0000_FFFF), -1);
        assert_eq!(extract_imm_signed(0x0000_8000), -32768);
        assert_eq!(extract_imm_signed(0x0000_7FFF), 32767);
        assert_eq!(extract_imm_signed(0x0000_0004), 4);
    }

    #[test]
    fn test_imm_to_field() {
        assert_eq!(imm_to_field(-4), Some(0xFFFC));
        assert_eq!(imm_to_field(32767), Some(0x7FFF));
        assert_eq!(imm_to_field(32768), None);
        assert_eq!(imm_to_field(-32769), None);
    }

    #[test]
    fn test_fields_are_masked() {
        // Oversized fields must not bleed into neighbours
        let word = encode_word(0xFF, 0xFF, 0xFF, 0);
        assert_eq!(extract_opcode(word), 0x1F);
        assert_eq!(extract_first_register(word), 0x1F);
        assert_eq!(extract_second_register(word), 0x1F);
        assert_eq!(word & IMM_WINDOW_MASK, 0);
    }
}
