//! # Condition Codes
//!
//! CF/ZF/SF/OF as named booleans. The packed 32-bit layout (bits 0, 6, 7
//! and 11) only appears in trace rows and register-file snapshots.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Carry flag bit
pub const CF_BIT: u32 = 1 << 0;
/// Zero flag bit
pub const ZF_BIT: u32 = 1 << 6;
/// Sign flag bit
pub const SF_BIT: u32 = 1 << 7;
/// Overflow flag bit
pub const OF_BIT: u32 = 1 << 11;

/// All meaningful bits of the packed flags word
pub const FLAGS_MASK: u32 = CF_BIT | ZF_BIT | SF_BIT | OF_BIT;

/// Condition codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Flags {
    pub carry: bool,
    pub zero: bool,
    pub sign: bool,
    pub overflow: bool,
}

impl Flags {
    /// Flags produced by comparing `second` against `first` (`second - first`)
    pub fn compare(first: i32, second: i32) -> Self {
        let result = second.wrapping_sub(first);
        Self {
            carry: (second as u32) < (first as u32),
            zero: result == 0,
            sign: (result as u32) >> 31 & 1 == 1,
            overflow: (second > 0 && first < 0 && result < 0)
                || (second < 0 && first > 0 && result > 0),
        }
    }

    /// Pack into the 32-bit flags-slot layout
    pub fn pack(self) -> u32 {
        let mut bits = 0;
        if self.carry {
            bits |= CF_BIT;
        }
        if self.zero {
            bits |= ZF_BIT;
        }
        if self.sign {
            bits |= SF_BIT;
        }
        if self.overflow {
            bits |= OF_BIT;
        }
        bits
    }

    /// Unpack from the 32-bit layout; bits outside [`FLAGS_MASK`] are ignored
    pub fn unpack(bits: u32) -> Self {
        Self {
            carry: bits & CF_BIT != 0,
            zero: bits & ZF_BIT != 0,
            sign: bits & SF_BIT != 0,
            overflow: bits & OF_BIT != 0,
        }
    }

    /// Evaluate a branch condition against these flags
    pub fn satisfies(self, condition: Condition) -> bool {
        let less = self.sign != self.overflow;
        match condition {
            Condition::Equal => self.zero,
            Condition::Less => less,
            Condition::LessOrEqual => less || self.zero,
            Condition::GreaterOrEqual => !less,
            Condition::BelowOrEqual => self.carry || self.zero,
            Condition::Always => true,
        }
    }
}

impl fmt::Display for Flags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CF={} ZF={} SF={} OF={}",
            self.carry as u8, self.zero as u8, self.sign as u8, self.overflow as u8
        )
    }
}

/// Branch condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Condition {
    /// ZF
    Equal,
    /// SF xor OF
    Less,
    /// (SF xor OF) or ZF
    LessOrEqual,
    /// not (SF xor OF)
    GreaterOrEqual,
    /// CF or ZF
    BelowOrEqual,
    /// unconditional
    Always,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_signed_conditions_match_native(a in any::<i32>(), b in any::<i32>()) {
            prop_assume!(!(b == 0 && a == i32::MIN));
            let flags = Flags::compare(a, b);
            prop_assert_eq!(flags.satisfies(Condition::Equal), b == a);
            prop_assert_eq!(flags.satisfies(Condition::Less), b < a);
            prop_assert_eq!(flags.satisfies(Condition::LessOrEqual), b <= a);
            prop_assert_eq!(flags.satisfies(Condition::GreaterOrEqual), b >= a);
        }

        #[test]
        fn test_unsigned_condition_matches_native(a in any::<i32>(), b in any::<i32>()) {
            let flags = Flags::compare(a, b);
            prop_assert_eq!(flags.satisfies(Condition::BelowOrEqual), (b as u32) <= (a as u32));
        }

        #[test]
        fn test_pack_roundtrip(bits in any::<u32>()) {
            let flags = Flags::unpack(bits);
            prop_assert_eq!(flags.pack(), bits & FLAGS_MASK);
            prop_assert_eq!(Flags::unpack(flags.pack()), flags);
        }
    }
}
