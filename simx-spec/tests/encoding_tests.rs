//! Encoding tests across the raw and typed instruction views

use proptest::prelude::*;
use simx_spec::encoding::*;
use simx_spec::{Instruction, Opcode, RawInstruction, Register, SpecError};

// ============================================================================
// Field Round-trips
// ============================================================================

#[test]
fn test_register_fields_all_combinations() {
    for first in 0..32u8 {
        for second in 0..32u8 {
            let word = encode_word(Opcode::Cmpl.to_u8(), first, second, 0);
            let raw = RawInstruction::from_word(word);
            assert_eq!(raw.first_register, first);
            assert_eq!(raw.second_register, second);
            assert_eq!(raw.opcode, Opcode::Cmpl.to_u8());
        }
    }
}

#[test]
fn test_every_defined_opcode_resolves() {
    for op in Opcode::ALL {
        let word = encode_word(op.to_u8(), 1, 2, 4);
        let instr = Instruction::decode(word).unwrap();
        assert_eq!(instr.opcode(), op);
    }
}

#[test]
fn test_undefined_opcodes_fail_to_resolve() {
    for opcode in 22..32u8 {
        let word = encode_word(opcode, 0, 0, 0);
        // Raw decoding still succeeds
        assert_eq!(RawInstruction::from_word(word).opcode, opcode);
        assert!(matches!(
            Instruction::decode(word),
            Err(SpecError::InvalidOpcode(op)) if op == opcode
        ));
    }
}

#[test]
fn test_scenario_words() {
    // movl $5, %r0 ; movl $3, %r1 ; addl %r0, %r1
    let program = [
        Instruction::MovlImmReg { reg: Register::R0, imm: 5 },
        Instruction::MovlImmReg { reg: Register::R1, imm: 3 },
        Instruction::AddlRegReg { src: Register::R0, dst: Register::R1 },
    ];
    let words: Vec<u32> = program.iter().map(Instruction::encode).collect();
    assert_eq!(words, vec![0x4000_0005, 0x4040_0003, 0x0802_0000]);
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    #[test]
    fn test_raw_roundtrip_ignoring_bit_16(word in any::<u32>()) {
        let raw = RawInstruction::from_word(word);
        prop_assert_eq!(raw.to_word(), word & !DISCARDED_BIT);
    }

    #[test]
    fn test_opcode_and_register_fields_roundtrip(
        opcode in 0u8..32,
        first in 0u8..32,
        second in 0u8..32,
        imm in any::<u16>(),
    ) {
        let raw = RawInstruction::from_word(encode_word(opcode, first, second, imm));
        prop_assert_eq!(raw.opcode, opcode);
        prop_assert_eq!(raw.first_register, first);
        prop_assert_eq!(raw.second_register, second);
        prop_assert_eq!(raw.immediate, imm);
    }

    #[test]
    fn test_typed_roundtrip(opcode in 0u8..22, first in 0u8..16, second in 0u8..16, imm in any::<u16>()) {
        let instr = Instruction::decode(encode_word(opcode, first, second, imm)).unwrap();
        let again = Instruction::decode(instr.encode()).unwrap();
        prop_assert_eq!(instr, again);
    }
}
