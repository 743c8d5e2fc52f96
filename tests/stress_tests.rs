//! Stress tests: long-running programs, deep recursion and arbitrary images

use proptest::prelude::*;
use simx_assembler::assemble;
use simx_runtime::{run, HaltReason, IOHandler, RuntimeError, VMConfig, VM};
use simx_spec::Program;

#[test]
fn test_long_countdown() {
    let source = r#"
            # r0 = 0xFFFF
            movl $255, %r0
            movl %r0, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r1
            addl %r1, %r0
            movl $0, %r2
        loop:
            cmpl %r2, %r0
            je done
            subl $1, %r0
            jmp loop
        done:
            ret
    "#;

    let program = assemble(source).unwrap();
    let (result, _) = run(&program, "").unwrap();
    assert_eq!(result.halt_reason, HaltReason::Return);
    assert_eq!(result.registers[0], 0);
    // 12 setup + 4 per iteration + final cmpl/je + ret
    assert_eq!(result.cycles, 12 + 4 * 0xFFFF + 3);
}

#[test]
fn test_unbounded_recursion_overflows_the_stack() {
    let program = assemble("recurse: call recurse").unwrap();
    let err = run(&program, "").unwrap_err();
    assert!(matches!(err, RuntimeError::StackOverflow { sp: 0 }));
}

#[test]
fn test_recursion_fills_stack_exactly() {
    // 256 word slots fit in 1024 bytes
    let source = r#"
            movl $255, %r0
            addl $1, %r0
            call down
            ret
        down:
            movl $0, %r1
            cmpl %r1, %r0
            je bottom
            subl $1, %r0
            call down
        bottom:
            ret
    "#;
    let program = assemble(source).unwrap();
    let err = run(&program, "").unwrap_err();
    assert!(matches!(err, RuntimeError::StackOverflow { .. }));

    let program = assemble(&source.replace("addl $1, %r0", "subl $1, %r0")).unwrap();
    let (result, _) = run(&program, "").unwrap();
    assert_eq!(result.registers[6], 1024);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Any image either halts or reports an error; nothing panics
    #[test]
    fn prop_arbitrary_images_never_panic(
        code in prop::collection::vec(any::<u32>(), 0..64),
        input in "[ 0-9\\n-]{0,32}",
    ) {
        let program = Program::new(code);
        let config = VMConfig {
            max_cycles: Some(10_000),
            ..Default::default()
        };
        let io = IOHandler::new(input.as_bytes(), Vec::new());
        let mut vm = VM::new(&program, config, io).unwrap();

        if let Ok(result) = vm.run() {
            prop_assert!(result.cycles <= 10_000);
            if result.halt_reason == HaltReason::EndOfProgram {
                prop_assert_eq!(result.pc as usize, program.len() * 4);
            }
        }
    }
}
