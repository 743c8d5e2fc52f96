//! SIMX Assembler
//!
//! Assemble AT&T-style SIMX assembly into instruction words.
//!
//! Source operand comes first: `addl %r0, %r1` adds r0 into r1, and
//! `cmpl %r0, %r1` compares r1 against r0. Branches take a label or a raw
//! offset relative to the next instruction. `.word n` emits a raw word.
//!
//! ## Example
//!
//! ```rust
//! use simx_assembler::assemble;
//!
//! let source = r#"
//!     movl $5, %r0
//!     movl $3, %r1
//!     addl %r0, %r1
//! "#;
//!
//! let program = assemble(source).unwrap();
//! assert_eq!(program.code, vec![0x4000_0005, 0x4040_0003, 0x0802_0000]);
//! ```

pub mod assembler;
pub mod encoder;
pub mod error;
pub mod lexer;
pub mod parser;

pub use assembler::assemble;
pub use encoder::encode;
pub use error::{AssemblerError, Result};
pub use parser::{parse_instruction, parse_register};
