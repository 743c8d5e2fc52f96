//! # SIMX Disassembler
//!
//! Turn SIMX instruction words back into assembly text.
//!
//! Two views are provided:
//!
//! - [`disassemble`]: an address/hex/assembly listing of a whole program
//! - [`listing`]: the raw field dump (`op: N, reg1: N, reg2: N, imm: N`)
//!
//! ## Example
//!
//! ```rust
//! use simx_spec::Program;
//! use simx_disassembler::disassemble;
//!
//! let program = Program::new(vec![0x4000_0005, 0x8800_0000]);
//! let asm = disassemble(&program);
//! assert!(asm.contains("movl $5, %r0"));
//! ```

pub mod decoder;
pub mod disassembler;
pub mod error;
pub mod formatter;

pub use decoder::decode;
pub use disassembler::{disassemble, listing};
pub use error::{DisassemblerError, Result};
pub use formatter::{format, format_at, format_fields};
