//! Main assembler logic

use crate::encoder::{encode, lower};
use crate::error::{AssemblerError, Result};
use crate::parser::{parse_line, Statement};
use simx_spec::{Program, INSTRUCTION_SIZE};
use std::collections::HashMap;

/// Assemble source code into a program
///
/// The first pass records label addresses; the second lowers and encodes
/// each statement once every label is known.
pub fn assemble(source: &str) -> Result<Program> {
    let mut labels: HashMap<String, u32> = HashMap::new();
    let mut statements: Vec<(usize, Statement)> = Vec::new();

    for (index, text) in source.lines().enumerate() {
        let line_num = index + 1;
        let line = parse_line(text).map_err(|e| e.at_line(line_num))?;
        let pc = statements.len() as u32 * INSTRUCTION_SIZE;

        if let Some(label) = line.label {
            if labels.contains_key(&label) {
                return Err(AssemblerError::DuplicateLabel(label).at_line(line_num));
            }
            labels.insert(label, pc);
        }

        if let Some(statement) = line.statement {
            statements.push((line_num, statement));
        }
    }

    let mut code = Vec::with_capacity(statements.len());
    for (index, (line_num, statement)) in statements.iter().enumerate() {
        let word = match statement {
            // Raw words go through untouched, undefined opcodes included
            Statement::Word(word) => *word,
            _ => {
                let pc = index as u32 * INSTRUCTION_SIZE;
                lower(statement, pc, &labels)
                    .and_then(|instr| encode(&instr))
                    .map_err(|e| e.at_line(*line_num))?
            }
        };
        code.push(word);
    }

    Ok(Program::new(code))
}
