//! Assembly parser
//!
//! Turns one source line into an optional label and an optional statement.
//! Operands are kept symbolic here; label resolution and range checks happen
//! in the encoder once every label's address is known.

use crate::encoder::lower;
use crate::error::{AssemblerError, Result};
use crate::lexer::{tokenize, Spanned, Token};
use simx_spec::{Instruction, Register};
use std::collections::HashMap;

/// Branch or call target
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// Raw offset relative to the next instruction
    Offset(i64),
    /// Named label
    Label(String),
}

/// Instruction operand
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    /// `%rN`
    Register(Register),
    /// `$n`
    Immediate(i64),
    /// `offset(%base)`
    Memory { offset: i64, base: Register },
    /// Bare number or label
    Target(Target),
}

/// One statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// Mnemonic with its operands
    Instruction {
        mnemonic: String,
        operands: Vec<Operand>,
    },
    /// `.word n`: emit a raw instruction word
    Word(u32),
}

/// A parsed source line
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    pub label: Option<String>,
    pub statement: Option<Statement>,
}

/// Parse register name (without the leading `%`)
pub fn parse_register(name: &str) -> Result<Register> {
    let lower = name.trim().to_lowercase();
    if lower == "sp" {
        return Ok(Register::SP);
    }

    lower
        .strip_prefix('r')
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse::<usize>().ok())
        .and_then(Register::from_index)
        .ok_or(AssemblerError::InvalidRegister(lower))
}

struct Cursor<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    /// Column just past the line, used for "unexpected end" errors
    end: usize,
}

impl<'a> Cursor<'a> {
    fn next(&mut self) -> Option<&'a Spanned> {
        let token = self.tokens.get(self.pos);
        self.pos += 1;
        token
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos).map(|(token, _)| token)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn error(&self, column: usize, message: impl Into<String>) -> AssemblerError {
        AssemblerError::SyntaxError {
            column,
            message: message.into(),
        }
    }

    fn expect(&mut self, want: Token) -> Result<()> {
        match self.next() {
            Some((token, _)) if *token == want => Ok(()),
            Some((token, column)) => {
                Err(self.error(*column, format!("expected {}, found {}", want, token)))
            }
            None => Err(self.error(self.end, format!("expected {}", want))),
        }
    }

    fn register(&mut self) -> Result<Register> {
        match self.next() {
            Some((Token::Register(name), _)) => parse_register(name),
            Some((token, column)) => {
                Err(self.error(*column, format!("expected register, found {}", token)))
            }
            None => Err(self.error(self.end, "expected register")),
        }
    }

    /// `(%base)` following a displacement
    fn memory(&mut self, offset: i64) -> Result<Operand> {
        self.expect(Token::LParen)?;
        let base = self.register()?;
        self.expect(Token::RParen)?;
        Ok(Operand::Memory { offset, base })
    }

    fn operand(&mut self) -> Result<Operand> {
        match self.next() {
            Some((Token::Register(name), _)) => Ok(Operand::Register(parse_register(name)?)),
            Some((Token::Immediate(value), _)) => Ok(Operand::Immediate(*value)),
            Some((Token::Number(value), _)) => {
                if self.peek() == Some(&Token::LParen) {
                    self.memory(*value)
                } else {
                    Ok(Operand::Target(Target::Offset(*value)))
                }
            }
            Some((Token::LParen, _)) => {
                self.pos -= 1;
                self.memory(0)
            }
            Some((Token::Identifier(name), _)) => Ok(Operand::Target(Target::Label(name.clone()))),
            Some((token, column)) => {
                Err(self.error(*column, format!("expected operand, found {}", token)))
            }
            None => Err(self.error(self.end, "expected operand")),
        }
    }

    fn operands(&mut self) -> Result<Vec<Operand>> {
        let mut operands = Vec::new();
        if self.at_end() {
            return Ok(operands);
        }

        loop {
            operands.push(self.operand()?);
            match self.next() {
                None => return Ok(operands),
                Some((Token::Comma, _)) => continue,
                Some((token, column)) => {
                    return Err(self.error(*column, format!("expected ',', found {}", token)))
                }
            }
        }
    }

    fn word(&mut self) -> Result<u32> {
        let value = match self.next() {
            Some((Token::Number(value), _)) => *value,
            Some((token, column)) => {
                return Err(self.error(*column, format!("expected number, found {}", token)))
            }
            None => return Err(self.error(self.end, "expected number")),
        };
        if let Some((token, column)) = self.next() {
            return Err(self.error(*column, format!("unexpected {}", token)));
        }

        // Negative values are taken as their two's-complement bit pattern
        u32::try_from(value)
            .ok()
            .or_else(|| i32::try_from(value).ok().map(|v| v as u32))
            .ok_or(AssemblerError::InvalidImmediate(value))
    }
}

/// Parse one source line
pub fn parse_line(text: &str) -> Result<Line> {
    let tokens = tokenize(text)?;
    let mut cursor = Cursor {
        tokens: &tokens,
        pos: 0,
        end: text.len() + 1,
    };

    let mut line = Line::default();
    if let [(Token::Identifier(name), _), (Token::Colon, _), ..] = tokens.as_slice() {
        line.label = Some(name.clone());
        cursor.pos = 2;
    }

    line.statement = match cursor.next() {
        None => None,
        Some((Token::Identifier(mnemonic), _)) => Some(Statement::Instruction {
            mnemonic: mnemonic.to_lowercase(),
            operands: cursor.operands()?,
        }),
        Some((Token::Directive(name), _)) if name.eq_ignore_ascii_case("word") => {
            Some(Statement::Word(cursor.word()?))
        }
        Some((Token::Directive(name), _)) => {
            return Err(AssemblerError::InvalidDirective(name.clone()))
        }
        Some((token, column)) => {
            return Err(cursor.error(*column, format!("expected instruction, found {}", token)))
        }
    };

    Ok(line)
}

/// Parse a single instruction from assembly text
///
/// Branch targets must be numeric offsets; labels need [`crate::assemble`].
pub fn parse_instruction(text: &str) -> Result<Instruction> {
    match parse_line(text)? {
        Line {
            label: None,
            statement: Some(statement),
        } => lower(&statement, 0, &HashMap::new()),
        _ => Err(AssemblerError::SyntaxError {
            column: 1,
            message: "expected a single instruction".to_string(),
        }),
    }
}
