//! # Lexer for SIMX Assembly Language

use crate::error::{AssemblerError, Result};
use logos::Logos;
use std::fmt;

/// Parse a decimal or `0x` hexadecimal literal with an optional leading `-`
fn parse_int(text: &str) -> Option<i64> {
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16).ok()?,
        None => digits.parse::<i64>().ok()?,
    };
    Some(if negative { -magnitude } else { magnitude })
}

/// Tokens for SIMX assembly
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"[#;][^\n]*")] // Skip comments
pub enum Token {
    /// Identifier (mnemonics, labels)
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    /// Register (`%r0`-`%r15`, `%sp`), stored without the `%`
    #[regex(r"%[a-zA-Z0-9]+", |lex| lex.slice()[1..].to_string())]
    Register(String),

    /// Immediate operand (`$5`, `$-3`, `$0x1f`)
    #[regex(r"\$-?(0[xX][0-9a-fA-F]+|[0-9]+)", |lex| parse_int(&lex.slice()[1..]))]
    Immediate(i64),

    /// Bare number (jump offsets, memory displacements, `.word` values)
    #[regex(r"-?(0[xX][0-9a-fA-F]+|[0-9]+)", |lex| parse_int(lex.slice()))]
    Number(i64),

    /// Directive (`.word`)
    #[regex(r"\.[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice()[1..].to_string())]
    Directive(String),

    #[token(",")]
    Comma,

    #[token(":")]
    Colon,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Identifier(name) => write!(f, "'{}'", name),
            Token::Register(name) => write!(f, "'%{}'", name),
            Token::Immediate(value) => write!(f, "'${}'", value),
            Token::Number(value) => write!(f, "'{}'", value),
            Token::Directive(name) => write!(f, "'.{}'", name),
            Token::Comma => write!(f, "','"),
            Token::Colon => write!(f, "':'"),
            Token::LParen => write!(f, "'('"),
            Token::RParen => write!(f, "')'"),
        }
    }
}

/// A token and the 1-based column it starts at
pub type Spanned = (Token, usize);

/// Tokenize one source line
pub fn tokenize(line: &str) -> Result<Vec<Spanned>> {
    let mut lex = Token::lexer(line);
    let mut tokens = Vec::new();

    while let Some(token) = lex.next() {
        let column = lex.span().start + 1;
        match token {
            Ok(token) => tokens.push((token, column)),
            Err(()) => {
                return Err(AssemblerError::SyntaxError {
                    column,
                    message: format!("unexpected input '{}'", lex.slice()),
                })
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lexer_registers() {
        let mut lex = Token::lexer("%r0 %r15 %sp");
        assert_eq!(lex.next(), Some(Ok(Token::Register("r0".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Register("r15".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Register("sp".to_string()))));
        assert_eq!(lex.next(), None);
    }

    #[test]
    fn test_lexer_numbers() {
        let mut lex = Token::lexer("$42 $-10 $0x1A 8 -4 0x10");
        assert_eq!(lex.next(), Some(Ok(Token::Immediate(42))));
        assert_eq!(lex.next(), Some(Ok(Token::Immediate(-10))));
        assert_eq!(lex.next(), Some(Ok(Token::Immediate(0x1A))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(8))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(-4))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(16))));
    }

    #[test]
    fn test_lexer_memory_operand() {
        let mut lex = Token::lexer("movl -4(%r6), %r1");
        assert_eq!(lex.next(), Some(Ok(Token::Identifier("movl".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(-4))));
        assert_eq!(lex.next(), Some(Ok(Token::LParen)));
        assert_eq!(lex.next(), Some(Ok(Token::Register("r6".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::RParen)));
        assert_eq!(lex.next(), Some(Ok(Token::Comma)));
        assert_eq!(lex.next(), Some(Ok(Token::Register("r1".to_string()))));
    }

    #[test]
    fn test_lexer_label_and_comments() {
        let tokens = tokenize("loop: jmp loop ; back edge").unwrap();
        let kinds: Vec<Token> = tokens.into_iter().map(|(t, _)| t).collect();
        assert_eq!(
            kinds,
            vec![
                Token::Identifier("loop".to_string()),
                Token::Colon,
                Token::Identifier("jmp".to_string()),
                Token::Identifier("loop".to_string()),
            ]
        );
        assert!(tokenize("# only a comment").unwrap().is_empty());
    }

    #[test]
    fn test_lexer_directive() {
        let mut lex = Token::lexer(".word 0xA8000000");
        assert_eq!(lex.next(), Some(Ok(Token::Directive("word".to_string()))));
        assert_eq!(lex.next(), Some(Ok(Token::Number(0xA800_0000))));
    }

    #[test]
    fn test_tokenize_reports_column() {
        let err = tokenize("pushl @r1").unwrap_err();
        assert!(matches!(
            err,
            AssemblerError::SyntaxError { column: 7, .. }
        ));
    }
}
