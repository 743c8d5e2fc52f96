//! Console I/O for `printr` and `readr`

use crate::error::{Result, RuntimeError};
use std::collections::VecDeque;
use std::io::{self, BufRead, StdinLock, Stdout, Write};

/// What `readr` does when the next token is not an integer or input is exhausted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ReadPolicy {
    /// Stop execution with an error
    #[default]
    Fatal,
    /// Keep the register's previous value
    LeaveUnchanged,
    /// Store zero
    Zero,
}

/// Console seen by the execution engine
pub trait Console {
    /// Emit one `printr` line
    fn print_register(&mut self, value: i32) -> Result<()>;

    /// Read one `readr` value; `None` leaves the register untouched
    fn read_register(&mut self) -> Result<Option<i32>>;

    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Render a register the way `printr` prints it
pub fn format_register(value: i32) -> String {
    format!("{} (0x{:x})", value, value)
}

/// Line-buffered console over any reader/writer pair
#[derive(Debug)]
pub struct IOHandler<R, W> {
    reader: R,
    writer: W,
    pending: VecDeque<Vec<u8>>,
    policy: ReadPolicy,
}

impl<R: BufRead, W: Write> IOHandler<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        IOHandler {
            reader,
            writer,
            pending: VecDeque::new(),
            policy: ReadPolicy::default(),
        }
    }

    pub fn with_read_policy(mut self, policy: ReadPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn read_policy(&self) -> ReadPolicy {
        self.policy
    }

    pub fn writer(&self) -> &W {
        &self.writer
    }

    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }

    /// Next whitespace-delimited token, reading more lines as needed.
    /// Tokens are raw bytes; UTF-8 is checked per token.
    fn next_token(&mut self) -> Result<Option<Vec<u8>>> {
        while self.pending.is_empty() {
            let mut line = Vec::new();
            if self.reader.read_until(b'\n', &mut line)? == 0 {
                return Ok(None);
            }
            self.pending.extend(
                line.split(u8::is_ascii_whitespace)
                    .filter(|token| !token.is_empty())
                    .map(<[u8]>::to_vec),
            );
        }
        Ok(self.pending.pop_front())
    }

    fn recover(&self, err: RuntimeError) -> Result<Option<i32>> {
        match self.policy {
            ReadPolicy::Fatal => Err(err),
            ReadPolicy::LeaveUnchanged => Ok(None),
            ReadPolicy::Zero => Ok(Some(0)),
        }
    }
}

impl IOHandler<StdinLock<'static>, Stdout> {
    /// Console bound to the process's stdin and stdout
    pub fn stdio() -> Self {
        IOHandler::new(io::stdin().lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> Console for IOHandler<R, W> {
    fn print_register(&mut self, value: i32) -> Result<()> {
        writeln!(self.writer, "{}", format_register(value))?;
        Ok(())
    }

    fn read_register(&mut self) -> Result<Option<i32>> {
        match self.next_token()? {
            // A malformed token is consumed either way
            Some(bytes) => match String::from_utf8(bytes) {
                Ok(token) => match token.parse::<i32>() {
                    Ok(value) => Ok(Some(value)),
                    Err(_) => self.recover(RuntimeError::MalformedInput { token }),
                },
                Err(err) => {
                    let token = String::from_utf8_lossy(err.as_bytes()).into_owned();
                    self.recover(RuntimeError::MalformedInput { token })
                }
            },
            None => self.recover(RuntimeError::InputExhausted),
        }
    }

    fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn handler(input: &str) -> IOHandler<&[u8], Vec<u8>> {
        IOHandler::new(input.as_bytes(), Vec::new())
    }

    #[test]
    fn test_format_register() {
        assert_eq!(format_register(8), "8 (0x8)");
        assert_eq!(format_register(255), "255 (0xff)");
        assert_eq!(format_register(-1), "-1 (0xffffffff)");
        assert_eq!(format_register(i32::MIN), "-2147483648 (0x80000000)");
    }

    #[test]
    fn test_print_register_writes_lines() {
        let mut io = handler("");
        io.print_register(42).unwrap();
        io.print_register(-2).unwrap();
        let out = String::from_utf8(io.writer().clone()).unwrap();
        assert_eq!(out, "42 (0x2a)\n-2 (0xfffffffe)\n");
    }

    #[test]
    fn test_read_tokens_across_lines() {
        let mut io = handler("  7 -3\n\n+12\n");
        assert_eq!(io.read_register().unwrap(), Some(7));
        assert_eq!(io.read_register().unwrap(), Some(-3));
        assert_eq!(io.read_register().unwrap(), Some(12));
        assert!(matches!(
            io.read_register(),
            Err(RuntimeError::InputExhausted)
        ));
    }

    #[test]
    fn test_malformed_is_fatal_by_default() {
        let mut io = handler("abc 5");
        assert_eq!(io.read_policy(), ReadPolicy::Fatal);
        assert!(matches!(
            io.read_register(),
            Err(RuntimeError::MalformedInput { token }) if token == "abc"
        ));
    }

    #[test]
    fn test_leave_unchanged_policy() {
        let mut io = handler("abc 5").with_read_policy(ReadPolicy::LeaveUnchanged);
        assert_eq!(io.read_register().unwrap(), None);
        assert_eq!(io.read_register().unwrap(), Some(5));
        assert_eq!(io.read_register().unwrap(), None);
    }

    #[test]
    fn test_non_utf8_token_follows_policy() {
        let input: &[u8] = b"\xff 7\n";

        let mut io = IOHandler::new(input, Vec::new());
        assert!(matches!(
            io.read_register(),
            Err(RuntimeError::MalformedInput { token }) if token == "\u{fffd}"
        ));
        assert_eq!(io.read_register().unwrap(), Some(7));

        let mut io = IOHandler::new(input, Vec::new()).with_read_policy(ReadPolicy::LeaveUnchanged);
        assert_eq!(io.read_register().unwrap(), None);
        assert_eq!(io.read_register().unwrap(), Some(7));

        let mut io = IOHandler::new(input, Vec::new()).with_read_policy(ReadPolicy::Zero);
        assert_eq!(io.read_register().unwrap(), Some(0));
        assert_eq!(io.read_register().unwrap(), Some(7));
        // exhausted
        assert_eq!(io.read_register().unwrap(), Some(0));
    }

    #[test]
    fn test_zero_policy() {
        let mut io = handler("99999999999").with_read_policy(ReadPolicy::Zero);
        assert_eq!(io.read_register().unwrap(), Some(0));
        assert_eq!(io.read_register().unwrap(), Some(0));
    }
}
