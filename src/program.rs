//! Program images
//!
//! A [`Program`] is the immutable template a [`Computer`] copies into memory on
//! every load or reset. It is reference counted, so cloning a program to prime
//! many machines does not copy the words.
//!
//! Programs are usually written as one comma-separated line of integers. The
//! text parser also accepts whitespace between words and treats everything
//! after `#` on a line as a comment, which makes hand-annotated listings
//! loadable:
//!
//! ```text
//! 3,100          # read n
//! 1001,100,-1,100
//! 1005,100,2     # loop while n != 0
//! 99
//! ```
//!
//! [`Computer`]: crate::interpreter::engine::Computer

use crate::memory::Word;
use std::fs;
use std::io;
use std::ops::Deref;
use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;
use thiserror::Error;

const COMMENT_MARKER: char = '#';

/// Errors from turning text into a program
#[derive(Debug, Error)]
pub enum ProgramError {
    #[error("line {line}: '{token}' is not a valid integer")]
    InvalidWord { line: usize, token: String },

    #[error("program contains no words")]
    Empty,

    #[error("failed to read program: {0}")]
    Io(#[from] io::Error),
}

/// An immutable sequence of machine words
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    words: Arc<[Word]>,
}

impl Program {
    /// Parse comma- or whitespace-separated integers, ignoring `#` comments
    pub fn parse(text: &str) -> Result<Self, ProgramError> {
        let mut words: Vec<Word> = Vec::new();

        for (index, line) in text.lines().enumerate() {
            let code = match line.find(COMMENT_MARKER) {
                Some(pos) => &line[..pos],
                None => line,
            };

            for token in code
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|t| !t.is_empty())
            {
                let word = token.parse().map_err(|_| ProgramError::InvalidWord {
                    line: index + 1,
                    token: token.to_string(),
                })?;
                words.push(word);
            }
        }

        if words.is_empty() {
            return Err(ProgramError::Empty);
        }
        Ok(Program::from(words))
    }

    /// Read and parse a program file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ProgramError> {
        let text = fs::read_to_string(path)?;
        Self::parse(&text)
    }

    pub fn words(&self) -> &[Word] {
        &self.words
    }
}

impl Deref for Program {
    type Target = [Word];

    fn deref(&self) -> &[Word] {
        &self.words
    }
}

impl FromStr for Program {
    type Err = ProgramError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<Vec<Word>> for Program {
    fn from(words: Vec<Word>) -> Self {
        Program {
            words: words.into(),
        }
    }
}

impl From<&[Word]> for Program {
    fn from(words: &[Word]) -> Self {
        Program {
            words: words.into(),
        }
    }
}

impl<const N: usize> From<[Word; N]> for Program {
    fn from(words: [Word; N]) -> Self {
        Program {
            words: Arc::new(words),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_line() {
        let program = Program::parse("1,9,10,3,2,3,11,0,99,30,40,50\n").unwrap();
        assert_eq!(program.words(), &[1, 9, 10, 3, 2, 3, 11, 0, 99, 30, 40, 50]);
    }

    #[test]
    fn test_parse_negative_and_whitespace() {
        let program: Program = "1101, 100, -1, 4,\n 0".parse().unwrap();
        assert_eq!(program.words(), &[1101, 100, -1, 4, 0]);
    }

    #[test]
    fn test_parse_comments() {
        let source = "# header\n3,100   # read\n1001,100,-1,100\n99 # done";
        let program = Program::parse(source).unwrap();
        assert_eq!(program.words(), &[3, 100, 1001, 100, -1, 100, 99]);
    }

    #[test]
    fn test_parse_invalid_word() {
        match Program::parse("1,2\n3,x4,99") {
            Err(ProgramError::InvalidWord { line, token }) => {
                assert_eq!(line, 2);
                assert_eq!(token, "x4");
            }
            other => panic!("Expected invalid word error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_empty() {
        assert!(matches!(
            Program::parse("  # nothing here\n"),
            Err(ProgramError::Empty)
        ));
    }

    #[test]
    fn test_clone_shares_words() {
        let program = Program::from(vec![1, 2, 3]);
        let copy = program.clone();
        assert!(std::ptr::eq(program.words(), copy.words()));
    }
}
