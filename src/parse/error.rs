use super::lexer::TokenKind;
use crate::common::{Int, UInt};
use std::fmt;
use std::ops::Range;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
#[error("(at position {offset}): unrecognized character {found:?}")]
pub struct LexError {
    pub offset: usize,
    pub found: char,
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("(at position {}): {kind}", .span.start)]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Range<usize>,
}

impl ParseError {
    pub fn offset(&self) -> usize {
        self.span.start
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    UnexpectedToken {
        found: TokenKind,
        expected: &'static str,
    },
    UnexpectedEnd {
        expected: &'static str,
    },
    InvalidDiceTerm(&'static str),
    KeepExceedsCount {
        keep: Int,
        count: UInt,
    },
}

impl fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnexpectedToken { found, expected } => {
                write!(f, "unexpected token; found {}, expected {}", found, expected)
            }
            Self::UnexpectedEnd { expected } => {
                write!(f, "unexpected end of input; expected {}", expected)
            }
            Self::InvalidDiceTerm(why) => write!(f, "invalid dice term: {}", why),
            Self::KeepExceedsCount { keep, count } => {
                write!(f, "cannot keep {} of only {} dice", keep, count)
            }
        }
    }
}
