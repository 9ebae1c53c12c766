use super::error::LexError;
use crate::common::Int;
use logos::{Logos, Span};
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

#[derive(Logos, Debug, Copy, Clone, Eq, PartialEq)]
pub enum TokenKind {
    #[regex(r"[0-9]+", |lex| lex.slice().parse())]
    Number(Int),

    #[regex(r"[dD]")]
    DiceMarker,
    #[token("%")]
    Percent,
    #[token("!")]
    Bang,
    // `k` alone means "keep highest"; the amount may also follow as its own token
    #[regex(r"[kK][hH]?[0-9]*", |lex| keep_amount(lex.slice()))]
    KeepHigh(Option<Int>),
    #[regex(r"[kK][lL][0-9]*", |lex| keep_amount(lex.slice()))]
    KeepLow(Option<Int>),

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,

    End,

    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    #[error]
    Error,
}

impl TokenKind {
    pub fn as_str(&self) -> &'static str {
        use TokenKind::*;

        match self {
            Number(_) => "<number>",
            DiceMarker => "'d'",
            Percent => "'%'",
            Bang => "'!'",
            KeepHigh(_) => "'kh'",
            KeepLow(_) => "'kl'",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            LParen => "'('",
            RParen => "')'",
            End => "<end>",
            Error => "<error>",
        }
    }

    pub fn as_binary_op(&self) -> Option<crate::common::BinaryOperator> {
        use crate::common::BinaryOperator::*;
        Some(match self {
            Self::Plus => Add,
            Self::Minus => Sub,
            Self::Star => Mul,
            Self::Slash => Div,
            _ => return None,
        })
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The regex guarantees an ASCII `k` plus an optional `h`/`l` before the digits
fn keep_amount(s: &str) -> Result<Option<Int>, std::num::ParseIntError> {
    let digits = s.trim_start_matches(|c: char| c.is_ascii_alphabetic());
    if digits.is_empty() {
        Ok(None)
    } else {
        digits.parse().map(Some)
    }
}

/// Splits `s` into tokens, always terminated by a single [`TokenKind::End`].
pub fn tokenize(s: &str) -> Result<Vec<Token>, LexError> {
    let mut lexer = TokenKind::lexer(s);
    let mut tokens = Vec::new();

    while let Some(kind) = lexer.next() {
        let span = lexer.span();
        if kind == TokenKind::Error {
            return Err(LexError {
                offset: span.start,
                found: lexer.slice().chars().next().unwrap_or('\0'),
            });
        }
        tokens.push(Token { kind, span });
    }

    tokens.push(Token {
        kind: TokenKind::End,
        span: s.len()..s.len(),
    });
    Ok(tokens)
}
