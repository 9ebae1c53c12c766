#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    #[error("{0}")]
    LexError(#[from] crate::parse::LexError),
    #[error("{0}")]
    ParseError(#[from] crate::parse::ParseError),
    #[error("cannot divide by zero")]
    DivideByZero,
    #[error("too many dice in one term: {count} (at most {limit} allowed)")]
    TooManyDice { count: u32, limit: usize },
}
