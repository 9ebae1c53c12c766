use super::ast::*;
use super::error::{ParseError, ParseErrorKind};
use super::lexer::{Token, TokenKind};
use crate::common::*;

type PResult<T = Node> = Result<T, ParseError>;

const EXPECTED_OPERAND: &str = "a number, a dice term, or '('";

/// `d%` rolls a hundred-sided die.
const PERCENTILE_SIDES: UInt = 100;

pub struct Parser<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Parser<'t> {
    /// `tokens` must end with [`TokenKind::End`], as produced by
    /// [`tokenize`](super::lexer::tokenize).
    pub fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    pub fn parse(mut self) -> PResult {
        let root = self.parse_expression(0)?;
        self.consume(TokenKind::End, "an operator or the end of input")?;
        Ok(root)
    }

    fn peek(&self) -> TokenKind {
        self.tokens
            .get(self.pos)
            .map_or(TokenKind::End, |token| token.kind)
    }

    fn span(&self) -> std::ops::Range<usize> {
        match self.tokens.get(self.pos).or_else(|| self.tokens.last()) {
            Some(token) => token.span.clone(),
            None => 0..0,
        }
    }

    fn advance(&mut self) -> TokenKind {
        let kind = self.peek();
        if self.pos < self.tokens.len() {
            self.pos += 1;
        }
        kind
    }

    fn matches(&self, kind: TokenKind) -> bool {
        self.peek() == kind
    }

    fn consume(&mut self, expected: TokenKind, description: &'static str) -> PResult<()> {
        if self.matches(expected) {
            self.advance();
            Ok(())
        } else {
            self.unexpected_token(description)
        }
    }

    /// Reports the current token without consuming it.
    fn error<T>(&self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError {
            kind,
            span: self.span(),
        })
    }

    fn unexpected_token<T>(&self, expected: &'static str) -> PResult<T> {
        match self.peek() {
            TokenKind::End => self.error(ParseErrorKind::UnexpectedEnd { expected }),
            found => self.error(ParseErrorKind::UnexpectedToken { found, expected }),
        }
    }

    /// Precedence climbing: folds every following operator that binds at
    /// least as tightly as `min_precedence` into a left-leaning tree.
    fn parse_expression(&mut self, min_precedence: u8) -> PResult {
        let mut lhs = self.parse_primary()?;

        while let Some(op) = self.peek().as_binary_op() {
            if op.precedence() < min_precedence {
                break;
            }
            self.advance();
            let rhs = self.parse_expression(op.precedence() + 1)?;

            lhs = Node::new_binary(op, lhs, rhs);
        }

        Ok(lhs)
    }

    fn parse_primary(&mut self) -> PResult {
        match self.peek() {
            TokenKind::LParen => self.parse_group(),
            TokenKind::Minus => {
                self.advance();
                let operand = self.parse_primary()?;
                Ok(Node::new_binary(BinaryOperator::Sub, Node::Constant(0), operand))
            }
            TokenKind::Plus => {
                self.advance();
                self.parse_primary()
            }
            TokenKind::Number(x) => {
                let span = self.span();
                self.advance();
                if !self.matches(TokenKind::DiceMarker) {
                    return Ok(Node::Constant(x));
                }
                match UInt::try_from(x) {
                    Ok(count) => self.parse_dice(count),
                    Err(_) => Err(ParseError {
                        kind: ParseErrorKind::InvalidDiceTerm("too many dice"),
                        span,
                    }),
                }
            }
            TokenKind::DiceMarker => self.parse_dice(1),
            _ => self.unexpected_token(EXPECTED_OPERAND),
        }
    }

    fn parse_group(&mut self) -> PResult {
        self.consume(TokenKind::LParen, "'('")?;
        let inner = self.parse_expression(0)?;
        self.consume(TokenKind::RParen, "')'")?;
        Ok(Node::new_group(inner))
    }

    /// `d<sides>[!][k|kh|kl<amount>]`, with the count already consumed.
    fn parse_dice(&mut self, count: UInt) -> PResult {
        self.consume(TokenKind::DiceMarker, "'d'")?;

        let sides = match self.peek() {
            TokenKind::Number(x) => match UInt::try_from(x) {
                Ok(x) => x,
                Err(_) => return self.error(ParseErrorKind::InvalidDiceTerm("too many sides")),
            },
            TokenKind::Percent => PERCENTILE_SIDES,
            TokenKind::End => return self.unexpected_token("the number of sides"),
            _ => return self.error(ParseErrorKind::InvalidDiceTerm("missing number of sides")),
        };
        let sides = match NonZeroUInt::new(sides) {
            Some(sides) => sides,
            None => {
                return self.error(ParseErrorKind::InvalidDiceTerm(
                    "dice must have at least one side",
                ))
            }
        };
        self.advance();

        let mut dice = DiceTerm::new(count, sides);

        if self.matches(TokenKind::Bang) {
            self.advance();
            dice = dice.exploding();
        }

        let mode = match self.peek() {
            TokenKind::KeepHigh(amount) => Some((KeepMode::High, amount)),
            TokenKind::KeepLow(amount) => Some((KeepMode::Low, amount)),
            _ => None,
        };
        if let Some((mode, amount)) = mode {
            let keep = self.parse_keep(mode, amount, count)?;
            dice = dice.keep(keep);
        }

        Ok(Node::Dice(dice))
    }

    fn parse_keep(&mut self, mode: KeepMode, amount: Option<Int>, count: UInt) -> PResult<Keep> {
        let start = self.span();
        self.advance();

        let amount = match amount {
            Some(amount) => amount,
            None => match self.peek() {
                TokenKind::Number(amount) => {
                    self.advance();
                    amount
                }
                TokenKind::End => return self.unexpected_token("the number of dice to keep"),
                _ => {
                    return self.error(ParseErrorKind::InvalidDiceTerm(
                        "missing number of dice to keep",
                    ))
                }
            },
        };

        let keep_error = |kind| {
            Err(ParseError {
                kind,
                span: start.clone(),
            })
        };

        if amount == 0 {
            return keep_error(ParseErrorKind::InvalidDiceTerm(
                "must keep at least one die",
            ));
        }
        if amount > Int::from(count) {
            return keep_error(ParseErrorKind::KeepExceedsCount {
                keep: amount,
                count,
            });
        }

        // `amount` is in 1..=count, so it fits
        match UInt::try_from(amount).ok().and_then(NonZeroUInt::new) {
            Some(amount) => Ok(Keep::new(mode, amount)),
            None => keep_error(ParseErrorKind::InvalidDiceTerm(
                "must keep at least one die",
            )),
        }
    }
}
