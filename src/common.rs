use std::fmt::{self, Write};
use std::num::NonZeroU32;
pub use vec1::vec1;

pub type Int = i64;
pub type UInt = u32;
pub type NonZeroUInt = NonZeroU32;

pub type NonEmpty<T> = vec1::Vec1<T>;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum BinaryOperator {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    /// Binding power used by the parser; higher binds tighter.
    pub const fn precedence(self) -> u8 {
        match self {
            Self::Add | Self::Sub => 1,
            Self::Mul | Self::Div => 2,
        }
    }

    /// Whether `(a op b) op c == a op (b op c)`, i.e. whether a right-hand
    /// operand with the same operator may be spliced into the chain.
    pub const fn is_associative(self) -> bool {
        matches!(self, Self::Add | Self::Mul)
    }

    /// The single arithmetic step shared by constant folding and evaluation.
    ///
    /// Wraps on overflow and truncates division toward zero. Returns `None`
    /// only for division by zero.
    pub fn apply(self, lhs: Int, rhs: Int) -> Option<Int> {
        Some(match self {
            Self::Add => lhs.wrapping_add(rhs),
            Self::Sub => lhs.wrapping_sub(rhs),
            Self::Mul => lhs.wrapping_mul(rhs),
            Self::Div => {
                if rhs == 0 {
                    return None;
                }
                lhs.wrapping_div(rhs)
            }
        })
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let c = match self {
            Self::Add => '+',
            Self::Sub => '-',
            Self::Mul => '*',
            Self::Div => '/',
        };
        f.write_char(c)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum KeepMode {
    High,
    Low,
}

/// A keep-selector: retain the `amount` highest or lowest dice of a term.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Keep {
    pub mode: KeepMode,
    pub amount: NonZeroUInt,
}

impl Keep {
    pub const fn new(mode: KeepMode, amount: NonZeroUInt) -> Self {
        Self { mode, amount }
    }

    pub fn high(amount: NonZeroUInt) -> Self {
        Self::new(KeepMode::High, amount)
    }

    pub fn low(amount: NonZeroUInt) -> Self {
        Self::new(KeepMode::Low, amount)
    }

    pub(crate) fn amount(&self) -> usize {
        self.amount.get() as usize
    }

    /// Sorts die totals so that the kept dice come first.
    pub(crate) fn sort(&self, totals: &mut [Int]) {
        match self.mode {
            KeepMode::High => totals.sort_unstable_by(|a, b| b.cmp(a)),
            KeepMode::Low => totals.sort_unstable(),
        }
    }

    /// Sorts die indices by their totals so that the kept dice come first.
    /// Equal totals keep their roll order.
    pub(crate) fn sort_indices(&self, indices: &mut [usize], totals: &[Int]) {
        match self.mode {
            KeepMode::High => indices.sort_by(|&a, &b| totals[b].cmp(&totals[a])),
            KeepMode::Low => indices.sort_by_key(|&i| totals[i]),
        }
    }
}

impl fmt::Display for Keep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.mode {
            KeepMode::High => write!(f, "kh{}", self.amount),
            KeepMode::Low => write!(f, "kl{}", self.amount),
        }
    }
}
