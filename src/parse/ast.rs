use crate::common::*;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Constant(Int),
    Dice(DiceTerm),
    Binary(BinaryOp),
    /// Explicit parentheses. Only produced by the parser; optimized trees
    /// encode grouping in their shape alone.
    Group(Box<Node>),
}

impl Node {
    pub fn new_binary(op: BinaryOperator, lhs: Node, rhs: Node) -> Self {
        Self::Binary(BinaryOp::new(op, lhs, rhs))
    }

    pub fn new_group(inner: Node) -> Self {
        Self::Group(Box::new(inner))
    }

    pub fn as_constant(&self) -> Option<Int> {
        match self {
            Self::Constant(x) => Some(*x),
            _ => None,
        }
    }

    pub fn contains_dice(&self) -> bool {
        match self {
            Self::Constant(_) => false,
            Self::Dice(_) => true,
            Self::Binary(bin) => bin.operands().any(Node::contains_dice),
            Self::Group(inner) => inner.contains_dice(),
        }
    }
}

impl From<Int> for Node {
    fn from(x: Int) -> Self {
        Self::Constant(x)
    }
}

impl From<DiceTerm> for Node {
    fn from(x: DiceTerm) -> Self {
        Self::Dice(x)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct DiceTerm {
    pub count: UInt,
    pub sides: NonZeroUInt,
    pub exploding: bool,
    pub keep: Option<Keep>,
}

impl DiceTerm {
    pub fn new(count: UInt, sides: NonZeroUInt) -> Self {
        Self {
            count,
            sides,
            exploding: false,
            keep: None,
        }
    }

    pub fn exploding(mut self) -> Self {
        self.exploding = true;
        self
    }

    pub fn keep(mut self, keep: Keep) -> Self {
        self.keep = Some(keep);
        self
    }
}

/// An operator applied left to right over two or more operands.
///
/// Fresh from the parser every `BinaryOp` has exactly one right-hand operand;
/// the optimizer splices same-operator chains into a single n-ary node.
#[derive(Debug, Clone, PartialEq)]
pub struct BinaryOp {
    pub op: BinaryOperator,
    pub lhs: Box<Node>,
    pub rhs: NonEmpty<Node>,
}

impl BinaryOp {
    pub fn new(op: BinaryOperator, lhs: Node, rhs: Node) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs: vec1![rhs],
        }
    }

    pub fn with_operands(op: BinaryOperator, lhs: Node, rhs: NonEmpty<Node>) -> Self {
        Self {
            op,
            lhs: Box::new(lhs),
            rhs,
        }
    }

    pub fn operands(&self) -> impl Iterator<Item = &Node> + '_ {
        std::iter::once(&*self.lhs).chain(self.rhs.iter())
    }

    /// Whether this is a division with a literal zero after its first operand.
    pub fn has_zero_divisor(&self) -> bool {
        self.op == BinaryOperator::Div && self.rhs.iter().any(|x| x.as_constant() == Some(0))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Constant(x) => fmt::Display::fmt(x, f),
            Self::Dice(dice) => fmt::Display::fmt(dice, f),
            Self::Binary(bin) => fmt::Display::fmt(bin, f),
            Self::Group(inner) => write!(f, "({})", inner),
        }
    }
}

impl fmt::Display for DiceTerm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        if self.exploding {
            f.write_str("!")?;
        }
        if let Some(keep) = &self.keep {
            write!(f, "{}", keep)?;
        }
        Ok(())
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prec = self.op.precedence();

        // Left-associative: the head only needs parentheses when it binds
        // looser, every later operand also when it binds equally.
        let needs_parens = |node: &Node, is_head: bool| match node {
            Node::Binary(inner) => {
                let inner_prec = inner.op.precedence();
                inner_prec < prec || (!is_head && inner_prec == prec)
            }
            _ => false,
        };

        if needs_parens(&self.lhs, true) {
            write!(f, "({})", self.lhs)?;
        } else {
            write!(f, "{}", self.lhs)?;
        }
        for node in &self.rhs {
            if needs_parens(node, false) {
                write!(f, " {} ({})", self.op, node)?;
            } else {
                write!(f, " {} {}", self.op, node)?;
            }
        }
        Ok(())
    }
}
