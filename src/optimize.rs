//! Rewrites a parsed tree into its smallest equivalent shape.
//!
//! Explicit groups are dropped (the tree shape already encodes them),
//! same-operator chains are spliced into one n-ary node, and every maximal
//! subtree without dice is folded into a single constant. Subtrees with dice
//! are never folded, not even in part, so the order and number of random
//! draws is unchanged.

use crate::common::*;
use crate::error::CompileError;
use crate::parse::ast::{BinaryOp, Node};

type OResult = Result<Node, CompileError>;

pub fn optimize(node: Node) -> OResult {
    match node {
        Node::Constant(_) | Node::Dice(_) => Ok(node),
        Node::Group(inner) => optimize(*inner),
        Node::Binary(bin) => optimize_binary(bin),
    }
}

fn optimize_binary(bin: BinaryOp) -> OResult {
    let BinaryOp { op, lhs, rhs } = bin;
    let mut operands = Vec::with_capacity(rhs.len() + 1);

    // Children come back already flattened, so one level of splicing per
    // node reaches the fixpoint.
    match optimize(*lhs)? {
        Node::Binary(inner) if inner.op == op => {
            log::trace!("flattening {} into the {} chain", inner, op);
            operands.push(*inner.lhs);
            operands.extend(inner.rhs);
        }
        node => operands.push(node),
    }
    for node in rhs {
        match optimize(node)? {
            Node::Binary(inner) if inner.op == op && op.is_associative() => {
                log::trace!("flattening {} into the {} chain", inner, op);
                operands.push(*inner.lhs);
                operands.extend(inner.rhs);
            }
            node => operands.push(node),
        }
    }

    let mut operands = operands.into_iter();
    let (lhs, rhs) = match (operands.next(), operands.next()) {
        (Some(lhs), Some(first)) => {
            let mut rhs = NonEmpty::new(first);
            rhs.extend(operands);
            (lhs, rhs)
        }
        // a binary node always has at least two operands
        (Some(lhs), None) => return Ok(lhs),
        (None, _) => return Ok(Node::Constant(0)),
    };
    let bin = BinaryOp::with_operands(op, lhs, rhs);

    if bin.has_zero_divisor() {
        return Err(CompileError::DivideByZero);
    }

    match fold(&bin) {
        Some(value) => {
            let value = value?;
            log::trace!("folded {} to {}", bin, value);
            Ok(Node::Constant(value))
        }
        None => Ok(Node::Binary(bin)),
    }
}

/// Evaluates `bin` if all of its operands are constants.
fn fold(bin: &BinaryOp) -> Option<Result<Int, CompileError>> {
    let mut acc = bin.lhs.as_constant()?;
    let values = bin
        .rhs
        .iter()
        .map(Node::as_constant)
        .collect::<Option<Vec<_>>>()?;

    for value in values {
        acc = match bin.op.apply(acc, value) {
            Some(x) => x,
            None => return Some(Err(CompileError::DivideByZero)),
        };
    }
    Some(Ok(acc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::ast::DiceTerm;
    use crate::parse::parse;

    fn check(s: &str, expected: Node) {
        let optimized = optimize(parse(s).unwrap()).unwrap();
        assert_eq!(optimized, expected);
    }

    fn check_str(s: &str, expected: &str) {
        let optimized = optimize(parse(s).unwrap()).unwrap();
        assert_eq!(optimized.to_string(), expected);
    }

    fn d(count: UInt, sides: UInt) -> Node {
        DiceTerm::new(count, NonZeroUInt::new(sides).unwrap()).into()
    }

    fn chain(op: BinaryOperator, nodes: Vec<Node>) -> Node {
        let mut nodes = nodes.into_iter();
        let lhs = nodes.next().unwrap();
        let mut rhs = NonEmpty::new(nodes.next().unwrap());
        rhs.extend(nodes);
        Node::Binary(BinaryOp::with_operands(op, lhs, rhs))
    }

    #[test]
    fn test_fold_constants() {
        check("4", Node::Constant(4));
        check("4 + 3 * 2", Node::Constant(10));
        check("(4 + 3) * 2", Node::Constant(14));
        check("7 / 2", Node::Constant(3));
        check("-7 / 2", Node::Constant(-3));
        check("10 - 2 - 3", Node::Constant(5));
        check("100 / 10 / 5", Node::Constant(2));
        check("-(2 * 3)", Node::Constant(-6));
    }

    #[test]
    fn test_flatten() {
        check(
            "1d4 + 1d6 + 1d8",
            chain(BinaryOperator::Add, vec![d(1, 4), d(1, 6), d(1, 8)]),
        );
        check(
            "1d4 + (1d6 + 1d8)",
            chain(BinaryOperator::Add, vec![d(1, 4), d(1, 6), d(1, 8)]),
        );
        check(
            "1d4 - 1d6 - 1d8",
            chain(BinaryOperator::Sub, vec![d(1, 4), d(1, 6), d(1, 8)]),
        );
        check_str("1d4 - (1d6 - 1d8)", "1d4 - (1d6 - 1d8)");
        check_str("1d4 / (1d6 / 1d8)", "1d4 / (1d6 / 1d8)");
        check_str("2 * 1d6 * 3", "2 * 1d6 * 3");
    }

    #[test]
    fn test_never_fold_dice() {
        check(
            "1d6 + 2 + 3",
            chain(
                BinaryOperator::Add,
                vec![d(1, 6), Node::Constant(2), Node::Constant(3)],
            ),
        );
        check(
            "(2 + 3) + 1d6",
            chain(BinaryOperator::Add, vec![Node::Constant(5), d(1, 6)]),
        );
        check_str("(1d4 + 1) * (2 * 3)", "(1d4 + 1) * 6");
        check_str("0d6", "0d6");
    }

    #[test]
    fn test_divide_by_zero() {
        let err = |s: &str| optimize(parse(s).unwrap()).unwrap_err();
        assert_eq!(err("1 / 0"), CompileError::DivideByZero);
        assert_eq!(err("4 / (2 - 2)"), CompileError::DivideByZero);
        assert_eq!(err("1d6 / 0"), CompileError::DivideByZero);
        assert_eq!(err("1d6 / 2 / (3 - 3)"), CompileError::DivideByZero);
        assert!(optimize(parse("0 / 1d6").unwrap()).is_ok());
    }
}
