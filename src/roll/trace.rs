use super::{dice::DiceRoll, tree::*, Roller};
use crate::common::*;
use crate::error::CompileError;
use crate::parse::{
    ast,
    visit::{Accept, AstVisitor},
};
use crate::CompileOptions;
use std::fmt;

type Lowered = Box<dyn Fn(&mut dyn Roller) -> TraceNode + Send + Sync>;

/// A compiled expression that records every roll it makes.
///
/// Each call builds a fresh [`TraceNode`] tree owned by the caller; nothing
/// is kept between calls.
pub struct TracedEvaluator {
    eval: Lowered,
}

impl TracedEvaluator {
    pub fn invoke(&self, roller: &mut dyn Roller) -> (Int, TraceNode) {
        let tree = (self.eval)(roller);
        (tree.value(), tree)
    }
}

impl fmt::Debug for TracedEvaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TracedEvaluator").finish_non_exhaustive()
    }
}

/// Lowers a tree into a [`TracedEvaluator`].
///
/// Mirrors [`Compiler`](super::Compiler) node for node: operands are
/// evaluated in the same order and dice roll through the same algorithm, so
/// both evaluators agree whenever they are fed the same draws.
pub struct Tracer<'o> {
    options: &'o CompileOptions,
}

impl<'o> Tracer<'o> {
    pub fn new(options: &'o CompileOptions) -> Self {
        Self { options }
    }

    pub fn compile(mut self, node: &ast::Node) -> Result<TracedEvaluator, CompileError> {
        let eval = node.accept(&mut self)?;
        Ok(TracedEvaluator { eval })
    }
}

impl AstVisitor for Tracer<'_> {
    type Output = Result<Lowered, CompileError>;

    fn visit_constant(&mut self, value: Int) -> Self::Output {
        Ok(Box::new(move |_: &mut dyn Roller| {
            TraceNode::Constant(ConstantTrace { value })
        }))
    }

    fn visit_dice(&mut self, term: &ast::DiceTerm) -> Self::Output {
        let dice = DiceRoll::new(term, self.options)?;
        let term = *term;
        Ok(Box::new(move |roller: &mut dyn Roller| {
            TraceNode::Dice(trace_dice(&dice, &term, roller))
        }))
    }

    fn visit_binary(&mut self, bin: &ast::BinaryOp) -> Self::Output {
        if bin.has_zero_divisor() {
            return Err(CompileError::DivideByZero);
        }

        let op = bin.op;
        let operands = bin
            .operands()
            .map(|node| node.accept(self))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(move |roller: &mut dyn Roller| {
            let operands: Vec<_> = operands
                .iter()
                .map(|operand| operand(&mut *roller))
                .collect();

            let mut values = operands.iter().map(Traced::value);
            let first = values.next().unwrap_or(0);
            let result = values.fold(first, |acc, value| op.apply(acc, value).unwrap_or(0));

            TraceNode::Operation(OperationTrace {
                op,
                operands,
                result,
            })
        }))
    }
}

fn trace_dice(dice: &DiceRoll, term: &ast::DiceTerm, roller: &mut dyn Roller) -> DiceTrace {
    let mut rolls = Vec::with_capacity(dice.count);
    // (first record, one past the last record, total) per die
    let mut dies = Vec::with_capacity(dice.count);

    for _ in 0..dice.count {
        let start = rolls.len();
        let total = dice.roll_die(roller, |face, exploded| {
            rolls.push(DieRoll {
                face,
                exploded,
                kept: true,
            })
        });
        dies.push((start, rolls.len(), total));
    }

    let total = match &dice.keep {
        None => dies.iter().map(|&(_, _, total)| total).sum(),
        Some(keep) => {
            let totals: Vec<_> = dies.iter().map(|&(_, _, total)| total).collect();
            let mut order: Vec<_> = (0..dies.len()).collect();
            keep.sort_indices(&mut order, &totals);
            let kept = dice.kept_count(keep);

            for &i in &order[kept..] {
                let (start, end, _) = dies[i];
                for roll in &mut rolls[start..end] {
                    roll.kept = false;
                }
            }
            order[..kept].iter().map(|&i| totals[i]).sum()
        }
    };

    DiceTrace {
        count: term.count,
        sides: term.sides,
        exploding: term.exploding,
        keep: term.keep,
        rolls,
        total,
    }
}
