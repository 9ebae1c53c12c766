use super::{dice::DiceRoll, Roller};
use crate::common::*;
use crate::error::CompileError;
use crate::parse::{
    ast,
    visit::{Accept, AstVisitor},
};
use crate::CompileOptions;
use std::fmt;

type Lowered = Box<dyn Fn(&mut dyn Roller) -> Int + Send + Sync>;

/// A compiled expression that produces only its value.
///
/// Evaluating keeps no state between calls, so one evaluator may be shared
/// across threads as long as each call brings its own roller. Only a keep
/// term of more than 256 dice allocates.
pub struct Evaluator {
    eval: Lowered,
}

impl Evaluator {
    pub fn invoke(&self, roller: &mut dyn Roller) -> Int {
        (self.eval)(roller)
    }
}

impl fmt::Debug for Evaluator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Evaluator").finish_non_exhaustive()
    }
}

/// Lowers a tree into a value-only [`Evaluator`].
pub struct Compiler<'o> {
    options: &'o CompileOptions,
}

impl<'o> Compiler<'o> {
    pub fn new(options: &'o CompileOptions) -> Self {
        Self { options }
    }

    pub fn compile(mut self, node: &ast::Node) -> Result<Evaluator, CompileError> {
        let eval = node.accept(&mut self)?;
        Ok(Evaluator { eval })
    }
}

impl AstVisitor for Compiler<'_> {
    type Output = Result<Lowered, CompileError>;

    fn visit_constant(&mut self, x: Int) -> Self::Output {
        Ok(Box::new(move |_: &mut dyn Roller| x))
    }

    fn visit_dice(&mut self, dice: &ast::DiceTerm) -> Self::Output {
        let dice = DiceRoll::new(dice, self.options)?;
        Ok(Box::new(move |roller: &mut dyn Roller| {
            dice.roll_total(roller)
        }))
    }

    fn visit_binary(&mut self, bin: &ast::BinaryOp) -> Self::Output {
        if bin.has_zero_divisor() {
            return Err(CompileError::DivideByZero);
        }

        let op = bin.op;
        let lhs = bin.lhs.accept(self)?;
        let rhs = bin
            .rhs
            .iter()
            .map(|node| node.accept(self))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Box::new(move |roller: &mut dyn Roller| {
            let first = lhs(&mut *roller);
            rhs.iter().fold(first, |acc, operand| {
                // a divisor that is zero only at runtime zeroes the step
                op.apply(acc, operand(&mut *roller)).unwrap_or(0)
            })
        }))
    }
}
