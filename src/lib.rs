//! Compiles dice notation such as `2d20kh1 + 5` into reusable evaluators.
//!
//! Every expression is lexed, parsed and optimized once, then lowered into
//! either an [`Evaluator`], which only produces the total, or a
//! [`TracedEvaluator`], which also records every die it rolled. Both accept
//! any [`Roller`], including every [`rand::Rng`].
//!
//! ```
//! let eval = dice_compile::compile_value("2d6 + 3").unwrap();
//! let total = eval.invoke(&mut rand::thread_rng());
//! assert!((5..=15).contains(&total));
//! ```

pub mod common;
mod error;
mod optimize;
pub mod parse;
pub mod roll;

pub use common::Int;
pub use error::CompileError;
pub use optimize::optimize;
pub use parse::parse;
pub use roll::{Evaluator, Roller, TraceNode, Traced, TracedEvaluator};

/// Tunables applied when lowering an expression.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct CompileOptions {
    /// How many extra faces one exploding die may draw before it stops.
    pub explosion_cap: u32,
    /// The most dice one term may roll, or `None` for no limit.
    pub max_dice: Option<usize>,
}

impl CompileOptions {
    pub const DEFAULT_EXPLOSION_CAP: u32 = 100;

    pub fn with_explosion_cap(mut self, explosion_cap: u32) -> Self {
        self.explosion_cap = explosion_cap;
        self
    }

    /// Rejects terms rolling more than `max_dice` dice with
    /// [`CompileError::TooManyDice`].
    pub fn with_max_dice(mut self, max_dice: usize) -> Self {
        self.max_dice = Some(max_dice);
        self
    }
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            explosion_cap: Self::DEFAULT_EXPLOSION_CAP,
            max_dice: None,
        }
    }
}

fn front_end(expression: &str) -> Result<parse::ast::Node, CompileError> {
    let node = optimize(parse(expression)?)?;
    log::debug!("compiled {:?} as {}", expression, node);
    Ok(node)
}

/// Compiles `expression` into a value-only evaluator.
pub fn compile_value(expression: &str) -> Result<Evaluator, CompileError> {
    compile_value_with(expression, &CompileOptions::default())
}

pub fn compile_value_with(
    expression: &str,
    options: &CompileOptions,
) -> Result<Evaluator, CompileError> {
    let node = front_end(expression)?;
    roll::Compiler::new(options).compile(&node)
}

/// Compiles `expression` into an evaluator that also returns a trace tree.
pub fn compile_traced(expression: &str) -> Result<TracedEvaluator, CompileError> {
    compile_traced_with(expression, &CompileOptions::default())
}

pub fn compile_traced_with(
    expression: &str,
    options: &CompileOptions,
) -> Result<TracedEvaluator, CompileError> {
    let node = front_end(expression)?;
    roll::Tracer::new(options).compile(&node)
}
