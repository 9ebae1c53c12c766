mod compile;
mod dice;
mod roller;
mod trace;
mod tree;

pub use compile::{Compiler, Evaluator};
pub use roller::Roller;
pub use trace::{TracedEvaluator, Tracer};
pub use tree::{ConstantTrace, DiceTrace, DieRoll, OperationTrace, TraceNode, Traced};
