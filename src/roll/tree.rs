use crate::common::*;

#[enum_dispatch::enum_dispatch]
pub trait Traced {
    /// The value this node contributed to its parent.
    fn value(&self) -> Int;
}

/// The record of one traced evaluation, one node per expression node.
#[derive(Debug, Clone, PartialEq)]
#[enum_dispatch::enum_dispatch(Traced)]
pub enum TraceNode {
    Constant(ConstantTrace),
    Dice(DiceTrace),
    Operation(OperationTrace),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct ConstantTrace {
    pub value: Int,
}

impl Traced for ConstantTrace {
    fn value(&self) -> Int {
        self.value
    }
}

/// One rolled face. An exploded face is followed by the face it triggered.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct DieRoll {
    pub face: UInt,
    pub exploded: bool,
    pub kept: bool,
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DiceTrace {
    pub count: UInt,
    pub sides: NonZeroUInt,
    pub exploding: bool,
    pub keep: Option<Keep>,
    pub rolls: Vec<DieRoll>,
    pub total: Int,
}

impl DiceTrace {
    pub fn kept(&self) -> impl Iterator<Item = &DieRoll> + '_ {
        self.rolls.iter().filter(|roll| roll.kept)
    }

    pub fn dropped(&self) -> impl Iterator<Item = &DieRoll> + '_ {
        self.rolls.iter().filter(|roll| !roll.kept)
    }
}

impl Traced for DiceTrace {
    fn value(&self) -> Int {
        self.total
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OperationTrace {
    pub op: BinaryOperator,
    pub operands: Vec<TraceNode>,
    pub result: Int,
}

impl Traced for OperationTrace {
    fn value(&self) -> Int {
        self.result
    }
}
