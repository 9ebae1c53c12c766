use super::Roller;
use crate::common::*;
use crate::error::CompileError;
use crate::parse::ast::DiceTerm;
use crate::CompileOptions;

/// Keep-selection sorts up to this many dice on the stack; larger terms
/// allocate one buffer per roll.
const INLINE_DICE: usize = 256;

/// A dice term checked against the compile options, ready to be rolled.
///
/// Both evaluators roll through this type, so a value-only evaluation and a
/// traced evaluation consume the same draws and reach the same total.
#[derive(Debug, Copy, Clone)]
pub(crate) struct DiceRoll {
    pub count: usize,
    pub sides: NonZeroUInt,
    pub exploding: bool,
    pub keep: Option<Keep>,
    pub explosion_cap: u32,
}

impl DiceRoll {
    pub fn new(term: &DiceTerm, options: &CompileOptions) -> Result<Self, CompileError> {
        let count = term.count as usize;
        if let Some(limit) = options.max_dice {
            if count > limit {
                return Err(CompileError::TooManyDice {
                    count: term.count,
                    limit,
                });
            }
        }

        Ok(Self {
            count,
            sides: term.sides,
            exploding: term.exploding,
            keep: term.keep,
            explosion_cap: options.explosion_cap,
        })
    }

    /// Rolls one die, exploding it while it shows its maximum face.
    ///
    /// An exploding die draws at most `explosion_cap` extra faces, so even a
    /// `d1!` terminates. `record` sees every face in roll order, along with
    /// whether that face triggered another draw.
    pub fn roll_die<R, F>(&self, roller: &mut R, mut record: F) -> Int
    where
        R: Roller + ?Sized,
        F: FnMut(UInt, bool),
    {
        let max = self.sides.get();
        let mut face = roller.roll(self.sides);
        let mut total = Int::from(face);
        let mut extra = 0;

        while self.exploding && face == max && extra < self.explosion_cap {
            record(face, true);
            face = roller.roll(self.sides);
            total += Int::from(face);
            extra += 1;
        }
        record(face, false);

        total
    }

    /// How many dice `keep` retains. The parser rejects selectors larger than
    /// the count, but hand-built trees are only bounded here.
    pub fn kept_count(&self, keep: &Keep) -> usize {
        keep.amount().min(self.count)
    }

    /// Rolls the whole term and returns the sum of the kept dice.
    pub fn roll_total<R: Roller + ?Sized>(&self, roller: &mut R) -> Int {
        match &self.keep {
            None => (0..self.count)
                .map(|_| self.roll_die(roller, |_, _| {}))
                .sum(),
            Some(keep) if self.count <= INLINE_DICE => {
                let mut buf = [0; INLINE_DICE];
                self.keep_total(roller, keep, &mut buf[..self.count])
            }
            Some(keep) => {
                let mut buf = vec![0; self.count];
                self.keep_total(roller, keep, &mut buf)
            }
        }
    }

    fn keep_total<R>(&self, roller: &mut R, keep: &Keep, totals: &mut [Int]) -> Int
    where
        R: Roller + ?Sized,
    {
        for total in totals.iter_mut() {
            *total = self.roll_die(roller, |_, _| {});
        }
        keep.sort(totals);
        totals[..self.kept_count(keep)].iter().sum()
    }
}
