use crate::common::{NonZeroUInt, UInt};
use rand::Rng;

/// A source of uniform die faces.
///
/// This is the only capability evaluators ask of their random source. Every
/// [`rand::Rng`] is a `Roller`.
pub trait Roller {
    /// Draws a face uniformly from `1..=sides`.
    fn roll(&mut self, sides: NonZeroUInt) -> UInt;
}

impl<R: Rng> Roller for R {
    fn roll(&mut self, sides: NonZeroUInt) -> UInt {
        self.gen_range(1..=sides.get())
    }
}

#[cfg(test)]
pub(crate) use mock::{QueueRoller, StepRoller};
