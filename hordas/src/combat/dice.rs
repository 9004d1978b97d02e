//! Dice rolling system
//!
//! All randomness in combat flows through the [`Dice`] trait so that a fight
//! can be replayed exactly from a seed, or scripted roll by roll in tests.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::trace;

/// Source of uniformly distributed die results
pub trait Dice {
    /// Roll one die with `sides` faces. `label` tags the trace event and
    /// never affects the result.
    fn roll(&mut self, sides: u32, label: &str) -> u32;

    /// Roll a single d6
    fn d6(&mut self) -> u32 {
        self.roll(6, "d6")
    }

    /// Roll a single d20
    fn d20(&mut self) -> u32 {
        self.roll(20, "d20")
    }

    /// Sum of `count` independent rolls of a `sides`-faced die
    fn sum_dice(&mut self, count: u32, sides: u32) -> u32 {
        (0..count).map(|_| self.roll(sides, "sum")).sum()
    }
}

/// Dice backed by a real random number generator
#[derive(Debug, Clone)]
pub struct RandomDice<R = StdRng> {
    rng: R,
}

impl RandomDice<StdRng> {
    /// Dice seeded from the operating system
    pub fn from_os_rng() -> Self {
        Self {
            rng: StdRng::from_os_rng(),
        }
    }

    /// Deterministic dice: the same seed always yields the same fight
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> RandomDice<R> {
    /// Wrap an existing generator
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Dice for RandomDice<R> {
    fn roll(&mut self, sides: u32, label: &str) -> u32 {
        let value = self.rng.random_range(1..=sides.max(1));
        trace!(label, sides, value, "die rolled");
        value
    }
}

/// Dice that replay a fixed script of results, cycling when exhausted.
///
/// Each scripted value is clamped into `1..=sides` for the die being rolled,
/// so a script of `[20]` reads as the maximum face of any die.
#[derive(Debug, Clone, Default)]
pub struct ScriptedDice {
    script: Vec<u32>,
    cursor: usize,
}

impl ScriptedDice {
    pub fn new(values: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: values.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Every roll returns `value` (clamped to the die)
    pub fn constant(value: u32) -> Self {
        Self::new([value])
    }

    /// Number of dice rolled so far
    pub fn rolled(&self) -> usize {
        self.cursor
    }
}

impl Dice for ScriptedDice {
    fn roll(&mut self, sides: u32, label: &str) -> u32 {
        let raw = if self.script.is_empty() {
            1
        } else {
            self.script[self.cursor % self.script.len()]
        };
        self.cursor += 1;
        let value = raw.clamp(1, sides.max(1));
        trace!(label, sides, value, "scripted die");
        value
    }
}

/// A dice formula such as `5d6` or `1d20+3`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiceRoll {
    /// Number of dice to roll
    pub count: u32,
    /// Number of sides per die
    pub sides: u32,
    /// Modifier to add/subtract
    pub modifier: i32,
}

impl DiceRoll {
    pub const fn new(count: u32, sides: u32, modifier: i32) -> Self {
        Self {
            count,
            sides,
            modifier,
        }
    }

    /// Roll the formula, floored at 0
    pub fn roll_with(&self, dice: &mut dyn Dice, label: &str) -> u32 {
        let mut sum: i64 = 0;
        for _ in 0..self.count {
            sum += i64::from(dice.roll(self.sides, label));
        }
        (sum + i64::from(self.modifier)).max(0) as u32
    }

    /// Lowest possible result
    pub fn min(&self) -> u32 {
        (self.count as i32 + self.modifier).max(0) as u32
    }

    /// Highest possible result
    pub fn max(&self) -> u32 {
        ((self.count * self.sides) as i32 + self.modifier).max(0) as u32
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.modifier > 0 {
            write!(f, "{}d{}+{}", self.count, self.sides, self.modifier)
        } else if self.modifier < 0 {
            write!(f, "{}d{}{}", self.count, self.sides, self.modifier)
        } else {
            write!(f, "{}d{}", self.count, self.sides)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_bounds() {
        let mut dice = RandomDice::seeded(7);

        for _ in 0..200 {
            let d6 = dice.d6();
            assert!((1..=6).contains(&d6), "d6 {} out of range", d6);
            let d20 = dice.d20();
            assert!((1..=20).contains(&d20), "d20 {} out of range", d20);
        }
    }

    #[test]
    fn test_seeded_is_deterministic() {
        let mut a = RandomDice::seeded(42);
        let mut b = RandomDice::seeded(42);

        let rolls_a: Vec<u32> = (0..32).map(|_| a.d20()).collect();
        let rolls_b: Vec<u32> = (0..32).map(|_| b.d20()).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn test_sum_dice_bounds() {
        let mut dice = RandomDice::seeded(3);

        for _ in 0..100 {
            let total = dice.sum_dice(6, 6);
            assert!((6..=36).contains(&total), "6d6 {} out of range", total);
        }
        assert_eq!(dice.sum_dice(0, 6), 0);
    }

    #[test]
    fn test_scripted_cycles_and_clamps() {
        let mut dice = ScriptedDice::new([3, 20]);

        assert_eq!(dice.d6(), 3);
        assert_eq!(dice.d6(), 6); // 20 clamped to a d6
        assert_eq!(dice.d20(), 3);
        assert_eq!(dice.d20(), 20);
        assert_eq!(dice.rolled(), 4);

        let mut empty = ScriptedDice::default();
        assert_eq!(empty.d20(), 1);
    }

    #[test]
    fn test_formula_roll() {
        let mut dice = ScriptedDice::constant(4);
        assert_eq!(DiceRoll::new(5, 6, 0).roll_with(&mut dice, "test"), 20);
        assert_eq!(DiceRoll::new(1, 6, -2).roll_with(&mut dice, "test"), 2);

        let mut low = ScriptedDice::constant(1);
        assert_eq!(DiceRoll::new(1, 6, -2).roll_with(&mut low, "test"), 0);
    }

    #[test]
    fn test_min_max() {
        let roll = DiceRoll::new(2, 6, 3);
        assert_eq!(roll.min(), 5);
        assert_eq!(roll.max(), 15);
        assert_eq!(DiceRoll::new(1, 6, -2).min(), 0);
    }

    #[test]
    fn test_display() {
        assert_eq!(DiceRoll::new(6, 6, 0).to_string(), "6d6");
        assert_eq!(DiceRoll::new(1, 20, 5).to_string(), "1d20+5");
        assert_eq!(DiceRoll::new(1, 6, -2).to_string(), "1d6-2");
    }
}
