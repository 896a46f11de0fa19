#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Arpeggio step rate as a fraction of a bar.
///
/// Each step halves the slot: `1/1` is a whole bar, `1/64` a sixty-fourth of one.
/// The discriminant is the exponent applied in the slot-duration formula,
/// so `2^exponent` is the number of slots per bar.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Rate {
    #[default]
    Whole = 0,
    Half = 1,
    Quarter = 2,
    Eighth = 3,
    Sixteenth = 4,
    ThirtySecond = 5,
    SixtyFourth = 6,
}

impl Rate {
    /// Every rate choice, in parameter order
    pub const ALL: [Rate; 7] = [
        Rate::Whole,
        Rate::Half,
        Rate::Quarter,
        Rate::Eighth,
        Rate::Sixteenth,
        Rate::ThirtySecond,
        Rate::SixtyFourth,
    ];

    /// Look up a rate by its parameter choice index
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Parameter choice index (0 = `1/1`)
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Power-of-two exponent used by the slot-duration formula
    pub const fn exponent(self) -> i32 {
        self as i32
    }

    /// `2^exponent` as a float divisor
    pub fn coefficient(self) -> f64 {
        2.0_f64.powi(self.exponent())
    }

    pub const fn label(self) -> &'static str {
        match self {
            Rate::Whole => "1/1",
            Rate::Half => "1/2",
            Rate::Quarter => "1/4",
            Rate::Eighth => "1/8",
            Rate::Sixteenth => "1/16",
            Rate::ThirtySecond => "1/32",
            Rate::SixtyFourth => "1/64",
        }
    }

    /// Next faster rate, wrapping back to `1/1` after `1/64`
    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    /// Next slower rate, wrapping to `1/64` before `1/1`
    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for Rate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponent_matches_choice_index() {
        for (i, rate) in Rate::ALL.iter().enumerate() {
            assert_eq!(rate.index(), i);
            assert_eq!(rate.exponent(), i as i32);
            assert_eq!(Rate::from_index(i), Some(*rate));
        }
        assert_eq!(Rate::from_index(7), None);
    }

    #[test]
    fn test_coefficient_doubles_per_step() {
        assert_eq!(Rate::Whole.coefficient(), 1.0);
        assert_eq!(Rate::Quarter.coefficient(), 4.0);
        assert_eq!(Rate::Sixteenth.coefficient(), 16.0);
        assert_eq!(Rate::SixtyFourth.coefficient(), 64.0);
    }

    #[test]
    fn test_cycling_wraps() {
        assert_eq!(Rate::SixtyFourth.next(), Rate::Whole);
        assert_eq!(Rate::Whole.prev(), Rate::SixtyFourth);
        assert_eq!(Rate::Eighth.next(), Rate::Sixteenth);
    }

    #[test]
    fn test_labels() {
        assert_eq!(Rate::ThirtySecond.to_string(), "1/32");
        assert_eq!(Rate::default().label(), "1/1");
    }
}
