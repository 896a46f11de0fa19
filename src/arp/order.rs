//! Playback order - which held note plays at each step

use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArpOrder {
    /// Lowest to highest
    #[default]
    Up,
    /// Highest to lowest
    Down,
    /// Up then down, end notes played once
    UpDown,
    /// Down then up, end notes played once
    DownUp,
    /// Up then down, end notes repeated
    UpAndDown,
    /// Down then up, end notes repeated
    DownAndUp,
    /// Random note, never the same index twice in a row
    Random,
    /// Every held note at once
    ChordRepeat,
}

impl ArpOrder {
    pub const ALL: [ArpOrder; 8] = [
        ArpOrder::Up,
        ArpOrder::Down,
        ArpOrder::UpDown,
        ArpOrder::DownUp,
        ArpOrder::UpAndDown,
        ArpOrder::DownAndUp,
        ArpOrder::Random,
        ArpOrder::ChordRepeat,
    ];

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    pub const fn index(self) -> usize {
        self as usize
    }

    pub const fn label(self) -> &'static str {
        match self {
            ArpOrder::Up => "Up",
            ArpOrder::Down => "Down",
            ArpOrder::UpDown => "Up/Down",
            ArpOrder::DownUp => "Down/Up",
            ArpOrder::UpAndDown => "Up & Down",
            ArpOrder::DownAndUp => "Down & Up",
            ArpOrder::Random => "Random",
            ArpOrder::ChordRepeat => "Chord Repeat",
        }
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl std::fmt::Display for ArpOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Result of picking the next step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Play the held note at this index
    Single(usize),
    /// Play every held note together
    Chord,
}

/// Steps in one full traversal of `held_count` notes.
///
/// Never returns 0, so it is always safe to use as a modulus.
pub fn sequence_length(order: ArpOrder, held_count: usize) -> usize {
    let len = match order {
        ArpOrder::Up | ArpOrder::Down | ArpOrder::Random => held_count,
        ArpOrder::UpDown | ArpOrder::DownUp => (held_count * 2).saturating_sub(2),
        ArpOrder::UpAndDown | ArpOrder::DownAndUp => held_count * 2,
        ArpOrder::ChordRepeat => 1,
    };
    len.max(1)
}

/// Index into the held set for the directional orders.
///
/// `step` must be below `sequence_length(order, held_count)` and
/// `held_count` must be non-zero. Random and ChordRepeat have no fixed
/// mapping and return 0; use [`select_next`] for those.
pub fn pattern_index(order: ArpOrder, step: usize, held_count: usize) -> usize {
    let n = held_count;
    let index = match order {
        ArpOrder::Up => step,
        ArpOrder::Down => n - 1 - step.min(n - 1),
        _ if n <= 1 => 0,
        ArpOrder::UpDown if step < n => step,
        ArpOrder::UpDown => (2 * n - 2).saturating_sub(step),
        ArpOrder::DownUp if step < n => n - 1 - step,
        ArpOrder::DownUp => step + 1 - n,
        ArpOrder::UpAndDown if step < n => step,
        ArpOrder::UpAndDown => (2 * n - 1).saturating_sub(step),
        ArpOrder::DownAndUp if step < n => n - 1 - step,
        ArpOrder::DownAndUp => step - n,
        ArpOrder::Random | ArpOrder::ChordRepeat => 0,
    };
    index.min(n - 1)
}

/// Uniform random index, shifted to a neighbour if it repeats `previous`
pub fn random_index<R: Rng + ?Sized>(held_count: usize, previous: Option<usize>, rng: &mut R) -> usize {
    if held_count <= 1 {
        return 0;
    }
    let index = rng.random_range(0..held_count);
    match previous {
        Some(prev) if prev == index => {
            if index == held_count - 1 {
                index - 1
            } else {
                index + 1
            }
        }
        _ => index,
    }
}

/// Pick what plays at `step`.
///
/// `held_count` must be non-zero; the engine never calls this with an
/// empty held set.
pub fn select_next<R: Rng + ?Sized>(
    order: ArpOrder,
    step: usize,
    held_count: usize,
    previous: Option<usize>,
    rng: &mut R,
) -> Selection {
    debug_assert!(held_count > 0, "select_next called with no held notes");
    match order {
        ArpOrder::ChordRepeat => Selection::Chord,
        ArpOrder::Random => Selection::Single(random_index(held_count, previous, rng)),
        _ => Selection::Single(pattern_index(order, step, held_count)),
    }
}
