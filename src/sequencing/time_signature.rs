/// Time signature as reported by the host transport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSignature {
    /// Number of beats per bar (numerator)
    pub numerator: u32,
    /// Note value that gets one beat (denominator: 4 = quarter, 8 = eighth)
    pub denominator: u32,
}

impl TimeSignature {
    /// Standard 4/4 time, also the fallback when the host reports nothing
    pub const FOUR_FOUR: TimeSignature = TimeSignature {
        numerator: 4,
        denominator: 4,
    };

    /// 3/4 time (waltz)
    pub const THREE_FOUR: TimeSignature = TimeSignature {
        numerator: 3,
        denominator: 4,
    };

    /// 6/8 time (compound duple)
    pub const SIX_EIGHT: TimeSignature = TimeSignature {
        numerator: 6,
        denominator: 8,
    };

    pub const fn new(numerator: u32, denominator: u32) -> Self {
        Self {
            numerator,
            denominator,
        }
    }

    /// Build from optional host values.
    ///
    /// The signature is taken as a unit: if either half is missing the
    /// whole thing falls back to 4/4. Degenerate values (a zero
    /// denominator, say) are passed through unchanged.
    pub fn from_host(numerator: Option<u32>, denominator: Option<u32>) -> Self {
        match (numerator, denominator) {
            (Some(numerator), Some(denominator)) => Self::new(numerator, denominator),
            _ => Self::FOUR_FOUR,
        }
    }

    /// Length of one bar measured in whole notes
    ///
    /// 4/4 = 1.0, 3/4 = 0.75, 6/8 = 0.75, 2/2 = 1.0
    pub fn whole_notes_per_bar(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self::FOUR_FOUR
    }
}

impl std::fmt::Display for TimeSignature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bar_lengths() {
        assert_eq!(TimeSignature::FOUR_FOUR.whole_notes_per_bar(), 1.0);
        assert_eq!(TimeSignature::THREE_FOUR.whole_notes_per_bar(), 0.75);
        assert_eq!(TimeSignature::SIX_EIGHT.whole_notes_per_bar(), 0.75);
        assert_eq!(TimeSignature::new(2, 2).whole_notes_per_bar(), 1.0);
    }

    #[test]
    fn test_missing_host_values_fall_back_to_four_four() {
        assert_eq!(TimeSignature::from_host(None, None), TimeSignature::FOUR_FOUR);
        assert_eq!(TimeSignature::from_host(Some(3), None), TimeSignature::FOUR_FOUR);
        assert_eq!(TimeSignature::from_host(None, Some(8)), TimeSignature::FOUR_FOUR);
        assert_eq!(
            TimeSignature::from_host(Some(7), Some(8)),
            TimeSignature::new(7, 8)
        );
    }

    #[test]
    fn test_degenerate_denominator_passes_through() {
        let ts = TimeSignature::from_host(Some(4), Some(0));
        assert_eq!(ts.denominator, 0);
        assert!(ts.whole_notes_per_bar().is_infinite());
    }

    #[test]
    fn test_display() {
        assert_eq!(TimeSignature::SIX_EIGHT.to_string(), "6/8");
    }
}
