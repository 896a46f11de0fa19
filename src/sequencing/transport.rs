//! Host transport snapshot and slot-duration arithmetic.

use super::{rate::Rate, time_signature::TimeSignature};

/// Tempo used when the host reports none (standalone, disconnected host)
pub const DEFAULT_BPM: f64 = 120.0;

/// Scale factor in the slot-duration formula. Removing it shifts every
/// rate by two octaves of time, so it stays a named constant.
pub const MAGIC_FACTOR: f64 = 4.0;

const SECONDS_PER_MINUTE: f64 = 60.0;

/// Upper clamp for slot durations. Keeps offset arithmetic inside `i32`
/// for hosts that report absurdly slow tempos.
pub const MAX_SLOT_SAMPLES: u32 = i32::MAX as u32;

/// What the host tells us once per processing window.
///
/// Every field is optional; a missing value means the host didn't say.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transport {
    pub tempo_bpm: Option<f64>,
    pub time_sig_numerator: Option<u32>,
    pub time_sig_denominator: Option<u32>,
    pub playing: Option<bool>,
}

impl Transport {
    /// No host information at all
    pub fn standalone() -> Self {
        Self::default()
    }

    /// A playing transport at `bpm` in 4/4
    pub fn playing_at(bpm: f64) -> Self {
        Self {
            tempo_bpm: Some(bpm),
            time_sig_numerator: Some(4),
            time_sig_denominator: Some(4),
            playing: Some(true),
        }
    }

    pub fn with_time_signature(mut self, numerator: u32, denominator: u32) -> Self {
        self.time_sig_numerator = Some(numerator);
        self.time_sig_denominator = Some(denominator);
        self
    }

    pub fn with_playing(mut self, playing: bool) -> Self {
        self.playing = Some(playing);
        self
    }

    /// Reported tempo, or [`DEFAULT_BPM`]
    pub fn bpm(&self) -> f64 {
        self.tempo_bpm.unwrap_or(DEFAULT_BPM)
    }

    /// Reported signature, or 4/4
    pub fn time_signature(&self) -> TimeSignature {
        TimeSignature::from_host(self.time_sig_numerator, self.time_sig_denominator)
    }

    /// Slot duration in samples for this transport at `rate`
    pub fn slot_samples(&self, sample_rate: f64, rate: Rate) -> u32 {
        slot_duration_samples(sample_rate, self.bpm(), self.time_signature(), rate)
    }
}

/// Length of one arpeggio slot in samples.
///
/// ```text
/// samples = sample_rate * 60 * MAGIC_FACTOR * num / den / bpm / 2^exponent
/// ```
///
/// Degenerate input (zero tempo, zero denominator, negative values) is
/// not rejected. The result is truncated, then clamped to
/// `1..=MAX_SLOT_SAMPLES` so the clock always advances and never divides
/// by zero.
pub fn slot_duration_samples(sample_rate: f64, bpm: f64, ts: TimeSignature, rate: Rate) -> u32 {
    let samples = sample_rate * SECONDS_PER_MINUTE * MAGIC_FACTOR * ts.whole_notes_per_bar()
        / bpm
        / rate.coefficient();

    if samples.is_nan() {
        return 1;
    }
    samples.clamp(1.0, MAX_SLOT_SAMPLES as f64) as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    const SR: f64 = 48_000.0;

    #[test]
    fn test_whole_bar_at_120() {
        // one 4/4 bar at 120 BPM = 2 seconds
        let d = slot_duration_samples(SR, 120.0, TimeSignature::FOUR_FOUR, Rate::Whole);
        assert_eq!(d, 96_000);
    }

    #[test]
    fn test_rates_halve_duration() {
        let ts = TimeSignature::FOUR_FOUR;
        assert_eq!(slot_duration_samples(SR, 120.0, ts, Rate::Quarter), 24_000);
        assert_eq!(slot_duration_samples(SR, 120.0, ts, Rate::Sixteenth), 6_000);
        assert_eq!(slot_duration_samples(SR, 120.0, ts, Rate::SixtyFourth), 1_500);
    }

    #[test]
    fn test_signature_scales_bar() {
        let d = slot_duration_samples(SR, 120.0, TimeSignature::THREE_FOUR, Rate::Whole);
        assert_eq!(d, 72_000);
        let d = slot_duration_samples(SR, 120.0, TimeSignature::SIX_EIGHT, Rate::Whole);
        assert_eq!(d, 72_000);
    }

    #[test]
    fn test_degenerate_inputs_clamp() {
        let ts = TimeSignature::FOUR_FOUR;
        // zero tempo -> infinity -> upper clamp
        assert_eq!(slot_duration_samples(SR, 0.0, ts, Rate::Whole), MAX_SLOT_SAMPLES);
        // negative tempo -> lower clamp
        assert_eq!(slot_duration_samples(SR, -120.0, ts, Rate::Whole), 1);
        // 0/0 signature -> NaN
        assert_eq!(
            slot_duration_samples(SR, 120.0, TimeSignature::new(0, 0), Rate::Whole),
            1
        );
        // absurdly fast tempo still yields at least one sample
        assert_eq!(slot_duration_samples(SR, 1.0e9, ts, Rate::SixtyFourth), 1);
    }

    #[test]
    fn test_standalone_defaults() {
        let t = Transport::standalone();
        assert_eq!(t.bpm(), DEFAULT_BPM);
        assert_eq!(t.time_signature(), TimeSignature::FOUR_FOUR);
        assert_eq!(t.slot_samples(SR, Rate::Quarter), 24_000);
    }

    #[test]
    fn test_builder() {
        let t = Transport::playing_at(90.0).with_time_signature(7, 8);
        assert_eq!(t.playing, Some(true));
        assert_eq!(t.time_signature(), TimeSignature::new(7, 8));
        assert_eq!(t.bpm(), 90.0);
    }
}
