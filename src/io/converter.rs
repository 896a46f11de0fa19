pub fn midi_note_to_freq(note: u8) -> f32 {
    440.0 * 2.0_f32.powf((note as f32 - 69.0) / 12.0)
}

/// Scale a held velocity by `scale` for output.
///
/// Rounds to nearest and never returns 0, since a zero-velocity note-on
/// reads as a note-off on the receiving end.
pub fn scale_velocity(velocity: u8, scale: f32) -> u8 {
    let scaled = (velocity as f32 * scale).round();
    scaled.clamp(1.0, 127.0) as u8
}

pub fn velocity_to_gain(velocity: u8) -> f32 {
    velocity.min(127) as f32 / 127.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_concert_a() {
        assert!((midi_note_to_freq(69) - 440.0).abs() < 1e-3);
        assert!((midi_note_to_freq(81) - 880.0).abs() < 1e-2);
    }

    #[test]
    fn test_velocity_scaling_rounds() {
        assert_eq!(scale_velocity(100, 1.0), 100);
        assert_eq!(scale_velocity(100, 0.5), 50);
        assert_eq!(scale_velocity(99, 0.5), 50); // 49.5 rounds up
        assert_eq!(scale_velocity(127, 0.333), 42);
    }

    #[test]
    fn test_velocity_scaling_never_zero() {
        assert_eq!(scale_velocity(10, 0.0), 1);
        assert_eq!(scale_velocity(1, 0.01), 1);
    }
}
