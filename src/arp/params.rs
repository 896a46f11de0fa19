//! Arpeggiator parameters and a lock-free store for them.
//!
//! The engine only ever sees [`ArpParams`], a `Copy` snapshot taken once per
//! window. [`SharedParams`] is a ready-made parameter store: the UI thread
//! writes individual fields, the audio thread takes snapshots, and neither
//! side ever blocks.

use std::sync::atomic::{AtomicU32, AtomicU8, Ordering};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::order::ArpOrder;
use crate::sequencing::Rate;

pub const VELOCITY_SCALE_MIN: f32 = 0.0;
pub const VELOCITY_SCALE_MAX: f32 = 1.0;
pub const NOTE_LENGTH_MIN: f32 = 0.0;
pub const NOTE_LENGTH_MAX: f32 = 2.0;
/// Largest repeat limit; 0 means repeat forever
pub const REPEAT_LIMIT_MAX: u8 = 16;

/// One window's worth of parameter values
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArpParams {
    /// Slot length as a fraction of a bar
    pub rate: Rate,
    /// Which held note plays next
    pub order: ArpOrder,
    /// Multiplier on held velocity (0.0-1.0)
    pub velocity_scale: f32,
    /// Gate as a proportion of the slot (0.0-2.0)
    pub note_length: f32,
    /// Full traversals before going silent (0 = forever)
    pub repeat_limit: u8,
}

impl Default for ArpParams {
    fn default() -> Self {
        Self {
            rate: Rate::Whole,
            order: ArpOrder::Up,
            velocity_scale: 1.0,
            note_length: 1.0,
            repeat_limit: 0,
        }
    }
}

impl ArpParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from raw parameter-store values.
    ///
    /// Choice indices must name a real rate/order. Continuous values and
    /// the repeat limit are clamped into range rather than rejected.
    pub fn from_raw(
        rate_index: usize,
        order_index: usize,
        velocity_scale: f32,
        note_length: f32,
        repeat_limit: u32,
    ) -> Result<Self, ParamError> {
        let rate = Rate::from_index(rate_index).ok_or(ParamError::InvalidRate { index: rate_index })?;
        let order =
            ArpOrder::from_index(order_index).ok_or(ParamError::InvalidOrder { index: order_index })?;

        Ok(Self::new()
            .with_rate(rate)
            .with_order(order)
            .with_velocity_scale(velocity_scale)
            .with_note_length(note_length)
            .with_repeat_limit(repeat_limit.min(REPEAT_LIMIT_MAX as u32) as u8))
    }

    pub fn with_rate(mut self, rate: Rate) -> Self {
        self.rate = rate;
        self
    }

    pub fn with_order(mut self, order: ArpOrder) -> Self {
        self.order = order;
        self
    }

    pub fn with_velocity_scale(mut self, scale: f32) -> Self {
        self.velocity_scale = clamp_or(scale, VELOCITY_SCALE_MIN, VELOCITY_SCALE_MAX, 1.0);
        self
    }

    pub fn with_note_length(mut self, length: f32) -> Self {
        self.note_length = clamp_or(length, NOTE_LENGTH_MIN, NOTE_LENGTH_MAX, 1.0);
        self
    }

    pub fn with_repeat_limit(mut self, limit: u8) -> Self {
        self.repeat_limit = limit.min(REPEAT_LIMIT_MAX);
        self
    }

    /// Gate length in samples for a slot of `slot_samples`. At least 1.
    pub fn gate_samples(&self, slot_samples: u32) -> u32 {
        let gate = slot_samples as f64 * self.note_length as f64;
        (gate as u32).max(1)
    }
}

/// NaN falls back to `default`
fn clamp_or(value: f32, min: f32, max: f32, default: f32) -> f32 {
    if value.is_nan() {
        default
    } else {
        value.clamp(min, max)
    }
}

/// Errors from [`ArpParams::from_raw`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamError {
    /// Rate choice index outside `0..7`
    InvalidRate { index: usize },
    /// Order choice index outside `0..8`
    InvalidOrder { index: usize },
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParamError::InvalidRate { index } => write!(
                f,
                "Invalid rate choice {}: expected 0..{}",
                index,
                Rate::ALL.len()
            ),
            ParamError::InvalidOrder { index } => write!(
                f,
                "Invalid order choice {}: expected 0..{}",
                index,
                ArpOrder::ALL.len()
            ),
        }
    }
}

impl std::error::Error for ParamError {}

/// Wait-free parameter store.
///
/// Every field is its own atomic (floats stored as `f32` bits), so a
/// writer on the UI thread and a reader on the audio thread never wait on
/// each other. A snapshot reads each field once; it can mix an old and a
/// new field if a write lands mid-snapshot, but never a torn value.
#[derive(Debug)]
pub struct SharedParams {
    rate: AtomicU8,
    order: AtomicU8,
    velocity_scale: AtomicU32,
    note_length: AtomicU32,
    repeat_limit: AtomicU8,
}

impl SharedParams {
    pub fn new(params: ArpParams) -> Self {
        Self {
            rate: AtomicU8::new(params.rate.index() as u8),
            order: AtomicU8::new(params.order.index() as u8),
            velocity_scale: AtomicU32::new(params.velocity_scale.to_bits()),
            note_length: AtomicU32::new(params.note_length.to_bits()),
            repeat_limit: AtomicU8::new(params.repeat_limit),
        }
    }

    /// Read every field once (audio thread, top of each window)
    pub fn snapshot(&self) -> ArpParams {
        let rate = Rate::from_index(self.rate.load(Ordering::Relaxed) as usize).unwrap_or_default();
        let order =
            ArpOrder::from_index(self.order.load(Ordering::Relaxed) as usize).unwrap_or_default();
        ArpParams {
            rate,
            order,
            velocity_scale: f32::from_bits(self.velocity_scale.load(Ordering::Relaxed)),
            note_length: f32::from_bits(self.note_length.load(Ordering::Relaxed)),
            repeat_limit: self.repeat_limit.load(Ordering::Relaxed),
        }
    }

    /// Replace every field
    pub fn store(&self, params: ArpParams) {
        self.set_rate(params.rate);
        self.set_order(params.order);
        self.set_velocity_scale(params.velocity_scale);
        self.set_note_length(params.note_length);
        self.set_repeat_limit(params.repeat_limit);
    }

    pub fn set_rate(&self, rate: Rate) {
        self.rate.store(rate.index() as u8, Ordering::Relaxed);
    }

    pub fn set_order(&self, order: ArpOrder) {
        self.order.store(order.index() as u8, Ordering::Relaxed);
    }

    pub fn set_velocity_scale(&self, scale: f32) {
        let scale = clamp_or(scale, VELOCITY_SCALE_MIN, VELOCITY_SCALE_MAX, 1.0);
        self.velocity_scale.store(scale.to_bits(), Ordering::Relaxed);
    }

    pub fn set_note_length(&self, length: f32) {
        let length = clamp_or(length, NOTE_LENGTH_MIN, NOTE_LENGTH_MAX, 1.0);
        self.note_length.store(length.to_bits(), Ordering::Relaxed);
    }

    pub fn set_repeat_limit(&self, limit: u8) {
        self.repeat_limit
            .store(limit.min(REPEAT_LIMIT_MAX), Ordering::Relaxed);
    }
}

impl Default for SharedParams {
    fn default() -> Self {
        Self::new(ArpParams::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_valid() {
        let p = ArpParams::from_raw(4, 2, 0.5, 0.25, 3).unwrap();
        assert_eq!(p.rate, Rate::Sixteenth);
        assert_eq!(p.order, ArpOrder::UpDown);
        assert_eq!(p.velocity_scale, 0.5);
        assert_eq!(p.note_length, 0.25);
        assert_eq!(p.repeat_limit, 3);
    }

    #[test]
    fn test_from_raw_rejects_bad_choices() {
        assert_eq!(
            ArpParams::from_raw(7, 0, 1.0, 1.0, 0),
            Err(ParamError::InvalidRate { index: 7 })
        );
        assert_eq!(
            ArpParams::from_raw(0, 8, 1.0, 1.0, 0),
            Err(ParamError::InvalidOrder { index: 8 })
        );
        let msg = ParamError::InvalidOrder { index: 8 }.to_string();
        assert!(msg.contains("0..8"), "{msg}");
    }

    #[test]
    fn test_from_raw_clamps_continuous_values() {
        let p = ArpParams::from_raw(0, 0, 3.0, -1.0, 99).unwrap();
        assert_eq!(p.velocity_scale, 1.0);
        assert_eq!(p.note_length, 0.0);
        assert_eq!(p.repeat_limit, REPEAT_LIMIT_MAX);

        let p = ArpParams::new().with_note_length(f32::NAN);
        assert_eq!(p.note_length, 1.0);
    }

    #[test]
    fn test_gate_samples() {
        let p = ArpParams::new().with_note_length(0.5);
        assert_eq!(p.gate_samples(24_000), 12_000);
        let p = ArpParams::new().with_note_length(0.0);
        assert_eq!(p.gate_samples(24_000), 1);
        let p = ArpParams::new().with_note_length(2.0);
        assert_eq!(p.gate_samples(100), 200);
    }

    #[test]
    fn test_shared_params_snapshot() {
        let shared = SharedParams::default();
        assert_eq!(shared.snapshot(), ArpParams::default());

        shared.set_rate(Rate::Eighth);
        shared.set_order(ArpOrder::Random);
        shared.set_velocity_scale(0.75);
        shared.set_note_length(5.0);
        shared.set_repeat_limit(40);

        let snap = shared.snapshot();
        assert_eq!(snap.rate, Rate::Eighth);
        assert_eq!(snap.order, ArpOrder::Random);
        assert_eq!(snap.velocity_scale, 0.75);
        assert_eq!(snap.note_length, NOTE_LENGTH_MAX);
        assert_eq!(snap.repeat_limit, REPEAT_LIMIT_MAX);
    }

    #[test]
    fn test_shared_params_across_threads() {
        use std::sync::Arc;

        let shared = Arc::new(SharedParams::default());
        let writer = {
            let shared = Arc::clone(&shared);
            std::thread::spawn(move || {
                for i in 0..1000 {
                    shared.set_velocity_scale((i % 100) as f32 / 100.0);
                }
            })
        };
        for _ in 0..1000 {
            let v = shared.snapshot().velocity_scale;
            assert!((0.0..=1.0).contains(&v));
        }
        writer.join().unwrap();
    }
}
