//! Shared state types for UI communication
//!
//! Designed for real-time safety: static data is sent once at init,
//! dynamic updates are allocation-free.

use harp::{arp::Arpeggiator, sequencing::TimeSignature};

/// Sounding notes shown in the status line (ChordRepeat may have more)
pub const MAX_SHOWN_NOTES: usize = 8;

/// Commands sent from UI thread to audio thread
#[derive(Clone, Copy, Debug)]
pub enum ControlMessage {
    /// Toggle play/pause
    TogglePlayback,
    /// Release everything and forget held keys
    Panic,
}

/// Static state known before the stream starts
#[derive(Clone, Copy, Debug)]
pub struct UiStateInit {
    pub bpm: f64,
    pub time_signature: TimeSignature,
    /// Audio sample rate in Hz
    pub sample_rate: f32,
}

impl UiStateInit {
    pub fn new(bpm: f64, time_signature: TimeSignature, sample_rate: f32) -> Self {
        Self {
            bpm,
            time_signature,
            sample_rate,
        }
    }
}

/// Dynamic state update sent from audio thread (allocation-free, Copy)
#[derive(Clone, Copy, Debug)]
pub struct UiStateUpdate {
    pub is_playing: bool,
    /// Current slot length in samples
    pub slot_samples: u32,
    /// Samples into the current slot
    pub elapsed: u32,
    pub step_index: usize,
    pub repeat_count: u32,
    pub held_count: usize,
    /// Pitches currently sounding (first `sounding_count` are valid)
    pub sounding: [u8; MAX_SHOWN_NOTES],
    pub sounding_count: u8,
    /// Output events dropped in the last window
    pub dropped: usize,
}

impl UiStateUpdate {
    pub fn new() -> Self {
        Self {
            is_playing: true,
            slot_samples: 1,
            elapsed: 0,
            step_index: 0,
            repeat_count: 0,
            held_count: 0,
            sounding: [0; MAX_SHOWN_NOTES],
            sounding_count: 0,
            dropped: 0,
        }
    }

    /// Snapshot the engine after a callback
    pub fn capture(arp: &Arpeggiator, is_playing: bool, dropped: usize) -> Self {
        let state = arp.state();
        let mut sounding = [0; MAX_SHOWN_NOTES];
        let mut sounding_count = 0;
        for (slot, note) in sounding.iter_mut().zip(state.sounding()) {
            *slot = note.pitch;
            sounding_count += 1;
        }
        Self {
            is_playing,
            slot_samples: arp.slot_samples(),
            elapsed: state.elapsed(),
            step_index: state.step_index(),
            repeat_count: state.repeat_count(),
            held_count: arp.held().len(),
            sounding,
            sounding_count,
            dropped,
        }
    }

    pub fn sounding(&self) -> &[u8] {
        &self.sounding[..self.sounding_count as usize]
    }

    /// Position through the current slot (0.0-1.0)
    pub fn slot_progress(&self) -> f64 {
        self.elapsed as f64 / self.slot_samples.max(1) as f64
    }
}
