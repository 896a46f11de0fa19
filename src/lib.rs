pub mod arp; // Held-note tracking, ordering, scheduling
pub mod io;
pub mod sequencing; // Tempo, time signature, slot lengths

pub use arp::{ArpOrder, ArpParams, Arpeggiator};
pub use io::{
    midi::{MidiEvent, TimedMidiEvent},
    MidiBuffer,
};
pub use sequencing::{Rate, TimeSignature, Transport};

/// Largest window the bundled shells hand to the engine in one call
pub const MAX_BLOCK_SIZE: usize = 2048;
