// Purpose: held notes in, timed arpeggiated notes out
// This layer sits above io/sequencing and owns all per-window state

pub mod engine;
pub mod held;
pub mod order;
pub mod params;

pub use engine::{Arpeggiator, SequencerState, DEFAULT_SEED};
pub use held::{HeldNote, HeldNotes, InsertOutcome, MAX_HELD_NOTES};
pub use order::{select_next, sequence_length, ArpOrder, Selection};
pub use params::{ArpParams, ParamError, SharedParams};
