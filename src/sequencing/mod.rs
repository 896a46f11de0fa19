pub mod rate;
pub mod time_signature;
pub mod transport;

pub use rate::Rate;
pub use time_signature::TimeSignature;
pub use transport::{slot_duration_samples, Transport, DEFAULT_BPM, MAGIC_FACTOR};
