// Purpose - external interfaces, format conversions

pub mod converter;
pub mod midi;

use self::midi::{MidiEvent, TimedMidiEvent};

/// Output events per window before [`MidiBuffer`] starts dropping
pub const MIDI_BUFFER_CAPACITY: usize = 1024;

/// Fixed-capacity output buffer for one processing window.
///
/// Storage is allocated once up front; `push` never grows it, so filling
/// it from the audio thread is allocation-free. Events past capacity are
/// dropped and counted.
#[derive(Debug)]
pub struct MidiBuffer {
    events: Vec<TimedMidiEvent>,
    dropped: usize,
}

impl MidiBuffer {
    pub fn new() -> Self {
        Self::with_capacity(MIDI_BUFFER_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::with_capacity(capacity),
            dropped: 0,
        }
    }

    /// Append an event. Returns false (and counts a drop) when full.
    pub fn push(&mut self, offset: u32, event: MidiEvent) -> bool {
        if self.events.len() == self.events.capacity() {
            self.dropped += 1;
            return false;
        }
        self.events.push(TimedMidiEvent { offset, event });
        true
    }

    /// Clear events for the next window. Keeps the allocation.
    pub fn clear(&mut self) {
        self.events.clear();
        self.dropped = 0;
    }

    pub fn events(&self) -> &[TimedMidiEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.events.capacity()
    }

    /// Events discarded since the last `clear`
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TimedMidiEvent> {
        self.events.iter()
    }
}

impl Default for MidiBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> IntoIterator for &'a MidiBuffer {
    type Item = &'a TimedMidiEvent;
    type IntoIter = std::slice::Iter<'a, TimedMidiEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_within_capacity() {
        let mut buf = MidiBuffer::with_capacity(2);
        assert!(buf.push(0, MidiEvent::note_on(60, 100)));
        assert!(buf.push(5, MidiEvent::note_off(60)));
        assert_eq!(buf.len(), 2);
        assert_eq!(buf.events()[1].offset, 5);
    }

    #[test]
    fn test_overflow_drops_without_growing() {
        let mut buf = MidiBuffer::with_capacity(1);
        let cap = buf.capacity();
        for _ in 0..cap {
            assert!(buf.push(0, MidiEvent::note_on(60, 100)));
        }
        assert!(!buf.push(0, MidiEvent::note_on(61, 100)));
        assert!(!buf.push(0, MidiEvent::note_on(62, 100)));
        assert_eq!(buf.len(), cap);
        assert_eq!(buf.capacity(), cap);
        assert_eq!(buf.dropped(), 2);

        buf.clear();
        assert!(buf.is_empty());
        assert_eq!(buf.dropped(), 0);
        assert_eq!(buf.capacity(), cap);
    }
}
