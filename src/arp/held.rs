//! Held-note set - the notes currently down on the keyboard

/// Most (pitch, velocity) pairs tracked at once. Note-ons past this are ignored.
pub const MAX_HELD_NOTES: usize = 256;

/// One held key. Ordering is by pitch, then velocity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HeldNote {
    /// MIDI note number (0-127)
    pub pitch: u8,
    /// Velocity the key was struck with (0-127)
    pub velocity: u8,
}

impl HeldNote {
    pub const fn new(pitch: u8, velocity: u8) -> Self {
        Self { pitch, velocity }
    }
}

/// What happened to a note-on offered to [`HeldNotes::insert`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOutcome {
    Inserted,
    AlreadyHeld,
    Full,
}

/// Sorted, deduplicated set of held notes.
///
/// Kept in ascending (pitch, velocity) order at all times; that order is
/// what Up/Down traversal walks. The backing storage is reserved once so
/// insert and release never allocate.
#[derive(Debug, Clone)]
pub struct HeldNotes {
    notes: Vec<HeldNote>,
}

impl HeldNotes {
    pub fn new() -> Self {
        Self {
            notes: Vec::with_capacity(MAX_HELD_NOTES),
        }
    }

    pub fn insert(&mut self, note: HeldNote) -> InsertOutcome {
        match self.notes.binary_search(&note) {
            Ok(_) => InsertOutcome::AlreadyHeld,
            Err(_) if self.notes.len() >= MAX_HELD_NOTES => InsertOutcome::Full,
            Err(pos) => {
                self.notes.insert(pos, note);
                InsertOutcome::Inserted
            }
        }
    }

    /// Drop every velocity variant of `pitch`. Returns how many were removed.
    pub fn release(&mut self, pitch: u8) -> usize {
        let before = self.notes.len();
        self.notes.retain(|n| n.pitch != pitch);
        before - self.notes.len()
    }

    pub fn clear(&mut self) {
        self.notes.clear();
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<HeldNote> {
        self.notes.get(index).copied()
    }

    pub fn as_slice(&self) -> &[HeldNote] {
        &self.notes
    }

    pub fn iter(&self) -> std::slice::Iter<'_, HeldNote> {
        self.notes.iter()
    }
}

impl Default for HeldNotes {
    fn default() -> Self {
        Self::new()
    }
}
