use log::{debug, warn};
use rand::{rngs::SmallRng, Rng, SeedableRng};

use super::{
    held::{HeldNote, HeldNotes, InsertOutcome, MAX_HELD_NOTES},
    order::{select_next, sequence_length, Selection},
    params::ArpParams,
};
use crate::{
    io::{
        converter::scale_velocity,
        midi::{MidiEvent, MidiReceiver, TimedMidiEvent},
        MidiBuffer,
    },
    sequencing::{Rate, Transport},
};

/*
Arpeggiator Engine
==================

The engine turns "which keys are down" into a stream of single notes (or
repeated chords) locked to the host tempo. It runs once per processing
window, entirely on the audio thread, and never allocates.


Vocabulary
----------

  slot        One arpeggio step. Its length D in samples comes from tempo,
              time signature and rate (see `sequencing::transport`).

  elapsed     Samples since the current slot began. Always < D.

  gate        How long a note rings: D * note_length, at least 1 sample.
              Capped at D once the repeat budget is spent.

  step        Position in the current traversal of the held notes. The
              order mode decides how long a traversal is and which held
              note each step plays.

  repeat      One completed traversal. With a repeat limit set, the phrase
              goes quiet after that many.

  window      The block of samples the host hands us per callback. Every
              event we emit carries an offset inside it.


The Timeline
------------

        slot k                     slot k+1
  ├────────────────────────┼────────────────────────┤
  on                gate   on                gate
  ▼                  ▼     ▼                  ▼
  ██████████████████░░░░░░░████████████████████░░░░░
  │                  │     │
  │                  off   └ next note-on fires when elapsed reaches D
  └ elapsed resets to 0 here

Windows slice through this timeline at arbitrary points:

  │ window │ window │ window │ window │ window │ window │
           ▲ on at offset (D - elapsed)

Each window we walk forward from its first sample. At every point we ask
whether the gate or the slot boundary falls inside what is left of the
window, fire whichever comes first (off before on on a tie), and keep
going. A window longer than a slot simply fires several times. Whatever
remains afterwards is added to `elapsed`, modulo the current D. When a
rate or tempo change shrinks D below `elapsed`, the next boundary is
overdue: it fires at the start of the window and the slot restarts there.


Invariants
----------

  - Single-note orders: at most one note sounding. A note-on always
    releases the previous note at the same offset first, which is what
    makes note lengths above 1.0 legato rather than overlapping.
  - ChordRepeat: the notes sounded together are released together, even
    if the held set changed in between.
  - Every emitted offset is < window size.
  - Releasing the last key releases whatever is sounding and resets the
    phrase, so the next chord starts from step 0.
*/

/// Seed used by [`Arpeggiator::new`]
pub const DEFAULT_SEED: u64 = 0x4841_5250;

/// Playback position, owned by the engine
#[derive(Debug, Clone)]
pub struct SequencerState {
    elapsed: u32,
    step_index: usize,
    repeat_count: u32,
    previous_index: Option<usize>,
    sounding: Vec<HeldNote>,
}

impl SequencerState {
    fn new() -> Self {
        Self {
            elapsed: 0,
            step_index: 0,
            repeat_count: 0,
            previous_index: None,
            sounding: Vec::with_capacity(MAX_HELD_NOTES),
        }
    }

    /// Samples since the current slot began
    pub fn elapsed(&self) -> u32 {
        self.elapsed
    }

    /// Step that plays at the next slot boundary
    pub fn step_index(&self) -> usize {
        self.step_index
    }

    /// Completed traversals. Only counted when a repeat limit is set.
    pub fn repeat_count(&self) -> u32 {
        self.repeat_count
    }

    /// The most recent note still waiting for its note-off
    pub fn last_sounding(&self) -> Option<HeldNote> {
        self.sounding.last().copied()
    }

    /// Every note waiting for its note-off (several in ChordRepeat)
    pub fn sounding(&self) -> &[HeldNote] {
        &self.sounding
    }

    pub fn is_sounding(&self) -> bool {
        !self.sounding.is_empty()
    }

    /// Zero the position. Anything sounding must be released first.
    fn reset(&mut self) {
        self.elapsed = 0;
        self.step_index = 0;
        self.repeat_count = 0;
        self.previous_index = None;
        self.sounding.clear();
    }
}

/// Sample-accurate arpeggiator.
///
/// `R` is the generator behind Random order. It is advanced once per
/// Random step and nowhere else, so a seeded engine replays identically.
pub struct Arpeggiator<R = SmallRng> {
    sample_rate: f64,
    held: HeldNotes,
    state: SequencerState,
    slot_samples: u32,
    playing: Option<bool>,
    rng: R,
    held_full_reported: bool,
    overflow_reported: bool,
}

impl Arpeggiator<SmallRng> {
    pub fn new(sample_rate: f32) -> Self {
        Self::with_seed(sample_rate, DEFAULT_SEED)
    }

    pub fn with_seed(sample_rate: f32, seed: u64) -> Self {
        Self::with_rng(sample_rate, SmallRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Arpeggiator<R> {
    pub fn with_rng(sample_rate: f32, rng: R) -> Self {
        let sample_rate = sample_rate as f64;
        Self {
            sample_rate,
            held: HeldNotes::new(),
            state: SequencerState::new(),
            slot_samples: Transport::standalone().slot_samples(sample_rate, Rate::Whole),
            playing: None,
            rng,
            held_full_reported: false,
            overflow_reported: false,
        }
    }

    /// Start a fresh session: forget held notes and zero the position.
    ///
    /// Call when the host (re)starts processing, e.g. on plugin activation.
    pub fn prepare(&mut self, sample_rate: f32) {
        self.sample_rate = sample_rate as f64;
        self.held.clear();
        self.state.reset();
        self.playing = None;
        self.held_full_reported = false;
        self.overflow_reported = false;
        debug!("arpeggiator prepared at {} Hz", sample_rate);
    }

    /// Run one whole window: transport, incoming MIDI, then scheduling.
    ///
    /// `out` is cleared first and holds this window's events afterwards.
    pub fn process_block(
        &mut self,
        window: u32,
        transport: &Transport,
        params: &ArpParams,
        input: &[TimedMidiEvent],
        out: &mut MidiBuffer,
    ) {
        out.clear();
        self.on_transport_update(transport, params.rate, out);
        self.ingest_midi(input.iter().copied(), out);
        self.advance(window, params, out);
        self.report_overflow(out);
    }

    /// Same as [`process_block`](Self::process_block), draining input from a receiver
    pub fn process_from<M: MidiReceiver + ?Sized>(
        &mut self,
        window: u32,
        transport: &Transport,
        params: &ArpParams,
        input: &mut M,
        out: &mut MidiBuffer,
    ) {
        out.clear();
        self.on_transport_update(transport, params.rate, out);
        while let Some(event) = input.pop() {
            self.ingest_event(event, out);
        }
        self.advance(window, params, out);
        self.report_overflow(out);
    }

    /// Recompute the slot length for this window.
    ///
    /// A stopped-to-playing transition restarts the phrase (held notes
    /// stay held) and releases anything sounding at offset 0.
    pub fn on_transport_update(&mut self, transport: &Transport, rate: Rate, out: &mut MidiBuffer) {
        self.slot_samples = transport.slot_samples(self.sample_rate, rate);

        let started = transport.playing == Some(true) && self.playing != Some(true);
        if started {
            self.release_sounding(0, out);
            self.state.reset();
            debug!(
                "transport started at {:.2} BPM {}, slot = {} samples",
                transport.bpm(),
                transport.time_signature(),
                self.slot_samples
            );
        }
        self.playing = transport.playing;
    }

    /// Apply incoming note events in arrival order.
    ///
    /// Note-ons (velocity > 0) join the held set; note-offs and zero-velocity
    /// note-ons drop every velocity of that pitch. Other messages are
    /// consumed. When the last key goes up, anything sounding is released
    /// at offset 0 and the phrase resets.
    pub fn ingest_midi<I>(&mut self, events: I, out: &mut MidiBuffer)
    where
        I: IntoIterator<Item = TimedMidiEvent>,
    {
        for event in events {
            self.ingest_event(event, out);
        }
    }

    fn ingest_event(&mut self, timed: TimedMidiEvent, out: &mut MidiBuffer) {
        match timed.event {
            MidiEvent::NoteOn { key, velocity, .. } if velocity > 0 => {
                let outcome = self.held.insert(HeldNote::new(key, velocity));
                if outcome == InsertOutcome::Full && !self.held_full_reported {
                    warn!("held-note set full ({} notes), ignoring note {}", MAX_HELD_NOTES, key);
                    self.held_full_reported = true;
                }
            }
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => {
                // a stray note-off for an unheld key changes nothing
                if self.held.release(key) > 0 && self.held.is_empty() {
                    self.release_sounding(0, out);
                    self.state.reset();
                }
            }
            _ => {}
        }
    }

    /// Schedule note-offs and note-ons for a window of `window` samples.
    pub fn advance(&mut self, window: u32, params: &ArpParams, out: &mut MidiBuffer) {
        if window == 0 {
            return;
        }

        let slot = self.slot_samples.max(1);
        let gate = params.gate_samples(slot);
        let mut cursor = 0u32;

        loop {
            let remaining = window - cursor;
            let elapsed = self.state.elapsed;
            let can_trigger = self.can_trigger(params);
            // no next note-on to hand over to, so a long gate ends at the slot boundary
            let deadline = if can_trigger { gate } else { gate.min(slot) };

            let off_in = self
                .state
                .is_sounding()
                .then(|| deadline.saturating_sub(elapsed))
                .filter(|&d| d <= remaining);
            let on_in = can_trigger
                .then(|| slot.saturating_sub(elapsed))
                .filter(|&d| d <= remaining);

            match (off_in, on_in) {
                (Some(off), on) if on.map_or(true, |on| off <= on) => {
                    self.release_sounding(clamp_offset(cursor + off, window), out);
                    self.state.elapsed += off;
                    cursor += off;
                }
                (_, Some(on)) => {
                    cursor += on;
                    self.trigger(clamp_offset(cursor, window), params, out);
                    // on time or overdue, the next slot starts here
                    self.state.elapsed = 0;
                }
                _ => break,
            }
        }

        self.state.elapsed = (self.state.elapsed + (window - cursor)) % slot;
    }

    /// Release whatever is sounding and forget every held key
    pub fn all_notes_off(&mut self, offset: u32, out: &mut MidiBuffer) {
        self.release_sounding(offset, out);
        self.held.clear();
        self.state.reset();
    }

    pub fn held(&self) -> &HeldNotes {
        &self.held
    }

    pub fn state(&self) -> &SequencerState {
        &self.state
    }

    /// Slot length computed at the last transport update
    pub fn slot_samples(&self) -> u32 {
        self.slot_samples
    }

    pub fn sample_rate(&self) -> f64 {
        self.sample_rate
    }

    fn can_trigger(&self, params: &ArpParams) -> bool {
        let exhausted =
            params.repeat_limit > 0 && self.state.repeat_count >= params.repeat_limit as u32;
        !self.held.is_empty() && !exhausted
    }

    fn trigger(&mut self, offset: u32, params: &ArpParams, out: &mut MidiBuffer) {
        // hand over from the previous step
        self.release_sounding(offset, out);

        let held_count = self.held.len();
        let len = sequence_length(params.order, held_count);
        // the held set may have shrunk since the last step
        let step = self.state.step_index % len;

        let selection = select_next(
            params.order,
            step,
            held_count,
            self.state.previous_index,
            &mut self.rng,
        );
        match selection {
            Selection::Single(index) => {
                if let Some(note) = self.held.get(index) {
                    let velocity = scale_velocity(note.velocity, params.velocity_scale);
                    if out.push(offset, MidiEvent::note_on(note.pitch, velocity)) {
                        self.state.sounding.push(note);
                    }
                }
                self.state.previous_index = Some(index);
            }
            Selection::Chord => {
                let notes = self.held.as_slice();
                for (i, note) in notes.iter().enumerate() {
                    // one note-on per pitch; the loudest variant sorts last
                    if notes.get(i + 1).is_some_and(|next| next.pitch == note.pitch) {
                        continue;
                    }
                    let velocity = scale_velocity(note.velocity, params.velocity_scale);
                    if out.push(offset, MidiEvent::note_on(note.pitch, velocity)) {
                        self.state.sounding.push(*note);
                    }
                }
            }
        }

        self.state.step_index = (step + 1) % len;
        if self.state.step_index == 0 && params.repeat_limit > 0 {
            self.state.repeat_count = self.state.repeat_count.saturating_add(1);
        }
    }

    fn release_sounding(&mut self, offset: u32, out: &mut MidiBuffer) {
        for note in self.state.sounding.drain(..) {
            out.push(offset, MidiEvent::note_off(note.pitch));
        }
    }

    fn report_overflow(&mut self, out: &MidiBuffer) {
        if out.dropped() > 0 && !self.overflow_reported {
            warn!(
                "output buffer full, dropped {} events this window",
                out.dropped()
            );
            self.overflow_reported = true;
        }
    }
}

fn clamp_offset(offset: u32, window: u32) -> u32 {
    offset.min(window.saturating_sub(1))
}
