#[cfg(feature = "rtrb")]
use rtrb::Consumer;

/// Channel every arpeggiated note is emitted on (0-based, "MIDI channel 1")
pub const OUTPUT_CHANNEL: u8 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiEvent {
    NoteOn { channel: u8, key: u8, velocity: u8 },
    NoteOff { channel: u8, key: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    PitchBend { channel: u8, value: i16 },
    ProgramChange { channel: u8, program: u8 },
}

impl MidiEvent {
    pub fn note_on(key: u8, velocity: u8) -> Self {
        MidiEvent::NoteOn {
            channel: OUTPUT_CHANNEL,
            key,
            velocity,
        }
    }

    pub fn note_off(key: u8) -> Self {
        MidiEvent::NoteOff {
            channel: OUTPUT_CHANNEL,
            key,
            velocity: 0,
        }
    }

    /// Note number for note on/off events
    pub fn key(&self) -> Option<u8> {
        match *self {
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn is_note_on(&self) -> bool {
        matches!(self, MidiEvent::NoteOn { velocity, .. } if *velocity > 0)
    }

    /// True for note-offs and for note-ons with velocity 0
    pub fn is_note_off(&self) -> bool {
        matches!(
            self,
            MidiEvent::NoteOff { .. } | MidiEvent::NoteOn { velocity: 0, .. }
        )
    }

    /// Parse one channel-voice message from raw bytes.
    ///
    /// Only the status byte's high nibble and the data bytes it needs are
    /// read; trailing bytes are ignored.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, MidiError> {
        let status = *bytes.first().ok_or(MidiError::Empty)?;
        let channel = status & 0x0F;
        let kind = status & 0xF0;

        let needed = match kind {
            0x80 | 0x90 | 0xB0 | 0xE0 => 3,
            0xC0 => 2,
            _ => return Err(MidiError::Unsupported { status }),
        };
        if bytes.len() < needed {
            return Err(MidiError::Truncated {
                status,
                expected: needed,
                actual: bytes.len(),
            });
        }
        let d1 = bytes[1] & 0x7F;
        let d2 = bytes.get(2).map_or(0, |b| b & 0x7F);

        Ok(match kind {
            0x80 => MidiEvent::NoteOff {
                channel,
                key: d1,
                velocity: d2,
            },
            0x90 => MidiEvent::NoteOn {
                channel,
                key: d1,
                velocity: d2,
            },
            0xB0 => MidiEvent::ControlChange {
                channel,
                controller: d1,
                value: d2,
            },
            0xC0 => MidiEvent::ProgramChange {
                channel,
                program: d1,
            },
            // 14-bit value, centred on 0x2000
            _ => MidiEvent::PitchBend {
                channel,
                value: (((d2 as i16) << 7) | d1 as i16) - 0x2000,
            },
        })
    }

    /// Encode into raw bytes. Returns the buffer and how many bytes are used.
    pub fn to_bytes(&self) -> ([u8; 3], usize) {
        match *self {
            MidiEvent::NoteOff {
                channel,
                key,
                velocity,
            } => ([0x80 | (channel & 0x0F), key & 0x7F, velocity & 0x7F], 3),
            MidiEvent::NoteOn {
                channel,
                key,
                velocity,
            } => ([0x90 | (channel & 0x0F), key & 0x7F, velocity & 0x7F], 3),
            MidiEvent::ControlChange {
                channel,
                controller,
                value,
            } => ([0xB0 | (channel & 0x0F), controller & 0x7F, value & 0x7F], 3),
            MidiEvent::ProgramChange { channel, program } => {
                ([0xC0 | (channel & 0x0F), program & 0x7F, 0], 2)
            }
            MidiEvent::PitchBend { channel, value } => {
                let raw = (value.clamp(-0x2000, 0x1FFF) + 0x2000) as u16;
                (
                    [0xE0 | (channel & 0x0F), (raw & 0x7F) as u8, (raw >> 7) as u8],
                    3,
                )
            }
        }
    }
}

/// A MIDI event positioned inside a processing window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedMidiEvent {
    /// Sample offset from the start of the window
    pub offset: u32,
    pub event: MidiEvent,
}

impl TimedMidiEvent {
    pub fn new(offset: u32, event: MidiEvent) -> Self {
        Self { offset, event }
    }
}

/// Errors from [`MidiEvent::from_bytes`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MidiError {
    /// No bytes at all
    Empty,
    /// Fewer data bytes than the status byte requires
    Truncated {
        status: u8,
        expected: usize,
        actual: usize,
    },
    /// System messages, aftertouch and running status are not handled
    Unsupported { status: u8 },
}

impl std::fmt::Display for MidiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MidiError::Empty => write!(f, "Empty MIDI message"),
            MidiError::Truncated {
                status,
                expected,
                actual,
            } => write!(
                f,
                "Truncated MIDI message: status {:#04x} needs {} bytes, got {}",
                status, expected, actual
            ),
            MidiError::Unsupported { status } => {
                write!(f, "Unsupported MIDI status byte {:#04x}", status)
            }
        }
    }
}

impl std::error::Error for MidiError {}

/// Source of incoming MIDI for the audio thread
pub trait MidiReceiver {
    fn pop(&mut self) -> Option<TimedMidiEvent>;
}

#[cfg(feature = "rtrb")]
impl MidiReceiver for Consumer<TimedMidiEvent> {
    fn pop(&mut self) -> Option<TimedMidiEvent> {
        Consumer::pop(self).ok()
    }
}
