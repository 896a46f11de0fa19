//! Monitor synth - a small sine voice pool so the arpeggio can be heard

use std::f32::consts::TAU;

use harp::io::{
    converter::{midi_note_to_freq, velocity_to_gain},
    midi::MidiEvent,
};

const MAX_VOICES: usize = 16;
const ATTACK_SECONDS: f32 = 0.004;
const RELEASE_SECONDS: f32 = 0.06;
/// Headroom so a full chord doesn't clip
const VOICE_GAIN: f32 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum VoiceState {
    Free,
    Active,
    Releasing,
}

#[derive(Debug, Clone, Copy)]
struct Voice {
    note: u8,
    state: VoiceState,
    age: u64,
    phase: f32,
    phase_inc: f32,
    gain: f32,
    level: f32,
}

impl Voice {
    const FREE: Voice = Voice {
        note: 0,
        state: VoiceState::Free,
        age: 0,
        phase: 0.0,
        phase_inc: 0.0,
        gain: 0.0,
        level: 0.0,
    };
}

pub struct Synth {
    voices: [Voice; MAX_VOICES],
    sample_rate: f32,
    attack_step: f32,
    release_step: f32,
    frame_counter: u64,
}

impl Synth {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            voices: [Voice::FREE; MAX_VOICES],
            sample_rate,
            attack_step: 1.0 / (ATTACK_SECONDS * sample_rate),
            release_step: 1.0 / (RELEASE_SECONDS * sample_rate),
            frame_counter: 0,
        }
    }

    pub fn handle(&mut self, event: &MidiEvent) {
        match *event {
            MidiEvent::NoteOn { key, velocity, .. } if velocity > 0 => self.note_on(key, velocity),
            MidiEvent::NoteOn { key, .. } | MidiEvent::NoteOff { key, .. } => self.note_off(key),
            _ => {}
        }
    }

    pub fn all_off(&mut self) {
        for voice in &mut self.voices {
            if voice.state == VoiceState::Active {
                voice.state = VoiceState::Releasing;
            }
        }
    }

    /// Mix every sounding voice into `out`
    pub fn render(&mut self, out: &mut [f32]) {
        for voice in self.voices.iter_mut().filter(|v| v.state != VoiceState::Free) {
            for sample in out.iter_mut() {
                match voice.state {
                    VoiceState::Active => voice.level = (voice.level + self.attack_step).min(1.0),
                    VoiceState::Releasing => {
                        voice.level -= self.release_step;
                        if voice.level <= 0.0 {
                            voice.level = 0.0;
                            voice.state = VoiceState::Free;
                            break;
                        }
                    }
                    VoiceState::Free => break,
                }
                *sample += (voice.phase * TAU).sin() * voice.level * voice.gain;
                voice.phase = (voice.phase + voice.phase_inc).fract();
            }
        }
        self.frame_counter += out.len() as u64;
    }

    fn note_on(&mut self, note: u8, velocity: u8) {
        let age = self.frame_counter;
        let phase_inc = midi_note_to_freq(note) / self.sample_rate;
        let gain = velocity_to_gain(velocity) * VOICE_GAIN;
        let voice = self.allocate_voice();
        *voice = Voice {
            note,
            state: VoiceState::Active,
            age,
            phase: 0.0,
            phase_inc,
            gain,
            level: 0.0,
        };
    }

    fn note_off(&mut self, note: u8) {
        for voice in &mut self.voices {
            if voice.note == note && voice.state == VoiceState::Active {
                voice.state = VoiceState::Releasing;
            }
        }
    }

    /// Free voice if there is one, else steal the oldest
    fn allocate_voice(&mut self) -> &mut Voice {
        let index = self
            .voices
            .iter()
            .position(|v| v.state == VoiceState::Free)
            .or_else(|| {
                self.voices
                    .iter()
                    .enumerate()
                    .min_by_key(|(_, v)| v.age)
                    .map(|(i, _)| i)
            })
            .unwrap_or(0);
        &mut self.voices[index]
    }
}
