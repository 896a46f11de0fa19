//! Harp - application builder and runner

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use rtrb::RingBuffer;
use std::sync::Arc;

use super::synth::Synth;
use super::ui::{
    state::{ControlMessage, UiStateInit, UiStateUpdate},
    UiApp,
};

use harp::{
    arp::{Arpeggiator, SharedParams, DEFAULT_SEED},
    io::{midi::TimedMidiEvent, MidiBuffer},
    sequencing::{TimeSignature, Transport},
    ArpParams, MAX_BLOCK_SIZE,
};

/// Keyboard events queued from the UI thread
const KEY_QUEUE: usize = 256;
const CONTROL_QUEUE: usize = 32;
const STATE_QUEUE: usize = 64;

/// Main application builder
pub struct Harp {
    bpm: f64,
    time_signature: TimeSignature,
    params: ArpParams,
    seed: u64,
}

impl Harp {
    pub fn new() -> Self {
        Self {
            bpm: 120.0,
            time_signature: TimeSignature::FOUR_FOUR,
            params: ArpParams::default(),
            seed: DEFAULT_SEED,
        }
    }

    /// Set the tempo in beats per minute
    pub fn bpm(mut self, bpm: f64) -> Self {
        self.bpm = bpm;
        self
    }

    pub fn time_signature(mut self, numerator: u32, denominator: u32) -> Self {
        self.time_signature = TimeSignature::new(numerator, denominator);
        self
    }

    /// Starting parameter values; the UI edits them live
    pub fn params(mut self, params: ArpParams) -> Self {
        self.params = params;
        self
    }

    /// Seed for Random order
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Run the application (takes over the terminal, plays audio)
    pub fn run(self) -> EyreResult<()> {
        if !(self.bpm.is_finite() && self.bpm > 0.0) {
            return Err(eyre!("BPM must be a positive number, got {}", self.bpm));
        }

        // Set up audio
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let sample_rate = config.sample_rate().0 as f32;
        let channels = config.channels() as usize;

        let params = Arc::new(SharedParams::new(self.params));
        let (key_tx, mut key_rx) = RingBuffer::<TimedMidiEvent>::new(KEY_QUEUE);
        let (control_tx, mut control_rx) = RingBuffer::<ControlMessage>::new(CONTROL_QUEUE);
        let (mut state_tx, state_rx) = RingBuffer::<UiStateUpdate>::new(STATE_QUEUE);

        // Everything below moves into the audio callback and is owned there
        let mut arp = Arpeggiator::with_seed(sample_rate, self.seed);
        arp.prepare(sample_rate);
        let mut synth = Synth::new(sample_rate);
        let mut arp_out = MidiBuffer::new();
        let mut render_buf = vec![0.0f32; MAX_BLOCK_SIZE];
        let mut playing = true;
        let audio_params = Arc::clone(&params);
        let host_transport = Transport::playing_at(self.bpm)
            .with_time_signature(self.time_signature.numerator, self.time_signature.denominator);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    while let Ok(message) = control_rx.pop() {
                        match message {
                            ControlMessage::TogglePlayback => {
                                playing = !playing;
                                if !playing {
                                    synth.all_off();
                                }
                            }
                            ControlMessage::Panic => {
                                arp.all_notes_off(0, &mut arp_out);
                                synth.all_off();
                            }
                        }
                    }

                    let total_frames = data.len() / channels;
                    let mut frames_written = 0;

                    while frames_written < total_frames {
                        let frames_to_render = (total_frames - frames_written).min(MAX_BLOCK_SIZE);
                        let block = &mut render_buf[..frames_to_render];
                        block.fill(0.0);

                        // Parameters are read once per window
                        let snapshot = audio_params.snapshot();
                        let transport = host_transport.with_playing(playing);

                        if playing {
                            arp.process_from(
                                frames_to_render as u32,
                                &transport,
                                &snapshot,
                                &mut key_rx,
                                &mut arp_out,
                            );
                            render_events(&arp_out, &mut synth, block);
                        } else {
                            // keep tracking the stop so resuming restarts the phrase
                            arp_out.clear();
                            arp.on_transport_update(&transport, snapshot.rate, &mut arp_out);
                            synth.render(block);
                        }

                        // Copy to output (mono to all channels)
                        let out_off = frames_written * channels;
                        for (i, &s) in block.iter().enumerate() {
                            for ch in 0..channels {
                                data[out_off + i * channels + ch] = s;
                            }
                        }

                        frames_written += frames_to_render;
                    }

                    // UI only wants the latest; a full queue just skips a frame
                    let _ = state_tx.push(UiStateUpdate::capture(&arp, playing, arp_out.dropped()));
                },
                |err| eprintln!("Audio error: {}", err),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        let init = UiStateInit::new(self.bpm, self.time_signature, sample_rate);
        let mut ui = UiApp::new(params, key_tx, control_tx, state_rx, init);

        let mut terminal = ratatui::init();
        let result = ui.run(&mut terminal);
        ratatui::restore();

        drop(stream);
        result
    }
}

impl Default for Harp {
    fn default() -> Self {
        Self::new()
    }
}

/// Render one window, applying each event at its sample offset
fn render_events(events: &MidiBuffer, synth: &mut Synth, block: &mut [f32]) {
    let mut pos = 0;
    for timed in events {
        let at = (timed.offset as usize).clamp(pos, block.len());
        synth.render(&mut block[pos..at]);
        synth.handle(&timed.event);
        pos = at;
    }
    synth.render(&mut block[pos..]);
}
