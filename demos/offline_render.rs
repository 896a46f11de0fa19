//! Render a few bars of arpeggio offline and print the event stream.
//!
//! Run with: RUST_LOG=debug cargo run --example offline_render -- [order] [rate]
//!
//! `order` is a choice index 0-7, `rate` a choice index 0-6 (defaults: Up, 1/16).
//! Raw MIDI bytes are decoded on the way in and encoded on the way out, the
//! way a plugin wrapper would see them.

use harp::{
    arp::{ArpParams, Arpeggiator},
    io::{
        midi::{MidiEvent, TimedMidiEvent},
        MidiBuffer,
    },
    sequencing::Transport,
};

const SAMPLE_RATE: f32 = 48_000.0;
const WINDOW: u32 = 256;
const BARS: u32 = 2;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let order = args.next().map(|a| a.parse()).transpose()?.unwrap_or(0);
    let rate = args.next().map(|a| a.parse()).transpose()?.unwrap_or(4);
    let params = ArpParams::from_raw(rate, order, 0.9, 0.5, 0)?;

    let transport = Transport::playing_at(120.0);
    let mut arp = Arpeggiator::new(SAMPLE_RATE);
    arp.prepare(SAMPLE_RATE);

    // C minor triad as raw bytes, released just before the end
    let mut chord = Vec::new();
    for bytes in [[0x90, 60, 100], [0x90, 63, 90], [0x90, 67, 80]] {
        chord.push(TimedMidiEvent::new(0, MidiEvent::from_bytes(&bytes)?));
    }
    let release: Vec<_> = [60u8, 63, 67]
        .iter()
        .map(|&key| TimedMidiEvent::new(0, MidiEvent::note_off(key)))
        .collect();

    let bar = transport.slot_samples(SAMPLE_RATE as f64, harp::sequencing::Rate::Whole);
    let windows = bar * BARS / WINDOW;

    println!("=== harp offline render ===");
    println!("Order: {}  Rate: {}", params.order, params.rate);
    println!("Slot: {} samples  Bar: {} samples", transport.slot_samples(SAMPLE_RATE as f64, params.rate), bar);
    println!();

    let mut out = MidiBuffer::new();
    for w in 0..windows {
        let input: &[TimedMidiEvent] = match w {
            0 => &chord,
            _ if w == windows - 1 => &release,
            _ => &[],
        };
        arp.process_block(WINDOW, &transport, &params, input, &mut out);

        for timed in &out {
            let (bytes, len) = timed.event.to_bytes();
            let at = w * WINDOW + timed.offset;
            println!(
                "{:>8}  {:>6.3}s  {:02X?}",
                at,
                at as f64 / SAMPLE_RATE as f64,
                &bytes[..len]
            );
        }
    }

    Ok(())
}
