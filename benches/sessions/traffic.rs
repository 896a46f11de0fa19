//! Benchmarks for a second of playing with keys going up and down.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use harp::{
    arp::{ArpOrder, ArpParams, Arpeggiator},
    io::{midi::TimedMidiEvent, MidiBuffer},
    sequencing::{Rate, Transport},
    MidiEvent,
};

use crate::BLOCK_SIZES;

const SAMPLE_RATE: u32 = 48_000;

/// Press and release a rolling four-note window of keys every few windows
fn traffic(window_index: usize) -> [TimedMidiEvent; 2] {
    let key = 48 + (window_index % 24) as u8;
    [
        TimedMidiEvent::new(0, MidiEvent::note_on(key + 4, 90)),
        TimedMidiEvent::new(1, MidiEvent::note_off(key)),
    ]
}

pub fn bench_sessions(c: &mut Criterion) {
    let mut group = c.benchmark_group("sessions/traffic");
    let transport = Transport::playing_at(128.0);

    for order in [ArpOrder::Up, ArpOrder::Random, ArpOrder::ChordRepeat] {
        let params = ArpParams::new()
            .with_rate(Rate::ThirtySecond)
            .with_order(order)
            .with_note_length(0.8);

        for &size in BLOCK_SIZES {
            let windows = SAMPLE_RATE as usize / size;
            let id = BenchmarkId::new(order.label().replace(' ', "_").to_lowercase(), size);
            group.bench_with_input(id, &size, |b, &size| {
                b.iter(|| {
                    let mut arp = Arpeggiator::new(SAMPLE_RATE as f32);
                    let mut out = MidiBuffer::new();
                    for w in 0..windows {
                        let events = traffic(w);
                        let input: &[TimedMidiEvent] = if w % 4 == 0 { &events } else { &[] };
                        arp.process_block(size as u32, &transport, &params, input, &mut out);
                        black_box(out.len());
                    }
                })
            });
        }
    }

    group.finish();
}
