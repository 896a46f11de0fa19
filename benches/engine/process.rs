//! Benchmarks for a single processing window.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion};
use harp::{
    arp::{ArpOrder, ArpParams, Arpeggiator},
    io::{midi::TimedMidiEvent, MidiBuffer},
    sequencing::{Rate, Transport},
    MidiEvent,
};

use crate::BLOCK_SIZES;

fn chord(size: u8) -> Vec<TimedMidiEvent> {
    (0..size)
        .map(|i| TimedMidiEvent::new(0, MidiEvent::note_on(48 + i * 3, 100)))
        .collect()
}

pub fn bench_process(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine/process");
    let transport = Transport::playing_at(140.0);

    for &size in BLOCK_SIZES {
        let window = size as u32;
        let mut out = MidiBuffer::new();

        // Nothing held: the cost of an idle arpeggiator
        let mut idle = Arpeggiator::new(48_000.0);
        let params = ArpParams::new().with_rate(Rate::Sixteenth);
        group.bench_with_input(BenchmarkId::new("idle", size), &size, |b, _| {
            b.iter(|| {
                idle.process_block(black_box(window), &transport, &params, &[], &mut out);
            })
        });

        // Fast rate so most windows cross a slot boundary
        let mut busy = Arpeggiator::new(48_000.0);
        let params = ArpParams::new()
            .with_rate(Rate::SixtyFourth)
            .with_order(ArpOrder::UpAndDown)
            .with_note_length(0.5);
        busy.ingest_midi(chord(8), &mut out);
        group.bench_with_input(BenchmarkId::new("up_and_down_8", size), &size, |b, _| {
            b.iter(|| {
                busy.process_block(black_box(window), &transport, &params, &[], &mut out);
            })
        });

        let mut chords = Arpeggiator::new(48_000.0);
        let params = ArpParams::new()
            .with_rate(Rate::SixtyFourth)
            .with_order(ArpOrder::ChordRepeat);
        chords.ingest_midi(chord(32), &mut out);
        group.bench_with_input(BenchmarkId::new("chord_repeat_32", size), &size, |b, _| {
            b.iter(|| {
                chords.process_block(black_box(window), &transport, &params, &[], &mut out);
            })
        });
    }

    group.finish();
}
