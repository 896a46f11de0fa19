//! harp - terminal arpeggiator
//!
//! Run with: cargo run -- [bpm] [seed]

mod app;
mod synth;
mod ui;

use app::Harp;
use color_eyre::eyre::WrapErr;
use harp::{
    arp::{ArpParams, DEFAULT_SEED},
    sequencing::Rate,
    ArpOrder,
};

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let mut args = std::env::args().skip(1);
    let bpm = match args.next() {
        Some(arg) => arg
            .parse::<f64>()
            .wrap_err_with(|| format!("invalid BPM '{arg}'"))?,
        None => 120.0,
    };
    // Random order replays the same way for the same seed
    let seed = match args.next() {
        Some(arg) => arg
            .parse::<u64>()
            .wrap_err_with(|| format!("invalid seed '{arg}'"))?,
        None => DEFAULT_SEED,
    };

    let params = ArpParams::new()
        .with_rate(Rate::Sixteenth)
        .with_order(ArpOrder::UpDown)
        .with_note_length(0.5)
        .with_velocity_scale(0.8);

    Harp::new()
        .bpm(bpm)
        .time_signature(4, 4)
        .params(params)
        .seed(seed)
        .run()
}
