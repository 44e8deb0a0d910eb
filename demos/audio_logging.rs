//! Audio logging example
//!
//! Streams a one-second 440 Hz tone into a WAV file next to the text logs;
//! the header sizes are patched when the logger shuts down.
//!
//! Run with: cargo run --example audio_logging

use rust_clog::prelude::*;
use std::f64::consts::PI;

const SAMPLE_RATE: u32 = 16_000;
const FRAME_LEN: usize = 320;

fn main() -> Result<()> {
    println!("=== Rust CLog - Audio Logging Example ===\n");

    let audio_dir = std::env::temp_dir().join("rust_clog_audio");
    let mut config = Config::default();
    config.audio = AudioConfig {
        enabled: true,
        sample_rate: SAMPLE_RATE,
        output_dir: audio_dir.clone(),
        ..AudioConfig::default()
    };
    api::try_init(config)?;

    let samples: Vec<i16> = (0..SAMPLE_RATE as usize)
        .map(|n| {
            let t = n as f64 / f64::from(SAMPLE_RATE);
            ((2.0 * PI * 440.0 * t).sin() * f64::from(i16::MAX) * 0.25) as i16
        })
        .collect();

    for (idx, frame) in samples.chunks(FRAME_LEN).enumerate() {
        api::audio_write_pcm16(frame)?;
        if idx % 10 == 0 {
            api::debug("Audio", "wrote frame %d", vec![Param::from(idx)]);
        }
    }
    api::success("Audio", "captured %d samples", vec![Param::from(samples.len())]);
    api::shutdown(DEFAULT_SHUTDOWN_TIMEOUT);

    println!("\nWAV files in {}:", audio_dir.display());
    for entry in std::fs::read_dir(&audio_dir)? {
        let entry = entry?;
        println!("   {} ({} bytes)", entry.file_name().to_string_lossy(), entry.metadata()?.len());
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
