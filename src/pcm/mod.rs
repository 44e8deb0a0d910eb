//! Raw PCM audio logging to streaming WAV files

pub mod config;
pub mod writer;

pub use config::{AudioConfig, DEFAULT_FILENAME_PATTERN};
pub use writer::{WavSpec, WavWriter, HEADER_LEN};
