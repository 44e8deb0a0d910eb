//! Streaming WAV writer for 16-bit PCM
//!
//! The canonical 44-byte header is written up front with zeroed size
//! fields; samples are appended as they arrive and the two size fields are
//! backpatched when the writer is closed.

use super::config::AudioConfig;
use crate::core::{LoggerError, Result};
use chrono::Local;
use std::fs::{self, File};
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

pub const HEADER_LEN: u64 = 44;

const RIFF_SIZE_OFFSET: u64 = 4;
const DATA_SIZE_OFFSET: u64 = 40;
const PCM_FORMAT: u16 = 1;

/// Largest data chunk whose RIFF size still fits in 32 bits
const MAX_DATA_LEN: u64 = u32::MAX as u64 - (HEADER_LEN - 8);

/// Format fields of the `fmt ` sub-chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavSpec {
    pub channels: u16,
    pub sample_rate: u32,
    pub bits_per_sample: u16,
}

impl WavSpec {
    /// Reject layouts whose block align or byte rate overflow their fields
    pub fn validate(&self) -> Result<()> {
        let block_align = self
            .channels
            .checked_mul(self.bits_per_sample / 8)
            .ok_or_else(|| {
                LoggerError::config(
                    "audio",
                    format!("{} channels overflow the block align field", self.channels),
                )
            })?;
        self.sample_rate
            .checked_mul(u32::from(block_align))
            .ok_or_else(|| {
                LoggerError::config(
                    "audio",
                    format!(
                        "sample_rate {} with {} channels overflows the byte rate field",
                        self.sample_rate, self.channels
                    ),
                )
            })?;
        Ok(())
    }

    /// Saturates for layouts rejected by [`WavSpec::validate`]
    pub fn block_align(&self) -> u16 {
        self.channels.saturating_mul(self.bits_per_sample / 8)
    }

    pub fn byte_rate(&self) -> u32 {
        self.sample_rate.saturating_mul(u32::from(self.block_align()))
    }

    /// Encode the 44-byte header for a data chunk of `data_len` bytes
    pub fn header_bytes(&self, data_len: u32) -> [u8; HEADER_LEN as usize] {
        let riff_len = data_len.saturating_add((HEADER_LEN - 8) as u32);
        let mut header = [0u8; HEADER_LEN as usize];
        header[0..4].copy_from_slice(b"RIFF");
        header[4..8].copy_from_slice(&riff_len.to_le_bytes());
        header[8..12].copy_from_slice(b"WAVE");
        header[12..16].copy_from_slice(b"fmt ");
        header[16..20].copy_from_slice(&16u32.to_le_bytes());
        header[20..22].copy_from_slice(&PCM_FORMAT.to_le_bytes());
        header[22..24].copy_from_slice(&self.channels.to_le_bytes());
        header[24..28].copy_from_slice(&self.sample_rate.to_le_bytes());
        header[28..32].copy_from_slice(&self.byte_rate().to_le_bytes());
        header[32..34].copy_from_slice(&self.block_align().to_le_bytes());
        header[34..36].copy_from_slice(&self.bits_per_sample.to_le_bytes());
        header[36..40].copy_from_slice(b"data");
        header[40..44].copy_from_slice(&data_len.to_le_bytes());
        header
    }
}

impl From<&AudioConfig> for WavSpec {
    fn from(config: &AudioConfig) -> Self {
        Self {
            channels: config.channels,
            sample_rate: config.sample_rate,
            bits_per_sample: config.bits_per_sample,
        }
    }
}

pub struct WavWriter {
    spec: WavSpec,
    path: PathBuf,
    file: Option<File>,
    data_len: u64,
}

impl WavWriter {
    /// Create the writer described by `config`.
    ///
    /// Returns `Ok(None)` when audio logging is disabled.
    pub fn open(config: &AudioConfig) -> Result<Option<Self>> {
        if !config.enabled {
            return Ok(None);
        }
        config.validate()?;

        fs::create_dir_all(&config.output_dir).map_err(|e| {
            LoggerError::io_operation(
                "creating audio output directory",
                config.output_dir.display().to_string(),
                e,
            )
        })?;
        let filename = config.render_filename(&Local::now())?;
        Self::create(config.output_dir.join(filename), WavSpec::from(config)).map(Some)
    }

    /// Create (or truncate) `path` and write a header with zeroed sizes
    pub fn create(path: impl Into<PathBuf>, spec: WavSpec) -> Result<Self> {
        spec.validate()?;
        let path = path.into();
        let mut file = File::create(&path).map_err(|e| {
            LoggerError::io_operation("creating WAV file", path.display().to_string(), e)
        })?;
        file.write_all(&spec.header_bytes(0)).map_err(|e| {
            LoggerError::io_operation("writing WAV header", path.display().to_string(), e)
        })?;

        Ok(Self {
            spec,
            path,
            file: Some(file),
            data_len: 0,
        })
    }

    pub fn spec(&self) -> WavSpec {
        self.spec
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sample bytes written so far
    pub fn data_len(&self) -> u64 {
        self.data_len
    }

    pub fn is_closed(&self) -> bool {
        self.file.is_none()
    }

    /// Append samples as 16-bit little-endian integers
    pub fn write_pcm16(&mut self, samples: &[i16]) -> Result<()> {
        let mut bytes = Vec::with_capacity(samples.len() * 2);
        for sample in samples {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        self.append(&bytes)
    }

    /// Append bytes that are already in the on-disk sample layout
    pub fn write_bytes_pcm16le(&mut self, bytes: &[u8]) -> Result<()> {
        self.append(bytes)
    }

    fn append(&mut self, bytes: &[u8]) -> Result<()> {
        let Some(file) = self.file.as_mut() else {
            return Ok(());
        };
        let new_len = self.data_len + bytes.len() as u64;
        if new_len > MAX_DATA_LEN {
            return Err(LoggerError::other(format!(
                "WAV data chunk for '{}' would exceed {} bytes",
                self.path.display(),
                MAX_DATA_LEN
            )));
        }
        write_counted(file, bytes, &mut self.data_len)?;
        Ok(())
    }

    /// Push written samples to stable storage; the header is left as is
    pub fn flush(&mut self) -> Result<()> {
        if let Some(file) = self.file.as_mut() {
            file.flush()?;
            file.sync_all()?;
        }
        Ok(())
    }

    /// Backpatch both size fields and release the file.
    ///
    /// Closing an already closed writer does nothing.
    pub fn close(&mut self) -> Result<()> {
        let Some(mut file) = self.file.take() else {
            return Ok(());
        };
        // Bounded by MAX_DATA_LEN in append
        let data_len = self.data_len as u32;
        let riff_len = data_len + (HEADER_LEN - 8) as u32;

        let patch = |file: &mut File| -> std::io::Result<()> {
            file.seek(SeekFrom::Start(RIFF_SIZE_OFFSET))?;
            file.write_all(&riff_len.to_le_bytes())?;
            file.seek(SeekFrom::Start(DATA_SIZE_OFFSET))?;
            file.write_all(&data_len.to_le_bytes())?;
            file.seek(SeekFrom::End(0))?;
            file.sync_all()
        };
        patch(&mut file).map_err(|e| {
            LoggerError::io_operation("patching WAV header", self.path.display().to_string(), e)
        })
    }
}

/// `write_all` that adds every byte accepted by `out` to `counter`, so the
/// header matches the file even when a write fails partway through
fn write_counted(out: &mut impl Write, bytes: &[u8], counter: &mut u64) -> std::io::Result<()> {
    let mut rest = bytes;
    while !rest.is_empty() {
        match out.write(rest) {
            Ok(0) => return Err(std::io::ErrorKind::WriteZero.into()),
            Ok(n) => {
                *counter += n as u64;
                rest = &rest[n..];
            }
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => {}
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

impl Drop for WavWriter {
    fn drop(&mut self) {
        let _ = self.close();
    }
}
