//! Synthesized speech clips.
//!
//! The inference service returns replies with optional synthesized audio.
//! [`AudioClip`] is the engine's in-memory form: mono `f32` samples plus a
//! sample rate. The hosted synthesis backend delivers 16-bit PCM WAV at
//! 24 kHz; [`AudioClip::from_wav_bytes`] decodes that wire form and
//! [`AudioClip::to_wav_bytes`] re-encodes it for sinks that persist or
//! forward WAV.

use std::io::Cursor;

use crate::error::{Result, SessionError};

/// Sample rate of clips produced by the default synthesis backend.
pub const DEFAULT_SAMPLE_RATE: u32 = 24_000;

/// A decoded audio clip ready for playback.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioClip {
    /// Mono samples in `[-1.0, 1.0]`.
    pub samples: Vec<f32>,
    /// Samples per second.
    pub sample_rate: u32,
}

impl AudioClip {
    /// Creates a clip from raw mono samples.
    pub fn new(samples: Vec<f32>, sample_rate: u32) -> Self {
        Self {
            samples,
            sample_rate,
        }
    }

    /// Decodes a WAV byte buffer into mono f32 samples.
    ///
    /// Accepts integer and float sample formats; multi-channel input is mixed
    /// down to mono.
    pub fn from_wav_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = hound::WavReader::new(Cursor::new(bytes))
            .map_err(|e| SessionError::Audio(format!("cannot parse WAV: {e}")))?;
        let spec = reader.spec();

        let samples: Vec<f32> = match spec.sample_format {
            hound::SampleFormat::Int => {
                let max = (1i64 << (spec.bits_per_sample - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| {
                        s.map_err(|e| SessionError::Audio(format!("WAV read error: {e}")))
                            .map(|v| v as f32 / max)
                    })
                    .collect::<Result<Vec<f32>>>()?
            }
            hound::SampleFormat::Float => reader
                .samples::<f32>()
                .map(|s| s.map_err(|e| SessionError::Audio(format!("WAV read error: {e}"))))
                .collect::<Result<Vec<f32>>>()?,
        };

        // Mix to mono if multi-channel.
        let samples = if spec.channels > 1 {
            let ch = spec.channels as usize;
            samples
                .chunks(ch)
                .map(|frame| frame.iter().sum::<f32>() / ch as f32)
                .collect()
        } else {
            samples
        };

        Ok(Self {
            samples,
            sample_rate: spec.sample_rate,
        })
    }

    /// Encodes the clip as 16-bit PCM mono WAV bytes.
    pub fn to_wav_bytes(&self) -> Result<Vec<u8>> {
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: self.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut cursor = Cursor::new(Vec::new());
        {
            let mut writer = hound::WavWriter::new(&mut cursor, spec)
                .map_err(|e| SessionError::Audio(format!("failed to create WAV writer: {e}")))?;
            for &s in &self.samples {
                let clamped = s.clamp(-1.0, 1.0);
                let v = (clamped * i16::MAX as f32).round() as i16;
                writer
                    .write_sample(v)
                    .map_err(|e| SessionError::Audio(format!("failed to write WAV sample: {e}")))?;
            }
            writer
                .finalize()
                .map_err(|e| SessionError::Audio(format!("failed to finalize WAV: {e}")))?;
        }
        Ok(cursor.into_inner())
    }

    /// Clip length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }

    /// Whether the clip contains no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
