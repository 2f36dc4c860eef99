use crate::error::{Pc80bError, Result};
use serde::{Deserialize, Serialize};

pub const AMPLITUDE_MASK: u16 = 0x0FFF;
pub const QUALITY_MASK: u16 = 0x000F;
pub const QUALITY_SHIFT: u16 = 12;

/// One packed 16-bit unit: lower 12 bits amplitude, upper 4 bits quality flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Sample(u16);

impl Sample {
    pub const fn from_raw(raw: u16) -> Self {
        Self(raw)
    }

    /// Pack an amplitude/quality pair. Out-of-range bits are discarded.
    pub const fn from_parts(amplitude: u16, quality: u8) -> Self {
        Self((amplitude & AMPLITUDE_MASK) | (((quality as u16) & QUALITY_MASK) << QUALITY_SHIFT))
    }

    pub const fn raw(self) -> u16 {
        self.0
    }

    pub const fn amplitude(self) -> u16 {
        self.0 & AMPLITUDE_MASK
    }

    pub const fn quality(self) -> u8 {
        ((self.0 >> QUALITY_SHIFT) & QUALITY_MASK) as u8
    }

    /// Overwrite with a flat amplitude and a cleared quality flag.
    pub fn mask(&mut self, replacement: u16) {
        self.0 = replacement & AMPLITUDE_MASK;
    }
}

impl From<u16> for Sample {
    fn from(raw: u16) -> Self {
        Self(raw)
    }
}

pub type SampleSequence = Vec<Sample>;

/// A contiguous run `[start_index, end_index)` overwritten by the masker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskedInterval {
    pub start_index: usize,
    pub end_index: usize,
    pub replacement_value: u16,
}

impl MaskedInterval {
    pub fn len(&self) -> usize {
        self.end_index - self.start_index
    }

    pub fn is_empty(&self) -> bool {
        self.end_index == self.start_index
    }

    pub fn contains(&self, index: usize) -> bool {
        index >= self.start_index && index < self.end_index
    }

    pub fn start_s(&self, sample_rate: u32) -> f64 {
        index_to_seconds(self.start_index, sample_rate)
    }

    pub fn end_s(&self, sample_rate: u32) -> f64 {
        index_to_seconds(self.end_index, sample_rate)
    }

    pub fn duration_s(&self, sample_rate: u32) -> f64 {
        index_to_seconds(self.len(), sample_rate)
    }
}

pub fn index_to_seconds(index: usize, sample_rate: u32) -> f64 {
    index as f64 / sample_rate as f64
}

/// Recording layout and acquisition rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingParameters {
    pub header_size: usize,
    pub trailer_size: usize,
    pub sample_rate: u32,
}

impl RecordingParameters {
    pub const DEFAULT_HEADER_SIZE: usize = 512;
    pub const DEFAULT_TRAILER_SIZE: usize = 512;
    pub const DEFAULT_SAMPLE_RATE: u32 = 150;

    /// Number of samples overwritten per detected artifact.
    ///
    /// Sizes whose sum overflows, or that cover less than one sample, are a
    /// configuration error.
    pub fn region_len(&self) -> Result<usize> {
        let region_bytes = self
            .header_size
            .checked_add(self.trailer_size)
            .ok_or_else(|| {
                Pc80bError::Configuration(format!(
                    "header size {} plus trailer size {} overflows",
                    self.header_size, self.trailer_size
                ))
            })?;
        match region_bytes / 2 {
            0 => Err(Pc80bError::Configuration(format!(
                "header size {} plus trailer size {} covers no samples",
                self.header_size, self.trailer_size
            ))),
            len => Ok(len),
        }
    }
}

impl Default for RecordingParameters {
    fn default() -> Self {
        Self {
            header_size: Self::DEFAULT_HEADER_SIZE,
            trailer_size: Self::DEFAULT_TRAILER_SIZE,
            sample_rate: Self::DEFAULT_SAMPLE_RATE,
        }
    }
}

/// Decoded sample sequence together with the masked regions found in it
#[derive(Debug, Clone)]
pub struct ScanOutcome {
    pub samples: SampleSequence,
    pub intervals: Vec<MaskedInterval>,
    pub parameters: RecordingParameters,
}

impl ScanOutcome {
    pub fn duration_s(&self) -> f64 {
        index_to_seconds(self.samples.len(), self.parameters.sample_rate)
    }

    pub fn masked_sample_count(&self) -> usize {
        self.intervals.iter().map(MaskedInterval::len).sum()
    }
}
