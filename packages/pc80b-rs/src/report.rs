use crate::config::ScanConfig;
use crate::decoder::{body_layout, decode};
use crate::error::{Pc80bError, Result};
use crate::export::{interval_rows, IntervalRow};
use crate::pipeline::OutputPaths;
use crate::types::{index_to_seconds, RecordingParameters, ScanOutcome};
use serde::Serialize;

/// Machine-readable summary of one processed recording
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub id: String,
    pub file_path: String,
    pub parameters: RecordingParameters,
    pub scan_config: ScanConfig,
    pub sample_count: usize,
    pub duration_s: f64,
    pub masked_sample_count: usize,
    pub intervals: Vec<IntervalRow>,
    pub outputs: Option<OutputPaths>,
    pub created_at: String,
}

impl ScanReport {
    pub fn new(file_path: String, outcome: &ScanOutcome, scan_config: ScanConfig) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            file_path,
            parameters: outcome.parameters,
            scan_config,
            sample_count: outcome.samples.len(),
            duration_s: outcome.duration_s(),
            masked_sample_count: outcome.masked_sample_count(),
            intervals: interval_rows(&outcome.intervals, outcome.parameters.sample_rate),
            outputs: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    pub fn with_outputs(mut self, outputs: OutputPaths) -> Self {
        self.outputs = Some(outputs);
        self
    }
}

/// Decoded statistics of a recording, without scanning it
#[derive(Debug, Clone, Serialize)]
pub struct RecordingInfo {
    pub total_bytes: usize,
    pub header_bytes: usize,
    pub body_bytes: usize,
    pub dropped_trailing_byte: bool,
    pub sample_count: usize,
    pub duration_s: f64,
    pub amplitude_min: Option<u16>,
    pub amplitude_max: Option<u16>,
    /// Count of samples per quality flag value 0..=15
    pub quality_histogram: [usize; 16],
}

impl RecordingInfo {
    pub fn inspect(raw: &[u8], header_size: usize, sample_rate: u32) -> Result<Self> {
        if sample_rate == 0 {
            return Err(Pc80bError::Configuration(
                "sample rate must be positive".to_string(),
            ));
        }
        let layout = body_layout(raw.len(), header_size)?;
        let samples = decode(raw, header_size)?;

        let mut quality_histogram = [0usize; 16];
        for sample in &samples {
            quality_histogram[sample.quality() as usize] += 1;
        }

        Ok(Self {
            total_bytes: layout.total_bytes,
            header_bytes: layout.header_bytes,
            body_bytes: layout.body_bytes,
            dropped_trailing_byte: layout.dropped_trailing_byte,
            sample_count: samples.len(),
            duration_s: index_to_seconds(samples.len(), sample_rate),
            amplitude_min: samples.iter().map(|s| s.amplitude()).min(),
            amplitude_max: samples.iter().map(|s| s.amplitude()).max(),
            quality_histogram,
        })
    }
}
