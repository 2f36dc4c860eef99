//! CSV export of decoded samples and masked intervals.
//!
//! Column names follow the layout downstream spreadsheets already expect:
//! `sample_index,time_s,amplitude_12bit,quality_flag` for samples and
//! `start_sample,end_sample,start_s,end_s,duration_s,replacement_value` for
//! intervals.

use crate::error::Result;
use crate::types::{index_to_seconds, MaskedInterval, Sample};
use serde::Serialize;
use std::io::Write;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SampleRow {
    pub sample_index: usize,
    pub time_s: f64,
    pub amplitude_12bit: u16,
    pub quality_flag: u8,
}

impl SampleRow {
    pub fn new(index: usize, sample: Sample, sample_rate: u32) -> Self {
        Self {
            sample_index: index,
            time_s: index_to_seconds(index, sample_rate),
            amplitude_12bit: sample.amplitude(),
            quality_flag: sample.quality(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IntervalRow {
    pub start_sample: usize,
    pub end_sample: usize,
    pub start_s: f64,
    pub end_s: f64,
    pub duration_s: f64,
    pub replacement_value: u16,
}

impl IntervalRow {
    pub fn new(interval: &MaskedInterval, sample_rate: u32) -> Self {
        Self {
            start_sample: interval.start_index,
            end_sample: interval.end_index,
            start_s: interval.start_s(sample_rate),
            end_s: interval.end_s(sample_rate),
            duration_s: interval.duration_s(sample_rate),
            replacement_value: interval.replacement_value,
        }
    }
}

pub fn interval_rows(intervals: &[MaskedInterval], sample_rate: u32) -> Vec<IntervalRow> {
    intervals
        .iter()
        .map(|interval| IntervalRow::new(interval, sample_rate))
        .collect()
}

/// Write one row per sample. The header row is always emitted.
pub fn write_samples<W: Write>(writer: W, samples: &[Sample], sample_rate: u32) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(["sample_index", "time_s", "amplitude_12bit", "quality_flag"])?;
    for (index, &sample) in samples.iter().enumerate() {
        wtr.serialize(SampleRow::new(index, sample, sample_rate))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write one row per masked interval. The header row is always emitted.
pub fn write_intervals<W: Write>(
    writer: W,
    intervals: &[MaskedInterval],
    sample_rate: u32,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record([
        "start_sample",
        "end_sample",
        "start_s",
        "end_s",
        "duration_s",
        "replacement_value",
    ])?;
    for row in interval_rows(intervals, sample_rate) {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_samples_csv(path: &Path, samples: &[Sample], sample_rate: u32) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_samples(std::io::BufWriter::new(file), samples, sample_rate)
}

pub fn write_intervals_csv(
    path: &Path,
    intervals: &[MaskedInterval],
    sample_rate: u32,
) -> Result<()> {
    let file = std::fs::File::create(path)?;
    write_intervals(std::io::BufWriter::new(file), intervals, sample_rate)
}
