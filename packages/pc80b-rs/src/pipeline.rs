use crate::config::ScanConfig;
use crate::decoder::{body_layout, decode, BodyLayout};
use crate::error::{Pc80bError, Result};
use crate::export::{write_intervals_csv, write_samples_csv};
use crate::mmap_utils::mmap_file;
use crate::plot::{save_waveform_png, PlotStyle};
use crate::profile_scope;
use crate::scanner::scan_and_mask;
use crate::types::{RecordingParameters, SampleSequence, ScanOutcome};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Files produced for one recording
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputPaths {
    pub parsed_csv: PathBuf,
    /// Only written when at least one region was masked
    pub intervals_csv: Option<PathBuf>,
    pub waveform_png: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct OutputOptions {
    pub write_plot: bool,
    pub plot_style: PlotStyle,
}

impl Default for OutputOptions {
    fn default() -> Self {
        Self {
            write_plot: true,
            plot_style: PlotStyle::default(),
        }
    }
}

/// Check that the recording parameters fit a buffer of `total_bytes`.
pub fn validate_layout(total_bytes: usize, params: &RecordingParameters) -> Result<BodyLayout> {
    if params.sample_rate == 0 {
        return Err(Pc80bError::Configuration(
            "sample rate must be positive".to_string(),
        ));
    }
    let layout = body_layout(total_bytes, params.header_size)?;
    let after_header = total_bytes - params.header_size;
    if params.trailer_size > after_header {
        return Err(Pc80bError::Configuration(format!(
            "trailer size {} exceeds the {} bytes after the header",
            params.trailer_size, after_header
        )));
    }
    Ok(layout)
}

/// Validate parameters against `raw` and decode it.
pub fn decode_checked(
    raw: &[u8],
    params: &RecordingParameters,
    config: &ScanConfig,
) -> Result<SampleSequence> {
    let layout = validate_layout(raw.len(), params)?;
    config.validate()?;

    if config.strict && layout.body_bytes < 2 {
        return Err(Pc80bError::InsufficientData(format!(
            "{} byte(s) left after a {}-byte header",
            raw.len() - params.header_size,
            params.header_size
        )));
    }

    profile_scope!("decode");
    decode(raw, params.header_size)
}

fn mask(
    mut samples: SampleSequence,
    params: &RecordingParameters,
    config: &ScanConfig,
) -> Result<ScanOutcome> {
    let intervals = {
        profile_scope!("scan_and_mask");
        scan_and_mask(&mut samples, params, config)?
    };

    Ok(ScanOutcome {
        samples,
        intervals,
        parameters: *params,
    })
}

/// Decode `raw` and mask every artifact region in it.
pub fn process_bytes(
    raw: &[u8],
    params: &RecordingParameters,
    config: &ScanConfig,
) -> Result<ScanOutcome> {
    let samples = decode_checked(raw, params, config)?;
    mask(samples, params, config)
}

/// Map `path`, decode it, release the mapping, then scan.
pub fn process_file(
    path: &Path,
    params: &RecordingParameters,
    config: &ScanConfig,
) -> Result<ScanOutcome> {
    let samples = {
        let raw = mmap_file(path)?;
        log::info!("Loaded {}, size={} bytes", path.display(), raw.len());
        decode_checked(&raw, params, config)?
    };
    mask(samples, params, config)
}

/// Output prefix used when none is given: the input file stem.
pub fn default_output_prefix(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("output")
        .to_string()
}

/// Write `<prefix>_parsed.csv`, `<prefix>_intervals.csv` and
/// `<prefix>_waveform.png`.
pub fn write_outputs(
    outcome: &ScanOutcome,
    prefix: &str,
    options: &OutputOptions,
) -> Result<OutputPaths> {
    let sample_rate = outcome.parameters.sample_rate;

    let parsed_csv = PathBuf::from(format!("{}_parsed.csv", prefix));
    {
        profile_scope!("export_samples");
        write_samples_csv(&parsed_csv, &outcome.samples, sample_rate)?;
    }
    log::info!("Saved parsed CSV: {}", parsed_csv.display());

    let intervals_csv = if outcome.intervals.is_empty() {
        log::info!("No non-waveform regions detected.");
        None
    } else {
        let path = PathBuf::from(format!("{}_intervals.csv", prefix));
        write_intervals_csv(&path, &outcome.intervals, sample_rate)?;
        log::info!("Saved intervals CSV: {}", path.display());
        Some(path)
    };

    let waveform_png = if options.write_plot {
        let path = PathBuf::from(format!("{}_waveform.png", prefix));
        profile_scope!("render_plot");
        save_waveform_png(&path, &outcome.samples, &outcome.intervals, &options.plot_style)?;
        log::info!("Saved waveform PNG: {}", path.display());
        Some(path)
    } else {
        None
    };

    Ok(OutputPaths {
        parsed_csv,
        intervals_csv,
        waveform_png,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::decoder::encode;
    use crate::types::Sample;

    fn params(header_size: usize, trailer_size: usize) -> RecordingParameters {
        RecordingParameters {
            header_size,
            trailer_size,
            sample_rate: 1,
        }
    }

    fn recording(header: usize, samples: &[Sample]) -> Vec<u8> {
        let mut raw = vec![0xAB; header];
        raw.extend(encode(samples));
        raw
    }

    #[test]
    fn test_process_bytes_masks_spike() {
        let mut samples = vec![Sample::from_parts(1000, 2); 40];
        samples[30] = Sample::from_parts(4000, 2);
        let raw = recording(4, &samples);

        let outcome = process_bytes(&raw, &params(4, 4), &ScanConfig::default()).unwrap();
        assert_eq!(outcome.samples.len(), 40);
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.intervals[0].start_index, 30);
        assert_eq!(outcome.intervals[0].end_index, 34);
        assert_eq!(outcome.masked_sample_count(), 4);
        assert_eq!(outcome.duration_s(), 40.0);
    }

    #[test]
    fn test_trailer_past_body() {
        let raw = vec![0u8; 10];
        let err = process_bytes(&raw, &params(4, 8), &ScanConfig::default()).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("trailer size"));
    }

    #[test]
    fn test_strict_rejects_empty_body() {
        let raw = vec![0u8; 5];
        let config = ScanConfig {
            strict: true,
            ..Default::default()
        };
        let result = process_bytes(&raw, &params(4, 1), &config);
        assert!(matches!(result, Err(Pc80bError::InsufficientData(_))));

        let lenient = process_bytes(&raw, &params(4, 1), &ScanConfig::default()).unwrap();
        assert!(lenient.samples.is_empty());
    }

    #[test]
    fn test_write_outputs_skips_empty_intervals() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = dir.path().join("quiet").to_string_lossy().to_string();
        let outcome = ScanOutcome {
            samples: vec![Sample::from_parts(1000, 0); 10],
            intervals: vec![],
            parameters: params(4, 4),
        };

        let options = OutputOptions {
            write_plot: false,
            ..Default::default()
        };
        let paths = write_outputs(&outcome, &prefix, &options).unwrap();
        assert!(paths.parsed_csv.exists());
        assert!(paths.intervals_csv.is_none());
        assert!(paths.waveform_png.is_none());
        assert!(!dir.path().join("quiet_intervals.csv").exists());
    }

    #[test]
    fn test_default_output_prefix() {
        assert_eq!(default_output_prefix(Path::new("/data/rec01.dat")), "rec01");
    }
}
