use crate::cli::{RecordingArgs, ScanArgs};
use pc80b_rs::pipeline::{default_output_prefix, process_file, write_outputs, OutputOptions};
use pc80b_rs::{Pc80bError, RecordingParameters, ScanConfig, ScanReport};
use std::path::Path;

/// Validate a single file path: it must exist and be a regular file.
pub fn validate_file(file_path: &str) -> Result<(), String> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("Input file not found: {}", file_path));
    }
    if !path.is_file() {
        return Err(format!("Input path is not a file: {}", file_path));
    }
    Ok(())
}

pub fn recording_parameters(args: &RecordingArgs) -> Result<RecordingParameters, String> {
    if args.samplerate == 0 {
        return Err("Sample rate must be positive".to_string());
    }
    let params = RecordingParameters {
        header_size: args.header_size,
        trailer_size: args.trailer_size,
        sample_rate: args.samplerate,
    };
    params.region_len().map_err(|e| e.to_string())?;
    Ok(params)
}

/// Build the scan configuration: defaults, then --config, then flags.
pub fn resolve_scan_config(args: &ScanArgs) -> Result<ScanConfig, String> {
    let mut config = match &args.config {
        Some(path) => ScanConfig::from_json_file(Path::new(path))
            .map_err(|e| format!("Failed to load config '{}': {}", path, e))?,
        None => ScanConfig::default(),
    };

    if let Some(low) = args.low_ratio {
        config.low_ratio = low;
    }
    if let Some(high) = args.high_ratio {
        config.high_ratio = high;
    }
    if let Some(seconds) = args.baseline_seconds {
        config.baseline_seconds = seconds;
    }
    if args.strict {
        config.strict = true;
    }

    config.validate().map_err(|e| e.to_string())?;
    Ok(config)
}

/// Output prefix for `file`, placed in `output_dir` when one is given.
pub fn output_prefix(file: &str, explicit: Option<&str>, output_dir: Option<&str>) -> String {
    let prefix = explicit
        .map(str::to_string)
        .unwrap_or_else(|| default_output_prefix(Path::new(file)));
    match output_dir {
        Some(dir) => Path::new(dir).join(prefix).to_string_lossy().to_string(),
        None => prefix,
    }
}

/// Decode, mask and export one recording.
pub fn process_recording(
    file: &str,
    params: &RecordingParameters,
    config: &ScanConfig,
    prefix: &str,
    options: &OutputOptions,
) -> Result<ScanReport, Pc80bError> {
    let outcome = process_file(Path::new(file), params, config)?;
    let paths = write_outputs(&outcome, prefix, options)?;
    Ok(ScanReport::new(file.to_string(), &outcome, config.clone()).with_outputs(paths))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recording_args() -> RecordingArgs {
        RecordingArgs {
            header_size: 512,
            trailer_size: 512,
            samplerate: 150,
        }
    }

    #[test]
    fn test_validate_missing_file() {
        let err = validate_file("/nonexistent/rec.dat").unwrap_err();
        assert!(err.contains("not found"));
    }

    #[test]
    fn test_validate_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = validate_file(dir.path().to_str().unwrap()).unwrap_err();
        assert!(err.contains("not a file"));
    }

    #[test]
    fn test_recording_parameters_defaults() {
        let params = recording_parameters(&recording_args()).unwrap();
        assert_eq!(params, RecordingParameters::default());
    }

    #[test]
    fn test_recording_parameters_zero_rate() {
        let mut args = recording_args();
        args.samplerate = 0;
        assert!(recording_parameters(&args).unwrap_err().contains("positive"));
    }

    #[test]
    fn test_recording_parameters_empty_region() {
        let mut args = recording_args();
        args.header_size = 0;
        args.trailer_size = 1;
        assert!(recording_parameters(&args).is_err());
    }

    #[test]
    fn test_recording_parameters_overflowing_sizes() {
        let mut args = recording_args();
        args.header_size = usize::MAX;
        args.trailer_size = 2;
        assert!(recording_parameters(&args).unwrap_err().contains("overflows"));
    }

    #[test]
    fn test_flags_override_config_file() {
        let tmp = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        std::fs::write(tmp.path(), r#"{ "low_ratio": 0.5, "high_ratio": 1.8 }"#).unwrap();

        let args = ScanArgs {
            config: Some(tmp.path().to_str().unwrap().to_string()),
            high_ratio: Some(1.6),
            ..Default::default()
        };
        let config = resolve_scan_config(&args).unwrap();
        assert_eq!(config.low_ratio, 0.5);
        assert_eq!(config.high_ratio, 1.6);
        assert_eq!(config.baseline_seconds, 20);
    }

    #[test]
    fn test_invalid_band_rejected() {
        let args = ScanArgs {
            low_ratio: Some(2.0),
            ..Default::default()
        };
        assert!(resolve_scan_config(&args).is_err());
    }

    #[test]
    fn test_output_prefix() {
        assert_eq!(output_prefix("/data/rec01.dat", None, None), "rec01");
        assert_eq!(output_prefix("/data/rec01.dat", Some("night"), None), "night");
        assert_eq!(
            output_prefix("/data/rec01.dat", None, Some("/out")),
            Path::new("/out").join("rec01").to_string_lossy()
        );
    }
}
