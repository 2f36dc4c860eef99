use crate::cli::ValidateArgs;
use crate::exit_codes;
use crate::output;
use crate::scan_params;
use pc80b_rs::pipeline::validate_layout;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct ValidateOutput {
    file: String,
    exists: bool,
    readable: bool,
    size_bytes: Option<u64>,
    sample_count: Option<usize>,
    baseline_window: Option<usize>,
    /// At least one sample follows the first baseline window
    baseline_fits: bool,
    error: Option<String>,
}

pub fn execute(args: ValidateArgs) -> i32 {
    let path = Path::new(&args.file);

    let exists = path.exists();
    let readable = path.is_file() && std::fs::File::open(path).is_ok();
    let size_bytes = if readable {
        std::fs::metadata(path).ok().map(|m| m.len())
    } else {
        None
    };

    let (sample_count, baseline_window, error) = if !exists {
        (None, None, Some(format!("Input file not found: {}", args.file)))
    } else if !readable {
        (None, None, Some(format!("File is not readable: {}", args.file)))
    } else {
        match check_parameters(&args, size_bytes.unwrap_or(0) as usize) {
            Ok((samples, window)) => (Some(samples), Some(window), None),
            Err(msg) => (None, None, Some(msg)),
        }
    };

    let baseline_fits = match (sample_count, baseline_window) {
        (Some(samples), Some(window)) => window < samples,
        _ => false,
    };

    let result = ValidateOutput {
        file: args.file.clone(),
        exists,
        readable,
        size_bytes,
        sample_count,
        baseline_window,
        baseline_fits,
        error: error.clone(),
    };

    if args.json {
        if let Err(e) = output::emit_json(&result, false, None) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
    } else if let Some(ref err) = error {
        eprintln!("Error: {}", err);
    } else {
        println!(
            "File '{}' is valid ({} bytes, {} samples)",
            args.file,
            size_bytes.unwrap_or(0),
            sample_count.unwrap_or(0)
        );
        if !baseline_fits {
            println!(
                "Warning: recording is shorter than one baseline window; nothing will be masked"
            );
        }
    }

    if error.is_some() {
        exit_codes::INPUT_ERROR
    } else {
        exit_codes::SUCCESS
    }
}

/// Returns (sample count, baseline window length) when the parameters fit.
fn check_parameters(args: &ValidateArgs, total_bytes: usize) -> Result<(usize, usize), String> {
    let params = scan_params::recording_parameters(&args.recording)?;
    let config = scan_params::resolve_scan_config(&args.scan)?;
    let layout = validate_layout(total_bytes, &params).map_err(|e| e.to_string())?;
    let window = config
        .window_len(params.sample_rate)
        .map_err(|e| e.to_string())?;
    Ok((layout.sample_count(), window))
}
