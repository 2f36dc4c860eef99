use crate::cli::RunArgs;
use crate::exit_codes;
use crate::output;
use crate::scan_params;
use pc80b_rs::OutputOptions;
use std::path::Path;

pub fn execute(args: RunArgs) -> i32 {
    if let Err(msg) = scan_params::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let params = match scan_params::recording_parameters(&args.recording) {
        Ok(p) => p,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let config = match scan_params::resolve_scan_config(&args.scan) {
        Ok(c) => c,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    let prefix = scan_params::output_prefix(&args.file, args.output_prefix.as_deref(), None);
    let options = OutputOptions {
        write_plot: !args.no_plot,
        ..Default::default()
    };

    if !args.quiet {
        let size = std::fs::metadata(&args.file).map(|m| m.len()).unwrap_or(0);
        eprintln!("Loaded {}, size={} bytes", args.file, size);
        eprintln!(
            "  Layout: header={} trailer={} bytes, {} Hz",
            params.header_size, params.trailer_size, params.sample_rate
        );
    }

    let report =
        match scan_params::process_recording(&args.file, &params, &config, &prefix, &options) {
            Ok(r) => r,
            Err(e) => {
                eprintln!("Error: {}", e);
                return exit_codes::for_error(&e);
            }
        };

    if !args.quiet {
        if let Some(ref outputs) = report.outputs {
            eprintln!("Saved parsed CSV: {}", outputs.parsed_csv.display());
            match outputs.intervals_csv {
                Some(ref path) => eprintln!("Saved intervals CSV: {}", path.display()),
                None => eprintln!("No non-waveform regions detected."),
            }
            if let Some(ref path) = outputs.waveform_png {
                eprintln!("Saved waveform PNG: {}", path.display());
            }
        }
    }

    let destination = args.output.as_deref().map(Path::new);
    if let Err(e) = output::emit_json(&report, args.compact, destination) {
        eprintln!("Error: {}", e);
        return exit_codes::EXECUTION_ERROR;
    }

    if !args.quiet {
        if let Some(ref path) = args.output {
            eprintln!("Report written to {}", path);
        }
    }

    exit_codes::SUCCESS
}
