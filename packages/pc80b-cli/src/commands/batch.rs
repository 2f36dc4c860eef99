use crate::cli::BatchArgs;
use crate::exit_codes;
use crate::output;
use crate::scan_params;
use pc80b_rs::OutputOptions;
use std::path::Path;
use std::time::Instant;

pub fn execute(args: BatchArgs) -> i32 {
    let files = match resolve_files(&args) {
        Ok(f) => f,
        Err(msg) => {
            eprintln!("Error: {}", msg);
            return exit_codes::INPUT_ERROR;
        }
    };

    if files.is_empty() {
        eprintln!("Error: No matching files found");
        return exit_codes::INPUT_ERROR;
    }

    if args.dry_run {
        for f in &files {
            println!("{}", f);
        }
        if !args.quiet {
            eprintln!("Found {} file(s)", files.len());
        }
        return exit_codes::SUCCESS;
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

    if let Some(ref dir) = args.output_dir {
        if let Err(e) = std::fs::create_dir_all(dir) {
            eprintln!("Error: Failed to create output directory '{}': {}", dir, e);
            return exit_codes::EXECUTION_ERROR;
        }
    }

    let options = OutputOptions {
        write_plot: !args.no_plot,
        ..Default::default()
    };

    let total = files.len();
    let mut succeeded = 0usize;
    let mut failed = 0usize;
    let mut masked_regions = 0usize;
    let start_time = Instant::now();

    for (i, file_path) in files.iter().enumerate() {
        if !args.quiet {
            eprintln!("[{}/{}] {}...", i + 1, total, file_path);
        }

        if let Err(msg) = scan_params::validate_file(file_path) {
            eprintln!("  Error: {}", msg);
            failed += 1;
            if !args.continue_on_error {
                break;
            }
            continue;
        }

        let prefix = scan_params::output_prefix(file_path, None, args.output_dir.as_deref());
        let report =
            match scan_params::process_recording(file_path, &params, &config, &prefix, &options) {
                Ok(r) => r,
                Err(e) => {
                    eprintln!("  Error: {}", e);
                    failed += 1;
                    if !args.continue_on_error {
                        break;
                    }
                    continue;
                }
            };

        // One report file per input with --output-dir, JSONL on stdout otherwise
        let written = match args.output_dir {
            Some(_) => {
                let report_path = format!("{}_report.json", prefix);
                output::emit_json(&report, args.compact, Some(Path::new(&report_path)))
            }
            None => output::emit_json(&report, true, None),
        };
        if let Err(e) = written {
            eprintln!("  Error writing report: {}", e);
            failed += 1;
            if !args.continue_on_error {
                break;
            }
            continue;
        }

        if !args.quiet {
            eprintln!(
                "  {} samples, {} masked region(s)",
                report.sample_count,
                report.intervals.len()
            );
        }
        masked_regions += report.intervals.len();
        succeeded += 1;
    }

    let elapsed = start_time.elapsed();

    if !args.quiet {
        eprintln!(
            "Batch complete: {}/{} succeeded, {}/{} failed, {} masked region(s), {:.1}s",
            succeeded,
            total,
            failed,
            total,
            masked_regions,
            elapsed.as_secs_f64()
        );
    }

    if failed == 0 {
        exit_codes::SUCCESS
    } else if succeeded > 0 {
        exit_codes::PARTIAL_FAILURE
    } else {
        exit_codes::EXECUTION_ERROR
    }
}

fn resolve_files(args: &BatchArgs) -> Result<Vec<String>, String> {
    if let Some(ref pattern) = args.glob {
        resolve_glob(pattern)
    } else if let Some(ref files) = args.files {
        Ok(files.clone())
    } else {
        Err("One of --glob or --files must be specified".to_string())
    }
}

fn resolve_glob(pattern: &str) -> Result<Vec<String>, String> {
    let paths = glob::glob(pattern)
        .map_err(|e| format!("Invalid glob pattern '{}': {}", pattern, e))?;

    let mut files: Vec<String> = Vec::new();
    for entry in paths {
        match entry {
            Ok(path) => {
                if path.is_file() {
                    if let Some(s) = path.to_str() {
                        files.push(s.to_string());
                    }
                }
            }
            Err(e) => {
                log::warn!("glob error: {}", e);
            }
        }
    }
    files.sort();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{RecordingArgs, ScanArgs};
    use std::fs;

    fn make_batch_args() -> BatchArgs {
        BatchArgs {
            glob: None,
            files: None,
            recording: RecordingArgs {
                header_size: 512,
                trailer_size: 512,
                samplerate: 150,
            },
            scan: ScanArgs::default(),
            output_dir: None,
            no_plot: false,
            continue_on_error: false,
            dry_run: false,
            compact: false,
            quiet: false,
        }
    }

    #[test]
    fn test_resolve_files_no_input() {
        let args = make_batch_args();
        let result = resolve_files(&args);
        assert!(result.unwrap_err().contains("must be specified"));
    }

    #[test]
    fn test_resolve_files_explicit_list() {
        let mut args = make_batch_args();
        args.files = Some(vec!["/tmp/a.dat".to_string(), "/tmp/b.dat".to_string()]);
        let result = resolve_files(&args).unwrap();
        assert_eq!(result, vec!["/tmp/a.dat", "/tmp/b.dat"]);
    }

    #[test]
    fn test_resolve_glob_no_matches() {
        let result = resolve_glob("/nonexistent_dir_12345/*.dat").unwrap();
        assert!(result.is_empty());
    }

    #[test]
    fn test_resolve_glob_invalid_pattern() {
        assert!(resolve_glob("[").is_err());
    }

    #[test]
    fn test_resolve_glob_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("b.dat"), "").unwrap();
        fs::write(tmp.path().join("a.dat"), "").unwrap();
        fs::write(tmp.path().join("c.csv"), "").unwrap();

        let pattern = format!("{}/*.dat", tmp.path().to_str().unwrap());
        let result = resolve_glob(&pattern).unwrap();
        assert_eq!(result.len(), 2);
        assert!(result[0].ends_with("a.dat"));
        assert!(result[1].ends_with("b.dat"));
    }
}
