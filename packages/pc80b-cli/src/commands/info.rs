use crate::cli::InfoArgs;
use crate::exit_codes;
use crate::output;
use crate::scan_params;
use pc80b_rs::mmap_utils::mmap_file;
use pc80b_rs::RecordingInfo;
use serde::Serialize;
use std::path::Path;

#[derive(Serialize)]
struct InfoOutput {
    file: String,
    cli_version: String,
    sample_rate: u32,
    #[serde(flatten)]
    info: RecordingInfo,
}

pub fn execute(args: InfoArgs) -> i32 {
    if let Err(msg) = scan_params::validate_file(&args.file) {
        eprintln!("Error: {}", msg);
        return exit_codes::INPUT_ERROR;
    }

    let sample_rate = args.recording.samplerate;
    let inspected = mmap_file(Path::new(&args.file))
        .and_then(|raw| RecordingInfo::inspect(&raw, args.recording.header_size, sample_rate));
    let info = match inspected {
        Ok(info) => info,
        Err(e) => {
            eprintln!("Error: {}", e);
            return exit_codes::for_error(&e);
        }
    };

    if args.json {
        let result = InfoOutput {
            file: args.file.clone(),
            cli_version: env!("CARGO_PKG_VERSION").to_string(),
            sample_rate,
            info,
        };
        if let Err(e) = output::emit_json(&result, false, None) {
            eprintln!("Error: {}", e);
            return exit_codes::EXECUTION_ERROR;
        }
        return exit_codes::SUCCESS;
    }

    println!("File: {}", args.file);
    println!(
        "Size: {} bytes (header {}, body {})",
        info.total_bytes, info.header_bytes, info.body_bytes
    );
    if info.dropped_trailing_byte {
        println!("Odd trailing byte ignored");
    }
    println!(
        "Samples: {} ({:.2} s @ {} Hz)",
        info.sample_count, info.duration_s, sample_rate
    );
    match (info.amplitude_min, info.amplitude_max) {
        (Some(min), Some(max)) => println!("Amplitude range: {} - {}", min, max),
        _ => println!("Amplitude range: n/a"),
    }
    let flags: Vec<String> = info
        .quality_histogram
        .iter()
        .enumerate()
        .filter(|(_, count)| **count > 0)
        .map(|(flag, count)| format!("{}={}", flag, count))
        .collect();
    if flags.is_empty() {
        println!("Quality flags: none");
    } else {
        println!("Quality flags: {}", flags.join(", "));
    }

    exit_codes::SUCCESS
}
