pub mod config;
pub mod decoder;
pub mod error;
pub mod export;
pub mod mmap_utils;
pub mod pipeline;
pub mod plot;
pub mod profiling;
pub mod report;
pub mod scanner;
pub mod types;

pub use config::ScanConfig;
pub use decoder::{decode, BodyLayout};
pub use error::{Pc80bError, Result};
pub use pipeline::{process_bytes, process_file, write_outputs, OutputOptions, OutputPaths};
pub use report::{RecordingInfo, ScanReport};
pub use scanner::scan_and_mask;
pub use types::*;
