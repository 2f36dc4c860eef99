use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

/// Set to any value to also append timings to the profile log file.
pub const PROFILE_LOG_ENV: &str = "PC80B_PROFILE_LOG";

/// Logs the wall time of a pipeline stage when dropped
pub struct ProfileScope {
    label: String,
    start: Instant,
}

impl ProfileScope {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            start: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }
}

impl Drop for ProfileScope {
    fn drop(&mut self) {
        let duration_ms = self.elapsed_ms();

        log::debug!("[PROFILE] {} - {:.3}ms", self.label, duration_ms);

        if std::env::var_os(PROFILE_LOG_ENV).is_some() {
            if let Err(e) = append_profile_log(&self.label, duration_ms) {
                log::warn!("Failed to write profile log: {}", e);
            }
        }
    }
}

pub fn profile_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pc80b")
        .join("profile.log")
}

fn append_profile_log(label: &str, duration_ms: f64) -> std::io::Result<()> {
    let log_path = profile_log_path();
    if let Some(dir) = log_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_path)?;

    let timestamp = chrono::Utc::now().to_rfc3339();
    writeln!(file, "{} | {} | {:.3}ms", timestamp, label, duration_ms)
}

#[macro_export]
macro_rules! profile_scope {
    ($label:expr) => {
        let _profile_scope = $crate::profiling::ProfileScope::new($label);
    };
}
