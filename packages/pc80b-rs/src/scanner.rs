use crate::config::ScanConfig;
use crate::error::{Pc80bError, Result};
use crate::types::{MaskedInterval, RecordingParameters, Sample, AMPLITUDE_MASK};
use rayon::prelude::*;

/// Baseline windows at least this long are reduced in parallel.
const PARALLEL_BASELINE_THRESHOLD: usize = 1 << 16;

/// Amplitude extremes of one baseline window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Baseline {
    pub min_signal: u16,
    pub max_signal: u16,
}

impl Baseline {
    /// Measure a non-empty window. Returns `None` for an empty slice.
    pub fn measure(window: &[Sample]) -> Option<Self> {
        if window.is_empty() {
            return None;
        }

        let (min_signal, max_signal) = if window.len() >= PARALLEL_BASELINE_THRESHOLD {
            window
                .par_iter()
                .map(|s| (s.amplitude(), s.amplitude()))
                .reduce(
                    || (u16::MAX, u16::MIN),
                    |a, b| (a.0.min(b.0), a.1.max(b.1)),
                )
        } else {
            window.iter().fold((u16::MAX, u16::MIN), |(lo, hi), s| {
                (lo.min(s.amplitude()), hi.max(s.amplitude()))
            })
        };

        Some(Self {
            min_signal,
            max_signal,
        })
    }
}

/// Exclusive tolerance band derived from a baseline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ToleranceBand {
    pub low_thresh: f64,
    pub high_thresh: f64,
}

impl ToleranceBand {
    pub fn new(baseline: Baseline, config: &ScanConfig) -> Self {
        Self {
            low_thresh: config.low_ratio * baseline.min_signal as f64,
            high_thresh: config.high_ratio * baseline.max_signal as f64,
        }
    }

    /// Strictly outside the band. Values on either edge are in band.
    pub fn is_outlier(&self, amplitude: u16) -> bool {
        let amplitude = amplitude as f64;
        amplitude < self.low_thresh || amplitude > self.high_thresh
    }

    /// Flat value written over a flagged region, truncated to 12 bits.
    pub fn replacement(&self) -> u16 {
        (self.low_thresh.floor() as u32 & AMPLITUDE_MASK as u32) as u16
    }
}

/// Find artifact bursts and overwrite them in place.
///
/// Repeatedly measures a baseline window starting at the cursor, looks for
/// the first out-of-band sample after it, flattens
/// `(header_size + trailer_size) / 2` samples from there, and resumes at the
/// end of the flattened region. Stops when no full baseline window fits or no
/// outlier remains. Returned intervals are ordered and never overlap.
pub fn scan_and_mask(
    samples: &mut [Sample],
    params: &RecordingParameters,
    config: &ScanConfig,
) -> Result<Vec<MaskedInterval>> {
    if params.sample_rate == 0 {
        return Err(Pc80bError::Configuration(
            "sample rate must be positive".to_string(),
        ));
    }
    config.validate()?;

    let region_len = params.region_len()?;

    let window_len = config.window_len(params.sample_rate)?;
    let total = samples.len();

    if config.strict && window_len >= total {
        return Err(Pc80bError::InsufficientData(format!(
            "{} samples cannot hold a {}-sample baseline window plus one scanned sample",
            total, window_len
        )));
    }

    log::debug!(
        "Scanning {} samples: window={} region={} band=[{}x min, {}x max]",
        total,
        window_len,
        region_len,
        config.low_ratio,
        config.high_ratio
    );

    let mut intervals = Vec::new();
    let mut idx = 0usize;

    while idx + window_len < total {
        let scan_start = idx + window_len;
        let Some(baseline) = Baseline::measure(&samples[idx..scan_start]) else {
            break;
        };
        let band = ToleranceBand::new(baseline, config);

        let Some(offset) = samples[scan_start..]
            .iter()
            .position(|s| band.is_outlier(s.amplitude()))
        else {
            break;
        };

        let start_index = scan_start + offset;
        let end_index = (start_index + region_len).min(total);
        let replacement_value = band.replacement();

        for sample in &mut samples[start_index..end_index] {
            sample.mask(replacement_value);
        }

        log::debug!(
            "Masked [{}, {}) with {} (baseline min={}, max={})",
            start_index,
            end_index,
            replacement_value,
            baseline.min_signal,
            baseline.max_signal
        );

        intervals.push(MaskedInterval {
            start_index,
            end_index,
            replacement_value,
        });
        idx = end_index;
    }

    log::info!("Found {} non-waveform region(s)", intervals.len());

    Ok(intervals)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flat(len: usize, amplitude: u16) -> Vec<Sample> {
        vec![Sample::from_parts(amplitude, 0); len]
    }

    /// 20-sample baseline windows at 1 Hz keep the fixtures small.
    fn slow_params(header_size: usize, trailer_size: usize) -> RecordingParameters {
        RecordingParameters {
            header_size,
            trailer_size,
            sample_rate: 1,
        }
    }

    fn assert_invariants(samples: &[Sample], intervals: &[MaskedInterval]) {
        for pair in intervals.windows(2) {
            assert!(pair[0].end_index <= pair[1].start_index);
            assert!(pair[0].start_index < pair[1].start_index);
        }
        for interval in intervals {
            assert!(interval.start_index < interval.end_index);
            for sample in &samples[interval.start_index..interval.end_index] {
                assert_eq!(sample.quality(), 0);
                assert_eq!(sample.amplitude(), interval.replacement_value);
            }
        }
    }

    #[test]
    fn test_single_spike_scenario() {
        let params = RecordingParameters {
            header_size: 512,
            trailer_size: 512,
            sample_rate: 150,
        };
        let region_len = params.region_len().unwrap();

        let mut samples = flat(3000, 1000);
        samples.push(Sample::from_parts(4095, 9));
        for i in 0..region_len {
            let amplitude = if i % 2 == 0 { 900 } else { 1200 };
            samples.push(Sample::from_parts(amplitude, (i % 16) as u8));
        }
        samples.extend(flat(3000, 1000));

        let config = ScanConfig::default();
        let intervals = scan_and_mask(&mut samples, &params, &config).unwrap();
        assert_eq!(
            intervals,
            vec![MaskedInterval {
                start_index: 3000,
                end_index: 3000 + region_len,
                replacement_value: 700,
            }]
        );
        assert_invariants(&samples, &intervals);

        let rescan = scan_and_mask(&mut samples, &params, &config).unwrap();
        assert!(rescan.is_empty());
    }

    #[test]
    fn test_in_band_signal_is_untouched() {
        let mut samples: Vec<Sample> = (0..200)
            .map(|i| Sample::from_parts(1000 + (i % 50) as u16, (i % 16) as u8))
            .collect();
        let original = samples.clone();

        let intervals =
            scan_and_mask(&mut samples, &slow_params(4, 4), &ScanConfig::default()).unwrap();
        assert!(intervals.is_empty());
        assert_eq!(samples, original);
    }

    #[test]
    fn test_short_buffer_is_untouched() {
        let mut samples = flat(20, 1000);
        samples[5] = Sample::from_parts(4000, 3);
        let original = samples.clone();

        let intervals =
            scan_and_mask(&mut samples, &slow_params(4, 4), &ScanConfig::default()).unwrap();
        assert!(intervals.is_empty());
        assert_eq!(samples, original);
    }

    #[test]
    fn test_short_buffer_strict() {
        let mut samples = flat(20, 1000);
        let config = ScanConfig {
            strict: true,
            ..Default::default()
        };
        let result = scan_and_mask(&mut samples, &slow_params(4, 4), &config);
        assert!(matches!(result, Err(Pc80bError::InsufficientData(_))));
    }

    #[test]
    fn test_baseline_window_is_exempt() {
        let mut samples = flat(30, 1000);
        samples[3] = Sample::from_parts(4000, 0);

        let intervals =
            scan_and_mask(&mut samples, &slow_params(4, 4), &ScanConfig::default()).unwrap();
        assert!(intervals.is_empty());
    }

    #[test]
    fn test_threshold_edges_are_inclusive() {
        let params = slow_params(4, 4);
        let config = ScanConfig::default();

        for edge in [700u16, 1300] {
            let mut samples = flat(30, 1000);
            samples[25] = Sample::from_parts(edge, 0);
            let intervals = scan_and_mask(&mut samples, &params, &config).unwrap();
            assert!(intervals.is_empty(), "{} should be in band", edge);
        }

        for beyond in [699u16, 1301] {
            let mut samples = flat(30, 1000);
            samples[25] = Sample::from_parts(beyond, 0);
            let intervals = scan_and_mask(&mut samples, &params, &config).unwrap();
            assert_eq!(intervals.len(), 1, "{} should be flagged", beyond);
            assert_eq!(intervals[0].start_index, 25);
        }
    }

    #[test]
    fn test_region_clipped_at_end() {
        let mut samples = flat(23, 1000);
        samples[21] = Sample::from_parts(2, 5);

        let intervals =
            scan_and_mask(&mut samples, &slow_params(6, 4), &ScanConfig::default()).unwrap();
        assert_eq!(
            intervals,
            vec![MaskedInterval {
                start_index: 21,
                end_index: 23,
                replacement_value: 700,
            }]
        );
        assert_invariants(&samples, &intervals);
    }

    #[test]
    fn test_zero_minimum_only_high_threshold_fires() {
        let mut samples = flat(40, 500);
        samples[0] = Sample::from_parts(0, 0);
        samples[30] = Sample::from_parts(0, 7);

        let intervals =
            scan_and_mask(&mut samples, &slow_params(2, 2), &ScanConfig::default()).unwrap();
        assert!(intervals.is_empty());

        samples[31] = Sample::from_parts(651, 0);
        let intervals =
            scan_and_mask(&mut samples, &slow_params(2, 2), &ScanConfig::default()).unwrap();
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_index, 31);
        assert_eq!(intervals[0].replacement_value, 0);
    }

    #[test]
    fn test_repeated_bursts_are_ordered() {
        let mut samples = flat(200, 1000);
        for &spike in &[25usize, 26, 60, 61, 62, 150] {
            samples[spike] = Sample::from_parts(3500, 12);
        }

        let intervals =
            scan_and_mask(&mut samples, &slow_params(4, 2), &ScanConfig::default()).unwrap();
        let starts: Vec<usize> = intervals.iter().map(|i| i.start_index).collect();
        assert_eq!(starts, vec![25, 60, 150]);
        assert!(intervals.iter().all(|i| i.len() == 3));
        assert_invariants(&samples, &intervals);
    }

    #[test]
    fn test_baseline_is_recomputed_after_mask() {
        // After the first region the level drops to 500; a fresh baseline
        // keeps 400 in band even though it is below 0.7 x 1000.
        let mut samples = flat(20, 1000);
        samples.push(Sample::from_parts(3000, 0));
        samples.extend(flat(2, 1000));
        samples.extend(flat(30, 500));
        samples.push(Sample::from_parts(400, 0));

        let intervals =
            scan_and_mask(&mut samples, &slow_params(4, 2), &ScanConfig::default()).unwrap();
        assert_eq!(intervals.len(), 1);
        assert_eq!(intervals[0].start_index, 20);
    }

    #[test]
    fn test_replacement_truncated_to_12_bits() {
        let config = ScanConfig {
            low_ratio: 2.0,
            high_ratio: 3.0,
            ..Default::default()
        };
        let band = ToleranceBand::new(
            Baseline {
                min_signal: 3000,
                max_signal: 3000,
            },
            &config,
        );
        assert_eq!(band.replacement(), 6000 & 0x0FFF);
    }

    #[test]
    fn test_rejects_zero_sample_rate() {
        let mut samples = flat(10, 1000);
        let params = RecordingParameters {
            sample_rate: 0,
            ..Default::default()
        };
        let err = scan_and_mask(&mut samples, &params, &ScanConfig::default()).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_rejects_empty_region() {
        let mut samples = flat(10, 1000);
        let err =
            scan_and_mask(&mut samples, &slow_params(1, 0), &ScanConfig::default()).unwrap_err();
        assert!(err.to_string().contains("covers no samples"));
    }

    #[test]
    fn test_rejects_overflowing_region() {
        let mut samples = flat(10, 1000);
        let original = samples.clone();
        let params = RecordingParameters {
            header_size: usize::MAX,
            trailer_size: 2,
            sample_rate: 150,
        };
        let err = scan_and_mask(&mut samples, &params, &ScanConfig::default()).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(samples, original);
    }

    #[test]
    fn test_parallel_baseline_matches_sequential() {
        let window: Vec<Sample> = (0..PARALLEL_BASELINE_THRESHOLD + 17)
            .map(|i| Sample::from_parts((i * 7 % 3000 + 100) as u16, (i % 16) as u8))
            .collect();
        let baseline = Baseline::measure(&window).unwrap();
        assert_eq!(baseline.min_signal, 100);
        assert_eq!(baseline.max_signal, 3099);
        assert!(Baseline::measure(&[]).is_none());
    }
}
