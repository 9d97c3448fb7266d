//! Individual statistical checks over a keystream sample.
//!
//! Each check returns a plain result struct with a [`Severity`] verdict so it
//! can be rendered by the dashboard or asserted on directly.

use crate::report::Severity;
use anyhow::Result;
use kaos::engine::{keystream, CipherParams, Key, Nonce, KEY_SIZE, NONCE_SIZE};
use kaos::stats;
use std::time::Instant;

pub const SIGNIFICANCE: f64 = 0.01;
pub const MAX_LAG: usize = 50;
pub const AVALANCHE_TRIALS: usize = 50;
pub const AVALANCHE_MESSAGE: &[u8] = b"Avalanche test for KAOS Cipher with RAW KEYS";

pub fn severity_runs(result: &stats::RunsResult) -> Severity {
    match result.p_value {
        Some(p) => severity_p_value(p),
        None => Severity::Skip,
    }
}

pub fn severity_p_value(p: f64) -> Severity {
    if p > SIGNIFICANCE {
        Severity::Pass
    } else if p > SIGNIFICANCE / 10.0 {
        Severity::Warn
    } else {
        Severity::Fail
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CusumResult {
    pub max_excursion: i64,
    pub bound: f64,
}

impl CusumResult {
    pub fn severity(&self) -> Severity {
        if (self.max_excursion.unsigned_abs() as f64) < self.bound {
            Severity::Pass
        } else {
            Severity::Fail
        }
    }
}

pub fn cumulative_sums(data: &[u8]) -> CusumResult {
    let n = (data.len() * 8) as f64;
    CusumResult {
        max_excursion: stats::max_cumulative_sum(data),
        bound: 4.0 * n.sqrt(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LongestRunResult {
    pub longest: usize,
    pub expected: f64,
}

impl LongestRunResult {
    pub fn severity(&self) -> Severity {
        if (self.longest as f64 - self.expected).abs() < 5.0 {
            Severity::Pass
        } else {
            Severity::Fail
        }
    }
}

pub fn longest_run(data: &[u8]) -> LongestRunResult {
    LongestRunResult {
        longest: stats::longest_run_of_ones(data),
        expected: ((data.len() * 8) as f64).log2(),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SerialResult {
    pub chi_square: f64,
    pub p_value: f64,
}

impl SerialResult {
    pub fn severity(&self) -> Severity {
        severity_p_value(self.p_value)
    }
}

/// Byte-frequency chi-square against the uniform distribution (255 df).
pub fn serial(data: &[u8]) -> SerialResult {
    let chi_square = stats::chi_square(data);
    SerialResult {
        chi_square,
        p_value: stats::chi_square_p_value(chi_square, 255),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AvalancheResult {
    pub trials: usize,
    /// Mean fraction of keystream bits that changed per flipped key bit
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

impl AvalancheResult {
    pub fn severity(&self) -> Severity {
        let deviation = (self.mean - 0.5).abs();
        if deviation <= 0.05 {
            Severity::Pass
        } else if deviation <= 0.1 {
            Severity::Warn
        } else {
            Severity::Fail
        }
    }
}

/// Flip one key bit per trial and measure how much of the keystream changes.
///
/// Trial `t` flips bit `t / 32` of key byte `t % 32`, so the first 32 trials
/// touch the low bit of every byte.
pub fn avalanche(
    params: &CipherParams,
    trials: usize,
    message_len: usize,
) -> Result<AvalancheResult> {
    let base_key: Key = [0xAA; KEY_SIZE];
    let nonce: Nonce = [0x55; NONCE_SIZE];
    let trials = trials.clamp(1, KEY_SIZE * 8);
    let base = keystream(params, &base_key, &nonce, message_len)?;
    let total_bits = (message_len * 8) as f64;

    let mut fractions = Vec::with_capacity(trials);
    for t in 0..trials {
        let mut key = base_key;
        key[t % KEY_SIZE] ^= 1 << (t / KEY_SIZE);
        let flipped = keystream(params, &key, &nonce, message_len)?;
        fractions.push(stats::bit_difference(&base, &flipped) as f64 / total_bits);
    }

    let mean = fractions.iter().sum::<f64>() / trials as f64;
    let min = fractions.iter().copied().fold(f64::INFINITY, f64::min);
    let max = fractions.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(AvalancheResult {
        trials,
        mean,
        min,
        max,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct ThroughputResult {
    pub bytes: usize,
    pub seconds: f64,
}

impl ThroughputResult {
    pub fn megabytes_per_second(&self) -> f64 {
        if self.seconds <= 0.0 {
            return f64::INFINITY;
        }
        self.bytes as f64 / (1024.0 * 1024.0) / self.seconds
    }

    pub fn grade(&self) -> &'static str {
        match self.megabytes_per_second() {
            t if t > 100.0 => "EXCELLENT",
            t if t > 50.0 => "VERY GOOD",
            t if t > 25.0 => "GOOD",
            _ => "ACCEPTABLE",
        }
    }
}

/// Time keystream generation for `len` bytes, warmup included.
pub fn throughput(
    params: &CipherParams,
    key: &Key,
    nonce: &Nonce,
    len: usize,
) -> Result<ThroughputResult> {
    let start = Instant::now();
    let data = keystream(params, key, nonce, len)?;
    let seconds = start.elapsed().as_secs_f64();
    Ok(ThroughputResult {
        bytes: data.len(),
        seconds,
    })
}

#[derive(Debug, Clone, PartialEq)]
pub struct EntropyResult {
    pub shannon: f64,
    pub min_entropy: f64,
    pub chi_square: f64,
}

impl EntropyResult {
    pub fn severity_shannon(&self) -> Severity {
        match self.shannon {
            h if h > 7.9 => Severity::Pass,
            h if h > 7.5 => Severity::Warn,
            _ => Severity::Fail,
        }
    }

    pub fn severity_min_entropy(&self) -> Severity {
        match self.min_entropy {
            h if h > 7.5 => Severity::Pass,
            h if h > 7.0 => Severity::Warn,
            _ => Severity::Fail,
        }
    }
}

pub fn entropy(data: &[u8]) -> EntropyResult {
    EntropyResult {
        shannon: stats::shannon_entropy(data),
        min_entropy: stats::min_entropy(data),
        chi_square: stats::chi_square(data),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CorrelationResult {
    /// `(lag, correlation)` for every lag analyzed
    pub lags: Vec<(usize, f64)>,
    pub mean_abs: f64,
    pub max_abs: f64,
}

impl CorrelationResult {
    pub fn severity(&self) -> Severity {
        match self.mean_abs {
            c if c < 0.01 => Severity::Pass,
            c if c < 0.03 => Severity::Warn,
            _ => Severity::Fail,
        }
    }
}

pub fn correlation(data: &[u8], max_lag: usize) -> CorrelationResult {
    let lags: Vec<(usize, f64)> = (1..=max_lag)
        .map(|lag| (lag, stats::autocorrelation(data, lag)))
        .collect();
    let count = lags.len().max(1) as f64;
    let mean_abs = lags.iter().map(|(_, c)| c.abs()).sum::<f64>() / count;
    let max_abs = lags.iter().map(|(_, c)| c.abs()).fold(0.0, f64::max);
    CorrelationResult {
        lags,
        mean_abs,
        max_abs,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kaos::KeyMaterial;

    fn sample(len: usize) -> Vec<u8> {
        let material = KeyMaterial::test_vector();
        keystream(&CipherParams::init(), &material.key, &material.nonce, len).unwrap()
    }

    #[test]
    fn test_keystream_passes_core_checks() {
        let data = sample(100_000);
        assert_eq!(cumulative_sums(&data).severity(), Severity::Pass);
        assert_eq!(longest_run(&data).severity(), Severity::Pass);
        assert_ne!(severity_runs(&stats::runs_test(&data)), Severity::Fail);
        assert_eq!(entropy(&data).severity_shannon(), Severity::Pass);
    }

    #[test]
    fn test_constant_stream_fails() {
        let data = vec![0xFFu8; 4096];
        assert_eq!(cumulative_sums(&data).severity(), Severity::Fail);
        assert_eq!(longest_run(&data).severity(), Severity::Fail);
        assert_eq!(serial(&data).severity(), Severity::Fail);
        assert_eq!(severity_runs(&stats::runs_test(&data)), Severity::Skip);
        let e = entropy(&data);
        assert_eq!(e.shannon, 0.0);
        assert_eq!(e.severity_shannon(), Severity::Fail);
        assert_eq!(e.severity_min_entropy(), Severity::Fail);
    }

    #[test]
    fn test_avalanche_near_half() {
        let params = CipherParams::init();
        let result = avalanche(&params, AVALANCHE_TRIALS, AVALANCHE_MESSAGE.len()).unwrap();
        assert_eq!(result.trials, AVALANCHE_TRIALS);
        assert!(result.min <= result.mean && result.mean <= result.max);
        assert!(result.mean > 0.4 && result.mean < 0.6, "mean {}", result.mean);
        assert!(result.min > 0.0);
    }

    #[test]
    fn test_avalanche_trials_clamped() {
        let result = avalanche(&CipherParams::init(), 0, 8).unwrap();
        assert_eq!(result.trials, 1);
    }

    #[test]
    fn test_correlation_lags() {
        let data = sample(20_000);
        let result = correlation(&data, MAX_LAG);
        assert_eq!(result.lags.len(), MAX_LAG);
        assert_eq!(result.lags[0].0, 1);
        assert!(result.max_abs >= result.mean_abs);
        assert_eq!(result.severity(), Severity::Pass);
    }

    #[test]
    fn test_correlated_stream_fails() {
        let data: Vec<u8> = (0..10_000u32).map(|i| (i / 64) as u8).collect();
        assert_eq!(correlation(&data, 5).severity(), Severity::Fail);
    }

    #[test]
    fn test_throughput_grade() {
        let result = ThroughputResult {
            bytes: 200 * 1024 * 1024,
            seconds: 1.0,
        };
        assert_eq!(result.grade(), "EXCELLENT");
        let slow = ThroughputResult {
            bytes: 1024 * 1024,
            seconds: 1.0,
        };
        assert_eq!(slow.grade(), "ACCEPTABLE");
    }

    #[test]
    fn test_p_value_bands() {
        assert_eq!(severity_p_value(0.5), Severity::Pass);
        assert_eq!(severity_p_value(0.005), Severity::Warn);
        assert_eq!(severity_p_value(0.0001), Severity::Fail);
    }
}
