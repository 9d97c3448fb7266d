use crate::checks::{self, AVALANCHE_MESSAGE, AVALANCHE_TRIALS, MAX_LAG};
use crate::report::{Dashboard, Section, Severity};
use anyhow::{bail, Context, Result};
use kaos::engine::{keystream, CipherParams};
use kaos::stats;
use kaos::KeyMaterial;
use std::fs;
use std::path::Path;
use tracing::info;

pub const DEFAULT_SIZE: usize = 1_000_000;
pub const DEFAULT_NIST_SIZE: usize = 100_000;

pub struct SuiteOptions {
    /// Keystream bytes to generate
    pub size: usize,
    /// Prefix length fed to the bit-level tests
    pub nist_size: usize,
}

impl Default for SuiteOptions {
    fn default() -> Self {
        Self {
            size: DEFAULT_SIZE,
            nist_size: DEFAULT_NIST_SIZE,
        }
    }
}

/// Generate the fixed test keystream and run every check on it.
pub fn run_suite(options: &SuiteOptions) -> Result<(String, Severity)> {
    if options.size == 0 {
        bail!("Keystream size must be positive");
    }
    let params = CipherParams::init();
    let material = KeyMaterial::test_vector();

    info!(size = options.size, "generating test keystream");
    let throughput =
        checks::throughput(&params, &material.key, &material.nonce, options.size)?;
    let data = keystream(&params, &material.key, &material.nonce, options.size)?;
    let nist = &data[..options.nist_size.clamp(1, data.len())];

    let mut dashboard = Dashboard::new("KAOS Keystream Test Suite");
    dashboard.add_section(nist_section(nist));
    dashboard.add_section(avalanche_section(&params)?);
    dashboard.add_section(
        Section::new("Throughput").metric(
            "Keystream",
            format!("{:.2} MB/s", throughput.megabytes_per_second()),
            format!(
                "{} bytes in {:.3}s incl. {} warmup steps ({})",
                throughput.bytes,
                throughput.seconds,
                params.warmup(),
                throughput.grade()
            ),
            Severity::Pass,
        ),
    );
    dashboard.add_section(entropy_section(&data));
    dashboard.add_section(correlation_section(&data));

    let status = dashboard.status();
    Ok((dashboard.render(), status))
}

/// Run the stream checks on the contents of an arbitrary file.
pub fn analyze_file(path: &Path) -> Result<(String, Severity)> {
    let data = fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if data.is_empty() {
        bail!("File is empty");
    }
    info!(bytes = data.len(), "analyzing {}", path.display());

    let mut dashboard = Dashboard::new(&format!("KAOS Keystream Analysis: {}", path.display()));
    dashboard.add_section(nist_section(&data));
    dashboard.add_section(entropy_section(&data));
    dashboard.add_section(correlation_section(&data));

    let status = dashboard.status();
    Ok((dashboard.render(), status))
}

fn nist_section(data: &[u8]) -> Section {
    let runs = stats::runs_test(data);
    let cusum = checks::cumulative_sums(data);
    let longest = checks::longest_run(data);
    let serial = checks::serial(data);

    let runs_value = match runs.p_value {
        Some(p) => format!("p={:.4}", p),
        None => "n/a".to_string(),
    };
    let runs_detail = match runs.statistic {
        Some(_) => format!("{} runs, expected {:.0}", runs.runs, runs.expected),
        None => format!("ones proportion {:.4} fails pre-test", runs.proportion),
    };

    Section::new(&format!("Bit tests ({} bytes)", data.len()))
        .metric("Runs", runs_value, runs_detail, checks::severity_runs(&runs))
        .metric(
            "Cumulative sums",
            format!("{}", cusum.max_excursion),
            format!("bound {:.0}", cusum.bound),
            cusum.severity(),
        )
        .metric(
            "Longest run of ones",
            format!("{}", longest.longest),
            format!("expected {:.1} ± 5", longest.expected),
            longest.severity(),
        )
        .metric(
            "Serial chi²",
            format!("{:.2}", serial.chi_square),
            format!("p={:.4}, 255 df", serial.p_value),
            serial.severity(),
        )
}

fn avalanche_section(params: &CipherParams) -> Result<Section> {
    let result = checks::avalanche(params, AVALANCHE_TRIALS, AVALANCHE_MESSAGE.len())?;
    Ok(Section::new("Avalanche").metric(
        "Key bit flips",
        format!("{:.2}%", result.mean * 100.0),
        format!(
            "{} trials, range {:.2}%..{:.2}%",
            result.trials,
            result.min * 100.0,
            result.max * 100.0
        ),
        result.severity(),
    ))
}

fn entropy_section(data: &[u8]) -> Section {
    let result = checks::entropy(data);
    let p_value = stats::chi_square_p_value(result.chi_square, 255);
    Section::new("Entropy")
        .metric(
            "Shannon",
            format!("{:.6}", result.shannon),
            "bits/byte",
            result.severity_shannon(),
        )
        .metric(
            "Min-entropy",
            format!("{:.6}", result.min_entropy),
            "bits/byte",
            result.severity_min_entropy(),
        )
        .metric(
            "Chi²",
            format!("{:.2}", result.chi_square),
            format!("p={:.4}", p_value),
            checks::severity_p_value(p_value),
        )
}

fn correlation_section(data: &[u8]) -> Section {
    let result = checks::correlation(data, MAX_LAG);
    Section::new("Autocorrelation").metric(
        &format!("Lags 1-{}", MAX_LAG),
        format!("{:.6}", result.mean_abs),
        format!("mean |r|, max {:.6}", result.max_abs),
        result.severity(),
    )
}
