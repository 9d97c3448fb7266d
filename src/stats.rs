//! Statistical measures over byte streams.
//!
//! These are the measurements the tooling uses to check the keystream
//! empirically: frequency, entropy, bit-level runs and correlation. Bits are
//! read most-significant first within each byte.

use std::f64::consts::SQRT_2;

/// Count of each byte value
pub fn byte_histogram(data: &[u8]) -> [u64; 256] {
    let mut freq = [0u64; 256];
    for &byte in data {
        freq[byte as usize] += 1;
    }
    freq
}

/// Chi-square statistic of byte frequencies against uniform (df = 255)
pub fn chi_square(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let expected = data.len() as f64 / 256.0;
    byte_histogram(data)
        .iter()
        .map(|&count| {
            let diff = count as f64 - expected;
            diff * diff / expected
        })
        .sum()
}

/// Shannon entropy (bits per byte)
pub fn shannon_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }

    let len = data.len() as f64;
    let mut entropy = 0.0;
    for &count in byte_histogram(data).iter() {
        if count > 0 {
            let p = count as f64 / len;
            entropy -= p * p.log2();
        }
    }
    entropy
}

/// Min-entropy: -log2 of the most frequent byte's probability
pub fn min_entropy(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let max = byte_histogram(data).iter().copied().max().unwrap_or(0);
    -(max as f64 / data.len() as f64).log2()
}

/// Proportion of one bits
pub fn bit_balance(data: &[u8]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let ones: u64 = data.iter().map(|b| u64::from(b.count_ones())).sum();
    ones as f64 / (data.len() * 8) as f64
}

fn bits(data: &[u8]) -> impl Iterator<Item = u8> + '_ {
    data.iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1))
}

/// Result of the frequency-within-runs test
#[derive(Debug, Clone, PartialEq)]
pub struct RunsResult {
    pub runs: u64,
    pub expected: f64,
    pub proportion: f64,
    /// `None` when the ones-proportion pre-test fails and the test does not apply
    pub statistic: Option<f64>,
    pub p_value: Option<f64>,
}

/// NIST runs test over the bit sequence of `data`
pub fn runs_test(data: &[u8]) -> RunsResult {
    let n = (data.len() * 8) as f64;
    let mut runs = 0u64;
    let mut prev = None;
    for bit in bits(data) {
        if prev != Some(bit) {
            runs += 1;
            prev = Some(bit);
        }
    }

    let pi = bit_balance(data);
    let expected = 2.0 * n * pi * (1.0 - pi);
    if data.is_empty() || (pi - 0.5).abs() >= 2.0 / n.sqrt() {
        return RunsResult {
            runs,
            expected,
            proportion: pi,
            statistic: None,
            p_value: None,
        };
    }

    let statistic = (runs as f64 - expected).abs() / (n * 0.25).sqrt();
    RunsResult {
        runs,
        expected,
        proportion: pi,
        statistic: Some(statistic),
        p_value: Some(erfc(statistic / SQRT_2)),
    }
}

/// Largest excursion of the ±1 random walk over the bits
pub fn max_cumulative_sum(data: &[u8]) -> i64 {
    let mut sum = 0i64;
    let mut max = 0i64;
    for bit in bits(data) {
        sum += if bit == 1 { 1 } else { -1 };
        if sum.abs() > max.abs() {
            max = sum;
        }
    }
    max
}

/// Length of the longest run of one bits
pub fn longest_run_of_ones(data: &[u8]) -> usize {
    let mut current = 0usize;
    let mut longest = 0usize;
    for bit in bits(data) {
        if bit == 1 {
            current += 1;
            longest = longest.max(current);
        } else {
            current = 0;
        }
    }
    longest
}

/// Pearson correlation between the stream and itself shifted by `lag`
pub fn autocorrelation(data: &[u8], lag: usize) -> f64 {
    if lag == 0 || lag >= data.len() {
        return 0.0;
    }
    let count = (data.len() - lag) as f64;
    let (mut sum_x, mut sum_y, mut sum_xy, mut sum_x2, mut sum_y2) = (0.0, 0.0, 0.0, 0.0, 0.0);
    for i in 0..data.len() - lag {
        let x = data[i] as f64;
        let y = data[i + lag] as f64;
        sum_x += x;
        sum_y += y;
        sum_xy += x * y;
        sum_x2 += x * x;
        sum_y2 += y * y;
    }

    let numerator = count * sum_xy - sum_x * sum_y;
    let denominator =
        ((count * sum_x2 - sum_x * sum_x) * (count * sum_y2 - sum_y * sum_y)).sqrt();
    if denominator == 0.0 {
        0.0
    } else {
        numerator / denominator
    }
}

/// Hamming distance in bits between equal-length slices
pub fn bit_difference(a: &[u8], b: &[u8]) -> u64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| u64::from((x ^ y).count_ones()))
        .sum()
}

/// Upper-tail p-value of a chi-square statistic with `df` degrees of freedom
pub fn chi_square_p_value(chi_square: f64, df: usize) -> f64 {
    gamma_q(df as f64 / 2.0, chi_square / 2.0)
}

/// Error function approximation (Abramowitz & Stegun 7.1.26)
pub fn erf(x: f64) -> f64 {
    let a1 = 0.254829592;
    let a2 = -0.284496736;
    let a3 = 1.421413741;
    let a4 = -1.453152027;
    let a5 = 1.061405429;
    let p = 0.3275911;

    let sign = if x < 0.0 { -1.0 } else { 1.0 };
    let x = x.abs();
    let t = 1.0 / (1.0 + p * x);
    let y = 1.0 - (((((a5 * t + a4) * t) + a3) * t + a2) * t + a1) * t * (-x * x).exp();
    sign * y
}

pub fn erfc(x: f64) -> f64 {
    1.0 - erf(x)
}

/// Natural log of the gamma function (Lanczos, g = 7)
pub fn ln_gamma(x: f64) -> f64 {
    const COEFFS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // Reflection formula
        let pi = std::f64::consts::PI;
        return (pi / (pi * x).sin()).ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut acc = COEFFS[0];
    for (i, &c) in COEFFS.iter().enumerate().skip(1) {
        acc += c / (x + i as f64);
    }
    let t = x + 7.5;
    0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + acc.ln()
}

/// Regularized upper incomplete gamma function Q(a, x)
pub fn gamma_q(a: f64, x: f64) -> f64 {
    if x <= 0.0 || a <= 0.0 {
        return 1.0;
    }
    if x < a + 1.0 {
        1.0 - gamma_p_series(a, x)
    } else {
        gamma_q_continued_fraction(a, x)
    }
}

const GAMMA_EPS: f64 = 1e-14;
const GAMMA_MAX_ITER: usize = 1000;

fn gamma_p_series(a: f64, x: f64) -> f64 {
    let mut term = 1.0 / a;
    let mut sum = term;
    let mut ap = a;
    for _ in 0..GAMMA_MAX_ITER {
        ap += 1.0;
        term *= x / ap;
        sum += term;
        if term.abs() < sum.abs() * GAMMA_EPS {
            break;
        }
    }
    (sum.ln() - x + a * x.ln() - ln_gamma(a)).exp()
}

fn gamma_q_continued_fraction(a: f64, x: f64) -> f64 {
    let tiny = 1e-300;
    let mut b = x + 1.0 - a;
    let mut c = 1.0 / tiny;
    let mut d = 1.0 / b;
    let mut h = d;
    for i in 1..GAMMA_MAX_ITER {
        let an = -(i as f64) * (i as f64 - a);
        b += 2.0;
        d = an * d + b;
        if d.abs() < tiny {
            d = tiny;
        }
        c = b + an / c;
        if c.abs() < tiny {
            c = tiny;
        }
        d = 1.0 / d;
        let delta = d * c;
        h *= delta;
        if (delta - 1.0).abs() < GAMMA_EPS {
            break;
        }
    }
    (h.ln() - x + a * x.ln() - ln_gamma(a)).exp()
}
