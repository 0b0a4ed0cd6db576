//! Synthetic signals shared by the unit tests

/// `baseline + amplitude * exp(-(i - center)^2 / (2 sigma^2))` sampled at `0..n`
pub fn gaussian_signal(n: usize, center: f64, sigma: f64, amplitude: f64, baseline: f64) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let d = i as f64 - center;
            baseline + amplitude * (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect()
}

/// Two well separated bumps of different heights centered at 99.5 and 299.5 over
/// 400 samples. The wavelet response of each has its apex at 100 and 300.
pub fn two_bump_signal() -> Vec<f64> {
    gaussian_signal(400, 99.5, 5.0, 50.0, 0.0)
        .into_iter()
        .zip(gaussian_signal(400, 299.5, 5.0, 30.0, 0.0))
        .map(|(a, b)| a + b)
        .collect()
}

pub const SCENARIO_A: [f64; 9] = [0.0, 0.0, 12.0, 12.0, 11.0, 0.0, 0.0, 20.0, 0.0];

/// A noisy-looking but fully deterministic signal with many islands and plateaus
pub fn sawtooth_islands(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| {
            let phase = (i * 37 % 101) as f64;
            let envelope = ((i as f64) / 15.0).sin().abs() * 40.0;
            (envelope + (phase / 10.0).floor()).round()
        })
        .collect()
}
