use std::time::Instant;

use peaksignal::{DetectionMode, PeakDetector, PipelineError};

fn synthetic_signal(n: usize) -> Vec<f64> {
    let bumps = [(120.0, 6.0, 45.0), (180.0, 3.0, 25.0), (400.0, 12.0, 60.0), (430.0, 4.0, 30.0)];
    (0..n)
        .map(|i| {
            let x = i as f64;
            let ripple = 2.0 * (x / 7.0).sin();
            bumps.iter().fold(ripple, |acc, (center, sigma, height)| {
                let d = x - center;
                acc + height * (-(d * d) / (2.0 * sigma * sigma)).exp()
            })
        })
        .collect()
}

fn main() -> Result<(), PipelineError> {
    let signal = synthetic_signal(600);

    for mode in [DetectionMode::Threshold, DetectionMode::Wavelet] {
        let detector = PeakDetector::builder().mode(mode).build();
        let start = Instant::now();
        let result = detector.detect(&signal)?;
        println!(
            "{} detection found {} peaks in {} microseconds",
            mode,
            result.len(),
            (Instant::now() - start).as_micros()
        );
        for (island, (w, r)) in result
            .islands
            .iter()
            .zip(result.widths.iter().zip(result.radii.iter()))
        {
            println!("\tIsland {island}: W = {w}, R = {r}");
        }
        for peak in result.iter() {
            println!("\t{}", peak);
        }
    }

    let detector = PeakDetector::default();
    let result = detector.detect_in_range(&signal, 350..500)?;
    println!("Found {} peaks between 350 and 500", result.len());
    for peak in result.iter() {
        println!("\t{}", peak);
    }
    Ok(())
}
