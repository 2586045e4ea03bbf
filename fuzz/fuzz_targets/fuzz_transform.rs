#![no_main]

use libfuzzer_sys::fuzz_target;

use pfft_core::reference::reference_transform;
use pfft_core::RunOptions;
use pfft_engine::execute;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    // First byte picks the rank count, the rest become samples, capped at 256.
    let ranks = 2 + usize::from(data[0] % 8);
    let samples: Vec<f64> = data[1..]
        .iter()
        .take(256)
        .map(|&b| f64::from(b) - 128.0)
        .collect();
    let opts = RunOptions {
        ranks,
        pad: true,
        ..Default::default()
    };

    let result = execute(&samples, &opts).unwrap();
    let mut padded = samples;
    padded.resize(result.points, 0.0);
    let expected = reference_transform(&padded).unwrap();
    let scale = padded.iter().map(|x| x.abs()).sum::<f64>().max(1.0);
    assert!(result.spectrum.max_deviation(&expected) / scale < 1e-9);
});
