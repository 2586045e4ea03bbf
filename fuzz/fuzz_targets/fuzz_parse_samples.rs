#![no_main]

use libfuzzer_sys::fuzz_target;

use pfft_cli::parse_samples;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    // Should not panic; lenient parsing keeps a prefix of the strict result.
    let strict = parse_samples(text, false);
    let lenient = parse_samples(text, true);
    if let Ok(strict) = strict {
        assert_eq!(lenient.ok(), Some(strict));
    }
});
