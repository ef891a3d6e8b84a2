#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Classification must be total: any byte stream splits into lines that
    // map to an event or a typed protocol violation, never a panic.
    let mut classifier = roast_core::LineClassifier::new();
    for line in data.split(|&b| b == b'\n') {
        let _ = classifier.classify(line);
    }
});
