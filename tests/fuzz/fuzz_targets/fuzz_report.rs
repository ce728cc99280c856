#![no_main]
use libfuzzer_sys::fuzz_target;
use swift_test_codecov::aggregate::{Aggregate, AggregateConfig};

fuzz_target!(|data: &[u8]| {
    // Decoding and aggregating must not panic on any input.
    if let Ok(report) = swift_test_codecov::ingest::parse_report(data) {
        let _ = Aggregate::new(&report, &AggregateConfig::default(), None);
    }
});
