#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Base decoder must not panic on any input.
    let _ = swift_test_codecov::ingest::parse_aggregate(data);
});
