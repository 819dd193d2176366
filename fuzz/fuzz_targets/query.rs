#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (&str, &str)| {
    let (document, pattern) = data;
    let j = jfetch::parse(document);
    let result = j.q(pattern);
    if !result.is_query_error() {
        let _ = result.q(pattern);
    }
});
