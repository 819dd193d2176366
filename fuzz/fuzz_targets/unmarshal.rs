#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(j) = jfetch::unmarshal::<jfetch::J>(text) {
            let _ = jfetch::unmarshal::<jfetch::J>(&j.to_string());
        }
    }
});
