#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 { return; }
    let Ok(s) = std::str::from_utf8(data) else { return };
    if let Ok(doc) = opquery::cli::json_to_document(s) {
        // Parsed preferences are already validated, so formatting must succeed
        if let Ok(pref) = opquery::ReadPreference::from_document(&doc) {
            assert!(pref.to_router_form().is_ok());
        }
    }
});
