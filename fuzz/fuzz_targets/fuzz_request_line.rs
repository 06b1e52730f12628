//! Fuzz target: `parse_request_line`
//!
//! Feeds arbitrary bytes (lossily decoded, as the I/O task does) into the
//! request-line parser and checks that anything it accepts is well formed.
//!
//! cargo fuzz run fuzz_request_line

#![no_main]

use libfuzzer_sys::fuzz_target;
use propctl::http::parse_request_line;
use propctl::http::request::MAX_TARGET_LEN;

fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    if let Ok(req) = parse_request_line(&text) {
        assert!(req.path.starts_with('/'), "accepted path must be absolute");
        assert!(req.path.len() <= MAX_TARGET_LEN);
        assert!(!req.method.is_empty());
        assert!(!req.path.contains('?'), "query must be split off");
    }
});
