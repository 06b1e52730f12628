//! Fuzz target: `HttpGetServer::handle`
//!
//! Every input must produce exactly one well-formed response, and only a
//! request that routed to a command may reach the executor.
//!
//! cargo fuzz run fuzz_dispatch

#![no_main]

use libfuzzer_sys::fuzz_target;
use propctl::app::commands::Reply;
use propctl::config::PropConfig;
use propctl::http::{HttpGetServer, StatusCode};

fuzz_target!(|data: &[u8]| {
    let server = HttpGetServer::for_config(&PropConfig::sliding_door());
    let text = String::from_utf8_lossy(data);

    let mut executed = false;
    let response = server.handle(&text, |_| {
        executed = true;
        Reply::Ack
    });

    assert_eq!(executed, response.status == StatusCode::Ok);
    let rendered = response.to_string();
    assert!(rendered.starts_with("HTTP/1.1 "));
    assert!(rendered.contains("Access-Control-Allow-Origin: *"));
});
