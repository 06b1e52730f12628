//! Minimal HTTP/1.x GET control protocol.
//!
//! ```text
//!  raw text ──▶ request::parse_request_line ──▶ routes::RouteTable::dispatch
//!                                                    │
//!                         None ──▶ 404 / 405 / 400   │ Some(ControlCommand)
//!                                                    ▼
//!                                 PropController::execute ──▶ Response
//! ```

pub mod request;
pub mod response;
pub mod routes;
pub mod server;

pub use request::{RequestLine, parse_request_line};
pub use response::{Response, StatusCode};
pub use routes::{Route, RouteTable};
pub use server::HttpGetServer;
