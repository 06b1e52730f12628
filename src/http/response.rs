//! Response rendering.
//!
//! Every response carries the same CORS header.  Status replies carry a
//! single token body terminated by a blank line:
//!
//! ```text
//! HTTP/1.1 200 OK\r\n
//! Access-Control-Allow-Origin: *\r\n
//! \r\n
//! OPEN\r\n
//! \r\n
//! ```

use core::fmt;

use crate::app::commands::{Reply, StatusToken};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusCode {
    Ok,
    BadRequest,
    NotFound,
    MethodNotAllowed,
    ServiceUnavailable,
}

impl StatusCode {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok => 200,
            Self::BadRequest => 400,
            Self::NotFound => 404,
            Self::MethodNotAllowed => 405,
            Self::ServiceUnavailable => 503,
        }
    }

    pub fn reason(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::BadRequest => "Bad Request",
            Self::NotFound => "Not Found",
            Self::MethodNotAllowed => "Method Not Allowed",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Response {
    pub status: StatusCode,
    pub body: Option<StatusToken>,
}

impl Response {
    pub const fn new(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn from_reply(reply: Reply) -> Self {
        match reply {
            Reply::Ack => Self::new(StatusCode::Ok),
            Reply::Status(token) => Self {
                status: StatusCode::Ok,
                body: Some(token),
            },
        }
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HTTP/1.1 {} {}\r\n", self.status.code(), self.status.reason())?;
        f.write_str("Access-Control-Allow-Origin: *\r\n\r\n")?;
        if let Some(token) = self.body {
            write!(f, "{}\r\n\r\n", token.as_str())?;
        }
        Ok(())
    }
}
