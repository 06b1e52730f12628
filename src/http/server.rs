//! GET-only request front end.
//!
//! Turns raw request text into either a [`ControlCommand`] for the
//! control loop or an immediate error response.  Not-found and
//! method-not-allowed are decided here; the route table only ever
//! answers "match" or "no match".

use log::debug;

use crate::app::commands::{ControlCommand, Reply};
use crate::config::PropConfig;

use super::request::parse_request_line;
use super::response::{Response, StatusCode};
use super::routes::RouteTable;

pub struct HttpGetServer {
    routes: RouteTable,
}

impl HttpGetServer {
    pub fn new(routes: RouteTable) -> Self {
        Self { routes }
    }

    pub fn for_config(config: &PropConfig) -> Self {
        Self::new(RouteTable::for_config(config))
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// Resolve a request to a command, or to the response that ends it.
    pub fn route(&self, raw: &str) -> Result<ControlCommand, Response> {
        let req = parse_request_line(raw).map_err(|e| {
            debug!("HTTP: bad request ({e})");
            Response::new(StatusCode::BadRequest)
        })?;

        if !req.is_get() {
            debug!("HTTP: {} {} not allowed", req.method, req.path);
            return Err(Response::new(StatusCode::MethodNotAllowed));
        }

        self.routes.dispatch(req.path).ok_or_else(|| {
            debug!("HTTP: no route for {}", req.path);
            Response::new(StatusCode::NotFound)
        })
    }

    /// Route and execute in one step.
    pub fn handle(&self, raw: &str, execute: impl FnOnce(ControlCommand) -> Reply) -> Response {
        match self.route(raw) {
            Ok(cmd) => Response::from_reply(execute(cmd)),
            Err(response) => response,
        }
    }
}
