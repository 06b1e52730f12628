//! Fixed path → command tables.
//!
//! A deployment's table is the status routes, one actuator family and,
//! for Setup-capable deployments, the game routes.  Lookup is an exact
//! match on the path; the first matching row wins.

use heapless::Vec;

use crate::app::commands::ControlCommand;
use crate::config::{ActuatorRoutes, PropConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Route {
    pub path: &'static str,
    pub command: ControlCommand,
}

const fn route(path: &'static str, command: ControlCommand) -> Route {
    Route { path, command }
}

pub const STATUS_ROUTES: [Route; 3] = [
    route("/epower/status", ControlCommand::EmergencyPowerStatus),
    route("/tank/status", ControlCommand::TankStatus),
    route("/start/status", ControlCommand::StartStatus),
];

pub const DOOR_ROUTES: [Route; 3] = [
    route("/door/open", ControlCommand::ActuatorOpen),
    route("/door/close", ControlCommand::ActuatorClose),
    route("/door/auto", ControlCommand::ActuatorAuto),
];

pub const LINAC_ROUTES: [Route; 3] = [
    route("/linac/open", ControlCommand::ActuatorOpen),
    route("/linac/close", ControlCommand::ActuatorClose),
    route("/linac/auto", ControlCommand::ActuatorAuto),
];

pub const GAME_ROUTES: [Route; 2] = [
    route("/game/start", ControlCommand::GameStart),
    route("/game/setup", ControlCommand::GameSetup),
];

pub const MAX_ROUTES: usize = 16;

/// Rows in the largest table `for_config` can build.
const LARGEST_TABLE: usize = STATUS_ROUTES.len()
    + if DOOR_ROUTES.len() > LINAC_ROUTES.len() {
        DOOR_ROUTES.len()
    } else {
        LINAC_ROUTES.len()
    }
    + GAME_ROUTES.len();

const _: () = assert!(LARGEST_TABLE <= MAX_ROUTES, "route table capacity too small");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    routes: Vec<Route, MAX_ROUTES>,
}

impl RouteTable {
    pub fn for_config(config: &PropConfig) -> Self {
        let actuator: &[Route] = match config.actuator_routes {
            ActuatorRoutes::Door => &DOOR_ROUTES,
            ActuatorRoutes::Linac => &LINAC_ROUTES,
        };
        let game: &[Route] = if config.setup_mode { &GAME_ROUTES } else { &[] };

        let mut routes = Vec::new();
        for r in STATUS_ROUTES.iter().chain(actuator).chain(game) {
            let pushed = routes.push(*r);
            debug_assert!(pushed.is_ok(), "route table overflow");
        }
        Self { routes }
    }

    /// Exact-match lookup.
    pub fn dispatch(&self, path: &str) -> Option<ControlCommand> {
        self.routes.iter().find(|r| r.path == path).map(|r| r.command)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}
