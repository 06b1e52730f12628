//! Request text → route → controller → rendered response, end to end.

use propctl::app::service::PropController;
use propctl::arbiter::ActuatorPosition;
use propctl::config::PropConfig;
use propctl::http::HttpGetServer;
use propctl::sequencer::StateId;

use crate::mock_hw::{MockHardware, RecordingSink};

const OK_EMPTY: &str = "HTTP/1.1 200 OK\r\nAccess-Control-Allow-Origin: *\r\n\r\n";

struct Rig {
    server: HttpGetServer,
    app: PropController,
    hw: MockHardware,
    sink: RecordingSink,
}

impl Rig {
    fn new(config: &PropConfig) -> Self {
        let mut app = PropController::new(config);
        let mut hw = MockHardware::new();
        let mut sink = RecordingSink::new();
        app.start(&mut hw, &mut sink, 0);
        Self { server: HttpGetServer::for_config(config), app, hw, sink }
    }

    fn get(&mut self, path: &str) -> String {
        self.request(&format!("GET {path} HTTP/1.1\r\nHost: prop\r\n\r\n"))
    }

    fn request(&mut self, raw: &str) -> String {
        let Self { server, app, hw, sink } = self;
        server.handle(raw, |cmd| app.execute(cmd, hw, sink, 0)).to_string()
    }
}

#[test]
fn status_bodies_are_tokens() {
    let mut rig = Rig::new(&PropConfig::override_door());
    assert_eq!(rig.get("/epower/status"), format!("{OK_EMPTY}OPEN\r\n\r\n"));

    rig.hw.levels.emergency_power = true;
    assert_eq!(rig.get("/epower/status"), format!("{OK_EMPTY}CLOSED\r\n\r\n"));
    assert_eq!(rig.get("/tank/status"), format!("{OK_EMPTY}OPEN\r\n\r\n"));
    assert_eq!(rig.get("/start/status"), format!("{OK_EMPTY}CLOSED\r\n\r\n"));
}

#[test]
fn door_commands_drive_the_actuator() {
    let mut rig = Rig::new(&PropConfig::override_door());
    assert_eq!(rig.get("/door/open"), OK_EMPTY);
    assert_eq!(rig.hw.actuator(), Some(ActuatorPosition::Open));
    assert!(!rig.app.arbiter().is_auto());

    assert_eq!(rig.get("/door/close"), OK_EMPTY);
    assert_eq!(rig.hw.actuator(), Some(ActuatorPosition::Closed));

    assert_eq!(rig.get("/door/auto"), OK_EMPTY);
    assert!(rig.app.arbiter().is_auto());
}

#[test]
fn query_string_is_ignored() {
    let mut rig = Rig::new(&PropConfig::override_door());
    assert_eq!(rig.get("/door/open?t=12345"), OK_EMPTY);
    assert_eq!(rig.hw.actuator(), Some(ActuatorPosition::Open));
}

#[test]
fn linac_profile_serves_linac_paths_only() {
    let mut rig = Rig::new(&PropConfig::linear_actuator());
    assert!(rig.get("/door/open").starts_with("HTTP/1.1 404"));
    assert_eq!(rig.get("/linac/open"), OK_EMPTY);
    assert_eq!(rig.hw.actuator(), Some(ActuatorPosition::Open));
}

#[test]
fn game_routes_need_setup_mode() {
    let mut rig = Rig::new(&PropConfig::override_door());
    assert!(rig.get("/game/start").starts_with("HTTP/1.1 404"));

    let mut rig = Rig::new(&PropConfig::sliding_door());
    assert_eq!(rig.app.state(), StateId::Setup);
    assert_eq!(rig.get("/game/start"), OK_EMPTY);
    assert_eq!(rig.app.state(), StateId::WaitForEmergencyPower);
    assert_eq!(rig.get("/game/setup"), OK_EMPTY);
    assert_eq!(rig.app.state(), StateId::Setup);
}

#[test]
fn rejected_requests_never_reach_the_controller() {
    let mut rig = Rig::new(&PropConfig::override_door());
    let before = rig.hw.calls.len();

    assert!(rig.request("POST /door/open HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 405"));
    assert!(rig.request("garbage\r\n\r\n").starts_with("HTTP/1.1 400"));
    assert!(rig.get("/door/open/").starts_with("HTTP/1.1 404"));
    assert!(rig.get("/DOOR/OPEN").starts_with("HTTP/1.1 404"));

    assert_eq!(rig.hw.calls.len(), before);
    assert!(rig.app.arbiter().is_auto());
}

#[test]
fn every_response_allows_any_origin() {
    let mut rig = Rig::new(&PropConfig::sliding_door());
    for path in ["/epower/status", "/door/auto", "/game/setup", "/nope"] {
        assert!(rig.get(path).contains("\r\nAccess-Control-Allow-Origin: *\r\n"), "{path}");
    }
}
