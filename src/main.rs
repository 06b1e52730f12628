//! Prop controller firmware — main entry point.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter    LogEventSink   JsonConfigSource  Clock     │
//! │  (Signal+Output)    (EventSink)    (ConfigPort)                │
//! │  WiFi station       HTTP I/O task (own thread)                 │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            PropController (pure logic)                 │    │
//! │  │            Sequencer · Arbiter                         │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! │                                                                │
//! │  Control loop: tick → drain commands → status → watchdog       │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use esp_idf_svc::eventloop::EspSystemEventLoop;
use esp_idf_svc::hal::delay::FreeRtos;
use esp_idf_svc::hal::gpio::{AnyIOPin, AnyOutputPin, Input, Output, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;
use esp_idf_svc::nvs::EspDefaultNvsPartition;
use log::{info, warn};

use propctl::adapters::config_source::{JsonConfigSource, load_or_default};
use propctl::adapters::hardware::{HardwareAdapter, Inputs};
use propctl::adapters::log_sink::LogEventSink;
use propctl::adapters::time::MonotonicClock;
use propctl::adapters::wifi::{WifiCredentials, connect_station};
use propctl::app::events::AppEvent;
use propctl::app::ports::EventSink;
use propctl::app::service::PropController;
use propctl::config::{ActuatorKind, PropConfig};
use propctl::drivers::actuator::{ActuatorDrive, BistableDrive, LatchedDrive, MaglockDrive};
use propctl::drivers::input::DebouncedInput;
use propctl::drivers::relay::RelayOutput;
use propctl::drivers::watchdog::Watchdog;
use propctl::error::Error;
use propctl::http::HttpGetServer;
use propctl::{net, pins};

const CONFIG_JSON: &str = include_str!("../config/prop.json");

type InPin = PinDriver<'static, AnyIOPin, Input>;
type OutPin = PinDriver<'static, AnyOutputPin, Output>;

// ── Pin construction ──────────────────────────────────────────

fn input(gpio: i32, name: &'static str, debounce_ms: u32) -> Result<DebouncedInput<InPin>> {
    // SAFETY: every GPIO number in `pins` is claimed exactly once, here or
    // in `relay`, and no other driver is built from the same number.
    let mut pin = PinDriver::input(unsafe { AnyIOPin::new(gpio) })?;
    pin.set_pull(Pull::Up)?;
    Ok(DebouncedInput::new(pin, name, debounce_ms))
}

fn relay(gpio: i32, name: &'static str) -> Result<RelayOutput<OutPin>> {
    // SAFETY: see `input`.
    let pin = PinDriver::output(unsafe { AnyOutputPin::new(gpio) })?;
    Ok(RelayOutput::new(pin, name).map_err(Error::from)?)
}

fn build_actuator(config: &PropConfig) -> Result<Box<dyn ActuatorDrive>> {
    let drive: Box<dyn ActuatorDrive> = match config.actuator {
        ActuatorKind::Maglock => Box::new(MaglockDrive::new(relay(pins::ACTUATOR_GPIO, "maglock")?)),
        ActuatorKind::Latched => Box::new(LatchedDrive::new(relay(pins::ACTUATOR_GPIO, "latch")?)),
        ActuatorKind::Bistable => Box::new(BistableDrive::new(
            relay(pins::LINAC_OPEN_GPIO, "linac-open")?,
            relay(pins::LINAC_CLOSE_GPIO, "linac-close")?,
            config.pulse_ms,
        )),
    };
    Ok(drive)
}

fn build_hardware(config: &PropConfig) -> Result<HardwareAdapter<InPin, OutPin>> {
    let inputs = Inputs {
        emergency_power: input(pins::EMERGENCY_POWER_GPIO, "epower", config.debounce_ms)?,
        float_switch: input(pins::FLOAT_SWITCH_GPIO, "float", config.debounce_ms)?,
        start: input(pins::START_BUTTON_GPIO, "start", config.debounce_ms)?,
    };
    Ok(HardwareAdapter::new(
        inputs,
        relay(pins::SSR1_GPIO, "ssr1")?,
        relay(pins::SSR2_GPIO, "ssr2")?,
        build_actuator(config)?,
    ))
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;
    info!("propctl v{}", env!("CARGO_PKG_VERSION"));

    let peripherals = Peripherals::take()?;
    let sysloop = EspSystemEventLoop::take()?;
    let nvs = EspDefaultNvsPartition::take()?;

    // ── 2. Config ─────────────────────────────────────────────
    let config = load_or_default(&JsonConfigSource::new(CONFIG_JSON));
    info!(
        "Profile: {:?} actuator, {:?} routes, setup_mode={}, regress={}",
        config.actuator, config.actuator_routes, config.setup_mode, config.regress_on_power_loss
    );

    // ── 3. Hardware + controller ──────────────────────────────
    let clock = MonotonicClock::new();
    let mut hw = build_hardware(&config)?;
    let mut sink = LogEventSink::new();
    let mut app = PropController::new(&config);
    app.start(&mut hw, &mut sink, clock.now_ms());

    // ── 4. Network ────────────────────────────────────────────
    let _wifi = match WifiCredentials::from_build_env() {
        Ok(creds) => {
            let wifi = connect_station(peripherals.modem, sysloop, nvs, &creds)?;
            let listener = net::bind(config.http_port).map_err(Error::from)?;
            net::spawn(listener, HttpGetServer::for_config(&config)).map_err(Error::from)?;
            info!("HTTP control on port {}", config.http_port);
            Some(wifi)
        }
        Err(e) => {
            warn!("Network disabled: {e}");
            None
        }
    };

    // ── 5. Control loop ───────────────────────────────────────
    let watchdog = Watchdog::default();
    let tick_ms = u64::from(config.tick_interval_ms);
    let status_ms = u64::from(config.status_log_interval_ms);
    let mut next_status = clock.now_ms() + status_ms;

    info!("System ready. Entering control loop.");
    loop {
        let now = clock.now_ms();
        app.tick(&mut hw, &mut sink, now);

        while let Some(msg) = net::try_recv_command() {
            let reply = app.execute(msg.command, &mut hw, &mut sink, clock.now_ms());
            net::send_reply(msg.id, reply);
        }

        if status_ms > 0 && now >= next_status {
            sink.emit(&AppEvent::Status(app.build_status(&hw)));
            next_status = now + status_ms;
        }

        watchdog.feed();

        let spent = clock.now_ms().saturating_sub(now);
        FreeRtos::delay_ms(tick_ms.saturating_sub(spent).max(1) as u32);
    }
}
