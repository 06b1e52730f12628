//! HTTP I/O task — one connection at a time, reactor-driven.
//!
//! Runs in a dedicated thread using `edge-executor` with `async-io-mini`
//! timers for the poll intervals (no busy-spinning).  For each
//! connection it reads the request line, routes it, and either answers
//! immediately (400/404/405) or forwards the command to the control loop
//! and waits for its reply.
//!
//! ```text
//!  ┌───────────────────────────────────────────────────────────┐
//!  │  I/O Thread                                               │
//!  │  ┌─────────────────────────────────────────────────────┐  │
//!  │  │  edge_executor::LocalExecutor                       │  │
//!  │  │   serve_loop: accept ⏱50ms → read ⏱2ms → route       │  │
//!  │  │        │                                            │  │
//!  │  │        └─▶ CMD_CHANNEL ··· REPLY_CHANNEL ─▶ write    │  │
//!  │  └─────────────────────────────────────────────────────┘  │
//!  └───────────────────────────────────────────────────────────┘
//! ```

use core::time::Duration;
use std::io::{ErrorKind, Read, Write};
use std::net::{Shutdown, TcpListener, TcpStream};
use std::time::Instant;

use async_io_mini::Timer;
use log::{debug, info, warn};

use crate::error::NetError;
use crate::http::request::has_request_line;
use crate::http::{HttpGetServer, Response, StatusCode};

use super::channels::{CMD_CHANNEL, CommandMsg, REPLY_CHANNEL, abandon};

const READ_BUF_SIZE: usize = 512;
const ACCEPT_POLL: Duration = Duration::from_millis(50);
const READ_POLL: Duration = Duration::from_millis(2);
/// Give up on a client that has not sent its request line by then.
const REQUEST_TIMEOUT: Duration = Duration::from_millis(2000);
/// Longest wait for the control loop to answer.
const REPLY_TIMEOUT: Duration = Duration::from_millis(1000);
const IO_STACK_SIZE: usize = 8 * 1024;

/// Bind a non-blocking listener on all interfaces.
pub fn bind(port: u16) -> Result<TcpListener, NetError> {
    let listener = TcpListener::bind(("0.0.0.0", port)).map_err(|_| NetError::BindFailed)?;
    listener
        .set_nonblocking(true)
        .map_err(|_| NetError::BindFailed)?;
    Ok(listener)
}

// ── Connection handling ──────────────────────────────────────

/// Wall-clock limit.  Poll timers round up to the RTOS tick, so counting
/// poll intervals would overshoot.
struct Deadline {
    start: Instant,
    limit: Duration,
}

impl Deadline {
    fn after(limit: Duration) -> Self {
        Self { start: Instant::now(), limit }
    }

    fn expired(&self) -> bool {
        self.start.elapsed() >= self.limit
    }
}

/// Read until the request line is complete.
async fn read_request(stream: &mut TcpStream) -> Result<String, NetError> {
    stream
        .set_nonblocking(true)
        .map_err(|_| NetError::ReadFailed)?;

    let mut buf = [0u8; READ_BUF_SIZE];
    let mut len = 0;
    let deadline = Deadline::after(REQUEST_TIMEOUT);

    while !has_request_line(&buf[..len]) {
        if len == buf.len() {
            return Err(NetError::RequestTooLarge);
        }
        match stream.read(&mut buf[len..]) {
            Ok(0) => return Err(NetError::ReadFailed),
            Ok(n) => len += n,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if deadline.expired() {
                    return Err(NetError::ReadFailed);
                }
                Timer::after(READ_POLL).await;
            }
            Err(_) => return Err(NetError::ReadFailed),
        }
    }

    Ok(String::from_utf8_lossy(&buf[..len]).into_owned())
}

/// Hand a command to the control loop and wait for its reply.
///
/// On timeout the id is abandoned, so a command still queued is dropped
/// instead of executed.  A command the loop has already dequeued when the
/// timer fires still applies; its late reply is discarded as stale.
async fn exchange(msg: CommandMsg) -> Response {
    let reply = async {
        CMD_CHANNEL.send(msg).await;
        loop {
            let r = REPLY_CHANNEL.receive().await;
            if r.id == msg.id {
                return Some(Response::from_reply(r.reply));
            }
            debug!("HTTP: dropping stale reply #{}", r.id);
        }
    };
    let timeout = async {
        Timer::after(REPLY_TIMEOUT).await;
        None
    };

    futures_lite::future::or(reply, timeout)
        .await
        .unwrap_or_else(|| {
            abandon(msg.id);
            warn!("HTTP: control loop did not answer #{}", msg.id);
            Response::new(StatusCode::ServiceUnavailable)
        })
}

fn write_response(stream: &mut TcpStream, response: &Response) -> Result<(), NetError> {
    stream
        .set_nonblocking(false)
        .map_err(|_| NetError::WriteFailed)?;
    write!(stream, "{response}").map_err(|_| NetError::WriteFailed)?;
    stream.flush().map_err(|_| NetError::WriteFailed)
}

async fn serve_connection(
    mut stream: TcpStream,
    server: &HttpGetServer,
    id: u32,
) -> Result<(), NetError> {
    let response = match read_request(&mut stream).await {
        Ok(text) => match server.route(&text) {
            Ok(command) => exchange(CommandMsg { id, command }).await,
            Err(response) => response,
        },
        Err(NetError::RequestTooLarge) => Response::new(StatusCode::BadRequest),
        Err(e) => return Err(e),
    };

    write_response(&mut stream, &response)?;
    let _ = stream.shutdown(Shutdown::Both);
    Ok(())
}

// ── Async loop ───────────────────────────────────────────────

async fn serve_loop(listener: TcpListener, server: HttpGetServer) {
    let mut next_id: u32 = 0;
    loop {
        match listener.accept() {
            Ok((stream, peer)) => {
                next_id = next_id.wrapping_add(1);
                debug!("HTTP: #{next_id} from {peer}");
                if let Err(e) = serve_connection(stream, &server, next_id).await {
                    warn!("HTTP: #{next_id} {e}");
                }
            }
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                Timer::after(ACCEPT_POLL).await;
            }
            Err(e) => {
                warn!("HTTP: accept failed: {e}");
                Timer::after(ACCEPT_POLL).await;
            }
        }
    }
}

fn run_io_loop(listener: TcpListener, server: HttpGetServer) {
    let executor: edge_executor::LocalExecutor<'_, 4> = edge_executor::LocalExecutor::new();
    executor.spawn(serve_loop(listener, server)).detach();

    info!("HTTP I/O task started");
    futures_lite::future::block_on(executor.run(core::future::pending::<()>()));
}

// ── Thread spawn ─────────────────────────────────────────────

/// Start the I/O thread.  Takes ownership of the listener and the route
/// table; all prop state stays with the caller.
pub fn spawn(
    listener: TcpListener,
    server: HttpGetServer,
) -> Result<std::thread::JoinHandle<()>, NetError> {
    std::thread::Builder::new()
        .name("http-io".into())
        .stack_size(IO_STACK_SIZE)
        .spawn(move || run_io_loop(listener, server))
        .map_err(|_| NetError::SpawnFailed)
}
