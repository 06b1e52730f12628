//! Channels between the HTTP I/O task and the control loop.
//!
//! Uses `embassy-sync` bounded channels so the network thread never
//! touches prop state: it routes a request to a [`ControlCommand`],
//! hands it over, and waits for the [`Reply`] the control loop produces
//! between ticks.
//!
//! ```text
//! ┌──────────────┐  CommandMsg  ┌──────────────┐
//! │   I/O Task   │────────────▶│  Control Loop │
//! │  (async)     │◀────────────│  (sync)       │
//! └──────────────┘   ReplyMsg   └──────────────┘
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::app::commands::{ControlCommand, Reply};

/// A routed request awaiting execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandMsg {
    /// Echoed back in the reply so a late answer is never matched to
    /// the wrong connection.
    pub id: u32,
    pub command: ControlCommand,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyMsg {
    pub id: u32,
    pub reply: Reply,
}

const CMD_DEPTH: usize = 4;
const REPLY_DEPTH: usize = 4;

/// Inbound: I/O task → control loop.
pub static CMD_CHANNEL: Channel<CriticalSectionRawMutex, CommandMsg, CMD_DEPTH> = Channel::new();

/// Outbound: control loop → I/O task.
pub static REPLY_CHANNEL: Channel<CriticalSectionRawMutex, ReplyMsg, REPLY_DEPTH> = Channel::new();

/// Newest request id the I/O task gave up on (0 = none).  Ids are issued
/// in increasing order starting at 1.
static ABANDONED_UP_TO: AtomicU32 = AtomicU32::new(0);

/// Mark `id`, and every older request, as answered with a timeout.
pub fn abandon(id: u32) {
    ABANDONED_UP_TO.store(id, Ordering::Release);
}

/// True if the client for `id` was already told the request failed.
pub fn is_abandoned(id: u32) -> bool {
    expired(id, ABANDONED_UP_TO.load(Ordering::Acquire))
}

/// Serial-number comparison so the check survives id wrap-around.
#[allow(clippy::cast_possible_wrap)]
fn expired(id: u32, watermark: u32) -> bool {
    id.wrapping_sub(watermark) as i32 <= 0
}
