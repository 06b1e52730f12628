//! Network transport for the control protocol.
//!
//! The I/O task owns the socket; the control loop owns the prop.  They
//! meet only at the channels in [`channels`].

pub mod channels;
pub mod io_task;

use log::{debug, warn};

use crate::app::commands::Reply;

use channels::{CMD_CHANNEL, CommandMsg, REPLY_CHANNEL, ReplyMsg, is_abandoned};

pub use io_task::{bind, spawn};

/// Next pending command, if any.  Called by the control loop between ticks.
///
/// Commands whose client already received a 503 are discarded here, so a
/// timed-out request never takes effect after the fact.
pub fn try_recv_command() -> Option<CommandMsg> {
    while let Ok(msg) = CMD_CHANNEL.try_receive() {
        if is_abandoned(msg.id) {
            debug!("NET: discarding timed-out command #{}", msg.id);
            continue;
        }
        return Some(msg);
    }
    None
}

/// Return a reply to the I/O task.
pub fn send_reply(id: u32, reply: Reply) {
    if REPLY_CHANNEL.try_send(ReplyMsg { id, reply }).is_err() {
        warn!("NET: reply channel full, dropping reply #{id}");
    }
}
