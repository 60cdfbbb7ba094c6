//! Inter-task communication channels
//!
//! Defines the static channels used for communication between Embassy tasks.
//! Uses embassy-sync primitives for safe async communication.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use embassy_sync::watch::Watch;

use caldera_core::control::{Command, StatusSnapshot};

/// Channel capacity for user commands
const COMMAND_CHANNEL_SIZE: usize = 4;

/// Commands for the control task (panel buttons, menu)
pub static COMMANDS: Channel<CriticalSectionRawMutex, Command, COMMAND_CHANNEL_SIZE> =
    Channel::new();

/// Subscribed receivers of the status (display, menu)
const STATUS_RECEIVERS: usize = 2;

/// Latest controller status, published after every tick
///
/// Readers peek at the current value; nobody consumes it.
pub static STATUS: Watch<CriticalSectionRawMutex, StatusSnapshot, STATUS_RECEIVERS> =
    Watch::new();
