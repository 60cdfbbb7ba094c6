//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod control;
pub mod reset_button;

pub use control::{control_task, BoilerController, BoilerRelay};
pub use reset_button::reset_button_task;
