//! Process-level state shared by the commands.

mod state;

pub use state::{is_shutdown, register_server, setup_shutdown_handler};
