pub mod config;
pub mod progress;
pub mod status;
pub mod watch;
pub mod window;
