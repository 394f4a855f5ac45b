//! Port traits at the I/O seams of the quiz engine.

pub mod config_port;
pub mod export_port;
