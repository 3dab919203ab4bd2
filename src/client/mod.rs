//! # Client
//!
//! The connection wrapper and the protocol orchestrator that drives one
//! session through Status, Login, and Configuration.

pub mod connection;
pub mod session;

pub use connection::Connection;
pub use session::{resolve_protocol_version, run_session};
