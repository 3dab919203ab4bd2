//! # nbt-dumper
//!
//! A minimal offline-mode client for the early phases of the Minecraft Java
//! Edition protocol: Handshaking, Status, Login, and Configuration.
//!
//! The client connects to one server, discovers its protocol version over a
//! Status exchange, performs an unauthenticated login (negotiating zlib
//! compression when the server asks for it), and captures the raw bytes of
//! the first registry-data packet pushed during Configuration. The blob is
//! persisted verbatim; its NBT structure is never parsed.
//!
//! ## Layout
//! - [`core`] — varint primitives and the frame codec
//! - [`protocol`] — protocol states, the packet catalog, status and chat documents
//! - [`client`] — the connection wrapper and the session orchestrator
//! - [`extract`] — atomic persistence of the captured blob
//! - [`error`], [`config`], [`utils`] — ambient support
//!
//! ## Out of scope
//! The Play state, online-mode (encrypted) logins, and NBT parsing. Servers
//! demanding encryption are detected and rejected explicitly.

pub mod client;
pub mod config;
pub mod core;
pub mod error;
pub mod extract;
pub mod protocol;
pub mod utils;

pub use client::{resolve_protocol_version, run_session};
pub use config::ClientConfig;
pub use error::{ProtocolError, Result};
