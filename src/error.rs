//! # Error Types
//!
//! Error handling for the protocol client.
//!
//! This module defines all error variants that can occur while driving a
//! session, from low-level I/O failures to protocol violations and
//! server-initiated terminations.
//!
//! All errors are fatal to the operation that produced them: nothing is
//! retried internally, and the caller may only retry a whole operation from
//! scratch on a fresh connection.

use std::io;
use thiserror::Error;

/// Primary error type for all client operations.
#[derive(Error, Debug)]
pub enum ProtocolError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Connection closed by peer")]
    ConnectionClosed,

    #[error("Timeout occurred")]
    Timeout,

    #[error("Frame too large: {0} bytes")]
    OversizedFrame(usize),

    #[error("Decompression failed: {0}")]
    DecompressionFailure(String),

    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    #[error("Unexpected packet {packet} in {state} state")]
    UnexpectedPacket { state: &'static str, packet: String },

    #[error("Unknown packet id {id:#04x} in {state} state")]
    UnknownPacket { state: &'static str, id: i32 },

    #[error("Malformed status response: {0}")]
    MalformedStatus(String),

    #[error("Server requires encrypted (online-mode) login")]
    EncryptionRequired,

    #[error("Disconnected by server: {0}")]
    Disconnected(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Type alias for Results using ProtocolError
pub type Result<T> = std::result::Result<T, ProtocolError>;
