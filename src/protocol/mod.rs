//! # Protocol Model
//!
//! The typed view of the wire: protocol states, the packet catalog for each
//! direction, the status document, and chat-style messages.
//!
//! A packet identity is only meaningful relative to the `(state, direction)`
//! pair it was decoded under; the catalog in [`packets`] resolves each pair
//! to exactly one variant or to the explicit `Unknown` sentinel.

pub mod chat;
pub mod packets;
pub mod status;

/// All protocol states this client can occupy. Later states (Play) are out
/// of scope: the session ends while still in Configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolState {
    /// The initial state, in which the client selects the next state to
    /// enter: either `Status` or `Login`.
    Handshaking,
    /// The client is requesting a server status document.
    Status,
    /// The client is logging into the server.
    Login,
    /// Login is acknowledged; the server pushes configuration data.
    Configuration,
}

impl ProtocolState {
    pub fn name(self) -> &'static str {
        match self {
            ProtocolState::Handshaking => "handshaking",
            ProtocolState::Status => "status",
            ProtocolState::Login => "login",
            ProtocolState::Configuration => "configuration",
        }
    }
}

/// Which side of the connection produced a packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Serverbound,
    Clientbound,
}

/// The state the Handshake packet asks the server to move to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextState {
    Status = 1,
    Login = 2,
}

impl NextState {
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(NextState::Status),
            2 => Some(NextState::Login),
            _ => None,
        }
    }
}
