//! The packet catalog.
//!
//! Two closed sum types, one per direction, each variant tied to exactly one
//! protocol state and numeric identity. Decoding resolves `(state, id)` to a
//! variant by exhaustive match; identities with no mapping become the
//! [`ClientboundPacket::Unknown`] sentinel so the orchestrator can report the
//! raw id instead of failing blind.
//!
//! Both directions encode *and* decode: the client only ever sends
//! serverbound packets, but the scripted test server needs the other half.

use crate::core::buffer::{PacketReader, PacketWriter};
use crate::core::codec::Frame;
use crate::error::{ProtocolError, Result};
use crate::protocol::chat::ChatComponent;
use crate::protocol::{NextState, ProtocolState};
use bytes::Bytes;
use uuid::Uuid;

/// Packets this client produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerboundPacket {
    /// Opens the exchange and selects the next state.
    Handshake {
        protocol_version: i32,
        server_address: String,
        server_port: u16,
        next_state: NextState,
    },
    /// Asks for the status document.
    StatusRequest,
    /// Starts an offline-mode login with a self-asserted identity.
    LoginStart { username: String, uuid: Uuid },
    /// Confirms login completion and moves the session into Configuration.
    LoginAcknowledged,
}

impl ServerboundPacket {
    /// The state this packet belongs to.
    pub fn state(&self) -> ProtocolState {
        match self {
            ServerboundPacket::Handshake { .. } => ProtocolState::Handshaking,
            ServerboundPacket::StatusRequest => ProtocolState::Status,
            ServerboundPacket::LoginStart { .. } | ServerboundPacket::LoginAcknowledged => {
                ProtocolState::Login
            }
        }
    }

    /// The packet identity within its state.
    pub fn id(&self) -> i32 {
        match self {
            ServerboundPacket::Handshake { .. } => 0x00,
            ServerboundPacket::StatusRequest => 0x00,
            ServerboundPacket::LoginStart { .. } => 0x00,
            ServerboundPacket::LoginAcknowledged => 0x03,
        }
    }

    /// Encodes identity plus fields into a frame body.
    pub fn encode(&self) -> Frame {
        let mut writer = PacketWriter::new();
        writer.write_varint(self.id());
        match self {
            ServerboundPacket::Handshake {
                protocol_version,
                server_address,
                server_port,
                next_state,
            } => {
                writer.write_varint(*protocol_version);
                writer.write_string(server_address);
                writer.write_u16(*server_port);
                writer.write_varint(*next_state as i32);
            }
            ServerboundPacket::StatusRequest | ServerboundPacket::LoginAcknowledged => {}
            ServerboundPacket::LoginStart { username, uuid } => {
                writer.write_string(username);
                writer.write_uuid(uuid);
            }
        }
        Frame {
            body: writer.into_bytes(),
        }
    }

    /// Decodes a frame body under the given state. Used by the test server;
    /// the real client never reads serverbound packets.
    pub fn decode(state: ProtocolState, frame: &Frame) -> Result<Self> {
        let mut reader = PacketReader::new(&frame.body);
        let id = reader.read_varint()?;
        let packet = match (state, id) {
            (ProtocolState::Handshaking, 0x00) => {
                let protocol_version = reader.read_varint()?;
                let server_address = reader.read_string()?;
                let server_port = reader.read_u16()?;
                let next_state_id = reader.read_varint()?;
                let next_state = NextState::from_id(next_state_id).ok_or_else(|| {
                    ProtocolError::MalformedPacket(format!(
                        "invalid next state {next_state_id}"
                    ))
                })?;
                ServerboundPacket::Handshake {
                    protocol_version,
                    server_address,
                    server_port,
                    next_state,
                }
            }
            (ProtocolState::Status, 0x00) => ServerboundPacket::StatusRequest,
            (ProtocolState::Login, 0x00) => ServerboundPacket::LoginStart {
                username: reader.read_string()?,
                uuid: reader.read_uuid()?,
            },
            (ProtocolState::Login, 0x03) => ServerboundPacket::LoginAcknowledged,
            _ => {
                return Err(ProtocolError::UnknownPacket {
                    state: state.name(),
                    id,
                })
            }
        };
        reader.expect_empty()?;
        Ok(packet)
    }
}

/// Packets this client consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientboundPacket {
    /// The status document, as raw JSON text.
    StatusResponse { json: String },
    /// Terminal: the server refused the session, with a structured reason.
    LoginDisconnect { reason: ChatComponent },
    /// The server demands an encrypted, online-mode login. Unsupported:
    /// the payload is kept opaque and the session aborts.
    LoginEncryptionRequest { payload: Bytes },
    /// Login complete; the payload (profile data) is opaque to this client.
    LoginSuccess { payload: Bytes },
    /// Mutates the session compression threshold, effective from the next
    /// frame boundary.
    LoginSetCompression { threshold: i32 },
    /// The registry blob this whole client exists to capture.
    RegistryData { payload: Bytes },
    /// An identity with no mapping in the current state. Retains the raw id
    /// for diagnostics instead of masquerading as a real packet.
    Unknown { id: i32 },
}

impl ClientboundPacket {
    /// The state this packet belongs to. `Unknown` has no state of its own.
    pub fn state(&self) -> Option<ProtocolState> {
        match self {
            ClientboundPacket::StatusResponse { .. } => Some(ProtocolState::Status),
            ClientboundPacket::LoginDisconnect { .. }
            | ClientboundPacket::LoginEncryptionRequest { .. }
            | ClientboundPacket::LoginSuccess { .. }
            | ClientboundPacket::LoginSetCompression { .. } => Some(ProtocolState::Login),
            ClientboundPacket::RegistryData { .. } => Some(ProtocolState::Configuration),
            ClientboundPacket::Unknown { .. } => None,
        }
    }

    pub fn id(&self) -> i32 {
        match self {
            ClientboundPacket::StatusResponse { .. } => 0x00,
            ClientboundPacket::LoginDisconnect { .. } => 0x00,
            ClientboundPacket::LoginEncryptionRequest { .. } => 0x01,
            ClientboundPacket::LoginSuccess { .. } => 0x02,
            ClientboundPacket::LoginSetCompression { .. } => 0x03,
            ClientboundPacket::RegistryData { .. } => 0x05,
            ClientboundPacket::Unknown { id } => *id,
        }
    }

    /// Encodes identity plus fields into a frame body. Used by the test
    /// server and by round-trip tests.
    pub fn encode(&self) -> Frame {
        let mut writer = PacketWriter::new();
        writer.write_varint(self.id());
        match self {
            ClientboundPacket::StatusResponse { json } => writer.write_string(json),
            ClientboundPacket::LoginDisconnect { reason } => {
                writer.write_string(&reason.to_json())
            }
            ClientboundPacket::LoginEncryptionRequest { payload }
            | ClientboundPacket::LoginSuccess { payload }
            | ClientboundPacket::RegistryData { payload } => writer.write_bytes(payload),
            ClientboundPacket::LoginSetCompression { threshold } => {
                writer.write_varint(*threshold)
            }
            ClientboundPacket::Unknown { .. } => {}
        }
        Frame {
            body: writer.into_bytes(),
        }
    }

    /// Decodes a frame body under the given state.
    ///
    /// Unmapped identities decode to [`ClientboundPacket::Unknown`]; only a
    /// body that fails to parse as its mapped variant is an error.
    pub fn decode(state: ProtocolState, frame: &Frame) -> Result<Self> {
        let mut reader = PacketReader::new(&frame.body);
        let id = reader.read_varint()?;
        let packet = match (state, id) {
            (ProtocolState::Status, 0x00) => ClientboundPacket::StatusResponse {
                json: reader.read_string()?,
            },
            (ProtocolState::Login, 0x00) => {
                let json = reader.read_string()?;
                let reason = ChatComponent::from_json(&json).map_err(|e| {
                    ProtocolError::MalformedPacket(format!("invalid disconnect reason: {e}"))
                })?;
                ClientboundPacket::LoginDisconnect { reason }
            }
            (ProtocolState::Login, 0x01) => ClientboundPacket::LoginEncryptionRequest {
                payload: Bytes::copy_from_slice(reader.read_remaining()),
            },
            (ProtocolState::Login, 0x02) => ClientboundPacket::LoginSuccess {
                payload: Bytes::copy_from_slice(reader.read_remaining()),
            },
            (ProtocolState::Login, 0x03) => ClientboundPacket::LoginSetCompression {
                threshold: reader.read_varint()?,
            },
            (ProtocolState::Configuration, 0x05) => ClientboundPacket::RegistryData {
                payload: Bytes::copy_from_slice(reader.read_remaining()),
            },
            _ => return Ok(ClientboundPacket::Unknown { id }),
        };
        reader.expect_empty()?;
        Ok(packet)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handshake_roundtrip() {
        let packet = ServerboundPacket::Handshake {
            protocol_version: 764,
            server_address: "mc.example.net".to_string(),
            server_port: 25565,
            next_state: NextState::Login,
        };
        let decoded =
            ServerboundPacket::decode(ProtocolState::Handshaking, &packet.encode()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn same_id_resolves_per_state() {
        // 0x00 is StatusResponse in Status but LoginDisconnect in Login.
        let status = ClientboundPacket::StatusResponse {
            json: r#"{"version":{"protocol":47}}"#.to_string(),
        };
        let frame = status.encode();
        assert!(matches!(
            ClientboundPacket::decode(ProtocolState::Status, &frame).unwrap(),
            ClientboundPacket::StatusResponse { .. }
        ));
        // The same body under Login is a disconnect whose reason must parse
        // as a chat document; this one happens to, as an empty component.
        assert!(matches!(
            ClientboundPacket::decode(ProtocolState::Login, &frame).unwrap(),
            ClientboundPacket::LoginDisconnect { .. }
        ));
    }

    #[test]
    fn unknown_identity_keeps_raw_id() {
        let frame = Frame {
            body: Bytes::from_static(&[0x7F]),
        };
        let packet = ClientboundPacket::decode(ProtocolState::Login, &frame).unwrap();
        assert_eq!(packet, ClientboundPacket::Unknown { id: 0x7F });
    }

    #[test]
    fn registry_data_keeps_payload_verbatim() {
        let packet = ClientboundPacket::RegistryData {
            payload: Bytes::from_static(b"\x0A\x00\x00"),
        };
        let decoded =
            ClientboundPacket::decode(ProtocolState::Configuration, &packet.encode()).unwrap();
        assert_eq!(decoded, packet);
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut writer = PacketWriter::new();
        writer.write_varint(0x03); // LoginSetCompression
        writer.write_varint(256);
        writer.write_varint(99); // stray trailing field
        let frame = Frame {
            body: writer.into_bytes(),
        };
        assert!(ClientboundPacket::decode(ProtocolState::Login, &frame).is_err());
    }
}
