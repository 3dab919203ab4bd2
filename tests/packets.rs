//! Round-trip tests for the packet catalog.
//!
//! Every variant must survive encode-then-decode under its own
//! (state, direction) pair, across the valid domains of its fields:
//! any 16-byte UUID, non-empty usernames, thresholds including negatives.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use bytes::Bytes;
use nbt_dumper::core::codec::Frame;
use nbt_dumper::protocol::chat::ChatComponent;
use nbt_dumper::protocol::packets::{ClientboundPacket, ServerboundPacket};
use nbt_dumper::protocol::{NextState, ProtocolState};
use uuid::Uuid;

fn roundtrip_serverbound(state: ProtocolState, packet: ServerboundPacket) {
    let decoded = ServerboundPacket::decode(state, &packet.encode())
        .expect("decode should succeed");
    assert_eq!(decoded, packet);
}

fn roundtrip_clientbound(state: ProtocolState, packet: ClientboundPacket) {
    let decoded = ClientboundPacket::decode(state, &packet.encode())
        .expect("decode should succeed");
    assert_eq!(decoded, packet);
}

#[test]
fn serverbound_catalog_roundtrips() {
    roundtrip_serverbound(
        ProtocolState::Handshaking,
        ServerboundPacket::Handshake {
            protocol_version: 764,
            server_address: "play.example.org".to_string(),
            server_port: 25565,
            next_state: NextState::Status,
        },
    );
    roundtrip_serverbound(
        ProtocolState::Handshaking,
        ServerboundPacket::Handshake {
            protocol_version: 47,
            server_address: "localhost".to_string(),
            server_port: 1,
            next_state: NextState::Login,
        },
    );
    roundtrip_serverbound(ProtocolState::Status, ServerboundPacket::StatusRequest);
    roundtrip_serverbound(ProtocolState::Login, ServerboundPacket::LoginAcknowledged);
}

#[test]
fn login_start_roundtrips_across_uuid_domain() {
    for uuid in [
        Uuid::nil(),
        Uuid::from_bytes([0xFF; 16]),
        Uuid::new_v4(),
    ] {
        roundtrip_serverbound(
            ProtocolState::Login,
            ServerboundPacket::LoginStart {
                username: "NBTDumper".to_string(),
                uuid,
            },
        );
    }
    // Minimal and maximal vanilla usernames.
    for username in ["a", "sixteen_chars_xx"] {
        roundtrip_serverbound(
            ProtocolState::Login,
            ServerboundPacket::LoginStart {
                username: username.to_string(),
                uuid: Uuid::new_v4(),
            },
        );
    }
}

#[test]
fn clientbound_catalog_roundtrips() {
    roundtrip_clientbound(
        ProtocolState::Status,
        ClientboundPacket::StatusResponse {
            json: r#"{"version":{"name":"1.8","protocol":47}}"#.to_string(),
        },
    );
    roundtrip_clientbound(
        ProtocolState::Login,
        ClientboundPacket::LoginDisconnect {
            reason: ChatComponent::plain("You are banned."),
        },
    );
    roundtrip_clientbound(
        ProtocolState::Login,
        ClientboundPacket::LoginEncryptionRequest {
            payload: Bytes::from_static(b"\x00\x01\x02 opaque server blob"),
        },
    );
    roundtrip_clientbound(
        ProtocolState::Login,
        ClientboundPacket::LoginSuccess {
            payload: Bytes::from_static(b"opaque profile payload"),
        },
    );
    roundtrip_clientbound(
        ProtocolState::Configuration,
        ClientboundPacket::RegistryData {
            payload: Bytes::from_static(b"\x0A\x00\x00"),
        },
    );
}

#[test]
fn set_compression_roundtrips_across_threshold_domain() {
    for threshold in [-1, 0, 1, 256, i32::MAX] {
        roundtrip_clientbound(
            ProtocolState::Login,
            ClientboundPacket::LoginSetCompression { threshold },
        );
    }
}

#[test]
fn empty_payload_variants_roundtrip() {
    roundtrip_clientbound(
        ProtocolState::Login,
        ClientboundPacket::LoginSuccess {
            payload: Bytes::new(),
        },
    );
    roundtrip_clientbound(
        ProtocolState::Configuration,
        ClientboundPacket::RegistryData {
            payload: Bytes::new(),
        },
    );
}

#[test]
fn unknown_identity_is_surfaced_not_decoded() {
    let frame = Frame {
        body: Bytes::from_static(&[0x7F, 0xDE, 0xAD]),
    };
    let packet = ClientboundPacket::decode(ProtocolState::Login, &frame).unwrap();
    assert_eq!(packet, ClientboundPacket::Unknown { id: 0x7F });

    // The same identity means something else entirely in another state:
    // nothing maps 0x7F anywhere, but 0x03 flips between SetCompression
    // (Login) and nothing (Configuration).
    let set_compression = ClientboundPacket::LoginSetCompression { threshold: 64 };
    let frame = set_compression.encode();
    assert_eq!(
        ClientboundPacket::decode(ProtocolState::Configuration, &frame).unwrap(),
        ClientboundPacket::Unknown { id: 0x03 }
    );
}

#[test]
fn disconnect_reason_preserves_structure() {
    let reason = ChatComponent::from_json(r#"{"text":"Bye ","extra":["there"]}"#).unwrap();
    let packet = ClientboundPacket::LoginDisconnect {
        reason: reason.clone(),
    };
    let decoded = ClientboundPacket::decode(ProtocolState::Login, &packet.encode()).unwrap();
    let ClientboundPacket::LoginDisconnect { reason: decoded } = decoded else {
        panic!("wrong variant");
    };
    assert_eq!(decoded.flatten(), "Bye there");
    assert_eq!(decoded, reason);
}
