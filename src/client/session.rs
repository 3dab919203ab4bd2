//! The protocol orchestrator.
//!
//! Drives the ordered packet exchanges across the four protocol states and
//! reacts to the branches a server may legally take during Login. Exactly one
//! transport is opened and closed per operation; no state survives a failure
//! and nothing is retried here.

use crate::config::ClientConfig;
use crate::error::{ProtocolError, Result};
use crate::protocol::packets::{ClientboundPacket, ServerboundPacket};
use crate::protocol::{status, NextState, ProtocolState};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::Connection;

/// Protocol version sent in the status handshake. Servers answer a status
/// query regardless of the version they see here; the real version comes
/// back in the response document.
const STATUS_PLACEHOLDER_VERSION: i32 = 47;

/// Queries the server's protocol version over a throwaway Status exchange.
///
/// The transport is closed before returning, success or failure.
///
/// # Errors
/// Connection and timeout failures, or a protocol error when the server
/// answers with anything other than a well-formed status document.
#[instrument(skip(config))]
pub async fn resolve_protocol_version(
    address: &str,
    port: u16,
    config: &ClientConfig,
) -> Result<i32> {
    let mut conn = Connection::connect(address, port, config).await?;
    let result = status_exchange(&mut conn, address, port).await;
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Error closing status connection");
    }
    result
}

async fn status_exchange(conn: &mut Connection, address: &str, port: u16) -> Result<i32> {
    conn.send(ServerboundPacket::Handshake {
        protocol_version: STATUS_PLACEHOLDER_VERSION,
        server_address: address.to_string(),
        server_port: port,
        next_state: NextState::Status,
    })
    .await?;
    conn.set_state(ProtocolState::Status);
    conn.send(ServerboundPacket::StatusRequest).await?;

    match conn.recv().await? {
        ClientboundPacket::StatusResponse { json } => {
            let version = status::protocol_version(&json)?;
            info!(version, "Resolved server protocol version");
            Ok(version)
        }
        ClientboundPacket::Unknown { id } => Err(ProtocolError::UnknownPacket {
            state: ProtocolState::Status.name(),
            id,
        }),
        other => Err(ProtocolError::UnexpectedPacket {
            state: ProtocolState::Status.name(),
            packet: format!("{other:?}"),
        }),
    }
}

/// Runs one offline-mode login through to the registry blob.
///
/// Handshakes with the resolved protocol version, logs in with the configured
/// username and a freshly generated random UUID, honors compression
/// negotiation, acknowledges login, and returns the raw payload of the first
/// RegistryData packet. That packet is the sole success exit.
///
/// # Errors
/// - `EncryptionRequired` if the server is not in offline mode
/// - `Disconnected` with the flattened reason if the server refuses us
/// - `UnknownPacket`/`UnexpectedPacket` on anything outside the catalog
/// - connection-level failures at any point
#[instrument(skip(config))]
pub async fn run_session(
    address: &str,
    port: u16,
    protocol_version: i32,
    config: &ClientConfig,
) -> Result<Vec<u8>> {
    let mut conn = Connection::connect(address, port, config).await?;
    let result = login_and_capture(&mut conn, address, port, protocol_version, config).await;
    if let Err(e) = conn.close().await {
        warn!(error = %e, "Error closing session connection");
    }
    result
}

async fn login_and_capture(
    conn: &mut Connection,
    address: &str,
    port: u16,
    protocol_version: i32,
    config: &ClientConfig,
) -> Result<Vec<u8>> {
    conn.send(ServerboundPacket::Handshake {
        protocol_version,
        server_address: address.to_string(),
        server_port: port,
        next_state: NextState::Login,
    })
    .await?;
    conn.set_state(ProtocolState::Login);

    // The UUID only needs to be unique: it names an offline-mode session,
    // not a real account.
    let session_uuid = Uuid::new_v4();
    conn.send(ServerboundPacket::LoginStart {
        username: config.username.clone(),
        uuid: session_uuid,
    })
    .await?;

    // Login loop: the server chooses the order of compression negotiation,
    // success, and refusal.
    loop {
        match conn.recv().await? {
            ClientboundPacket::LoginSuccess { .. } => break,
            ClientboundPacket::LoginEncryptionRequest { .. } => {
                return Err(ProtocolError::EncryptionRequired);
            }
            ClientboundPacket::LoginSetCompression { threshold } => {
                conn.set_compression_threshold(threshold);
            }
            ClientboundPacket::LoginDisconnect { reason } => {
                return Err(ProtocolError::Disconnected(reason.flatten()));
            }
            ClientboundPacket::Unknown { id } => {
                return Err(ProtocolError::UnknownPacket {
                    state: ProtocolState::Login.name(),
                    id,
                });
            }
            other => {
                return Err(ProtocolError::UnexpectedPacket {
                    state: ProtocolState::Login.name(),
                    packet: format!("{other:?}"),
                });
            }
        }
    }

    conn.send(ServerboundPacket::LoginAcknowledged).await?;
    conn.set_state(ProtocolState::Configuration);
    info!("Login phase done");

    // Configuration loop: this client stops at the first registry blob and
    // never acknowledges the rest of the configuration exchange.
    loop {
        match conn.recv().await? {
            ClientboundPacket::RegistryData { payload } => {
                info!(bytes = payload.len(), "Received registry data");
                return Ok(payload.to_vec());
            }
            ClientboundPacket::Unknown { id } => {
                return Err(ProtocolError::UnknownPacket {
                    state: ProtocolState::Configuration.name(),
                    id,
                });
            }
            other => {
                return Err(ProtocolError::UnexpectedPacket {
                    state: ProtocolState::Configuration.name(),
                    packet: format!("{other:?}"),
                });
            }
        }
    }
}
