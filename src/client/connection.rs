//! One live connection: a framed TCP stream plus the session state that
//! frames are interpreted under.

use crate::config::ClientConfig;
use crate::core::codec::{Frame, MinecraftCodec};
use crate::error::{ProtocolError, Result};
use crate::protocol::packets::{ClientboundPacket, ServerboundPacket};
use crate::protocol::ProtocolState;
use futures::{SinkExt, StreamExt};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpStream;
use tokio_util::codec::Framed;
use tracing::{debug, instrument};

use crate::utils::timeout::with_timeout_error;

/// A client connection to one server.
///
/// Owns the only mutable session state: the current protocol state, and the
/// compression threshold (held by the codec, so threshold changes land
/// exactly on frame boundaries). Never reused across sessions; terminal
/// outcomes close it.
pub struct Connection {
    framed: Framed<TcpStream, MinecraftCodec>,
    state: ProtocolState,
}

impl Connection {
    /// Opens a fresh transport with a bounded connection timeout. The session
    /// starts in `Handshaking` with compression disabled.
    #[instrument(skip(config))]
    pub async fn connect(address: &str, port: u16, config: &ClientConfig) -> Result<Self> {
        let stream = with_timeout_error(
            async { Ok(TcpStream::connect((address, port)).await?) },
            config.connect_timeout,
        )
        .await?;
        debug!("Connected");

        Ok(Self {
            framed: Framed::new(stream, MinecraftCodec::new()),
            state: ProtocolState::Handshaking,
        })
    }

    pub fn state(&self) -> ProtocolState {
        self.state
    }

    /// Moves the session into a new protocol state.
    pub fn set_state(&mut self, state: ProtocolState) {
        debug!(from = self.state.name(), to = state.name(), "State transition");
        self.state = state;
    }

    /// Updates the session compression threshold. Effective from the next
    /// frame in either direction.
    pub fn set_compression_threshold(&mut self, threshold: i32) {
        debug!(threshold, "Compression threshold updated");
        self.framed.codec_mut().set_compression_threshold(threshold);
    }

    pub fn compression_threshold(&self) -> i32 {
        self.framed.codec().compression_threshold()
    }

    /// Serializes and sends one serverbound packet under the current
    /// compression threshold.
    pub async fn send(&mut self, packet: ServerboundPacket) -> Result<()> {
        debug!(state = self.state.name(), id = packet.id(), "Sending packet");
        self.framed.send(packet.encode()).await
    }

    /// Reads one clientbound frame and decodes it under the current state.
    pub async fn recv(&mut self) -> Result<ClientboundPacket> {
        let frame: Frame = self
            .framed
            .next()
            .await
            .ok_or(ProtocolError::ConnectionClosed)??;
        let packet = ClientboundPacket::decode(self.state, &frame)?;
        debug!(state = self.state.name(), id = packet.id(), "Received packet");
        Ok(packet)
    }

    /// Flushes and shuts the transport down.
    pub async fn close(mut self) -> Result<()> {
        self.framed.flush().await?;
        self.framed.get_mut().shutdown().await?;
        Ok(())
    }
}
