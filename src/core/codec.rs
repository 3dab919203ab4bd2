//! Tokio codec for the varint-length-prefixed frame format.
//!
//! One [`Frame`] carries exactly one packet body (identity varint plus
//! fields). The codec owns the session compression threshold: once the server
//! sets it during Login, every later frame in either direction is compressed
//! mode. Threshold changes only ever happen between frames, which is exactly
//! the granularity `Framed` consults the codec at.
//!
//! Wire layout, uncompressed mode (threshold < 0):
//! ```text
//! [varint body_len] [body]
//! ```
//!
//! Wire layout, compressed mode (threshold >= 0):
//! ```text
//! [varint frame_len] [varint data_len] [payload]
//! ```
//! where `data_len == 0` marks a body that stayed below the threshold and is
//! carried raw, and any other value is the uncompressed size of the
//! zlib-deflated `payload`.

use crate::core::buffer::{peek_varint, write_varint, varint_len};
use crate::error::{ProtocolError, Result};
use crate::utils::compression;
use bytes::{Buf, Bytes, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

/// Maximum size of a frame body. The protocol caps packets at 2^21 - 1 bytes;
/// anything larger is rejected before allocation.
pub const MAX_FRAME_SIZE: usize = (1 << 21) - 1;

/// One decoded packet body: identity varint followed by its fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub body: Bytes,
}

/// Codec for the length-prefixed, optionally zlib-compressed frame format.
pub struct MinecraftCodec {
    compression_threshold: i32,
}

impl MinecraftCodec {
    /// Creates a codec with compression disabled.
    pub fn new() -> Self {
        Self {
            compression_threshold: -1,
        }
    }

    /// Sets the session compression threshold. Negative disables compression.
    ///
    /// Takes effect at the next frame boundary in both directions.
    pub fn set_compression_threshold(&mut self, threshold: i32) {
        self.compression_threshold = threshold;
    }

    pub fn compression_threshold(&self) -> i32 {
        self.compression_threshold
    }
}

impl Default for MinecraftCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for MinecraftCodec {
    type Item = Frame;
    type Error = ProtocolError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        // Length prefix may itself arrive in pieces.
        let Some((frame_len, prefix_len)) = peek_varint(src)? else {
            return Ok(None);
        };
        if frame_len < 0 {
            return Err(ProtocolError::MalformedPacket(
                "negative frame length".into(),
            ));
        }
        let frame_len = frame_len as usize;
        if frame_len > MAX_FRAME_SIZE {
            return Err(ProtocolError::OversizedFrame(frame_len));
        }
        if src.len() < prefix_len + frame_len {
            src.reserve(prefix_len + frame_len - src.len());
            return Ok(None);
        }

        src.advance(prefix_len);
        let frame = src.split_to(frame_len);

        if self.compression_threshold < 0 {
            return Ok(Some(Frame {
                body: frame.freeze(),
            }));
        }

        // Compressed mode: a data-length header precedes the payload.
        let Some((data_len, data_prefix_len)) = peek_varint(&frame)? else {
            return Err(ProtocolError::MalformedPacket(
                "truncated data length header".into(),
            ));
        };
        if data_len < 0 {
            return Err(ProtocolError::MalformedPacket(
                "negative data length".into(),
            ));
        }
        let payload = &frame[data_prefix_len..];

        if data_len == 0 {
            // Body was below the threshold and travelled raw.
            return Ok(Some(Frame {
                body: Bytes::copy_from_slice(payload),
            }));
        }

        let body = compression::decompress(payload, data_len as usize)?;
        Ok(Some(Frame {
            body: Bytes::from(body),
        }))
    }
}

impl Encoder<Frame> for MinecraftCodec {
    type Error = ProtocolError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        let body = frame.body;
        if body.len() > MAX_FRAME_SIZE {
            return Err(ProtocolError::OversizedFrame(body.len()));
        }

        if self.compression_threshold < 0 {
            write_varint(dst, body.len() as i32);
            dst.extend_from_slice(&body);
            return Ok(());
        }

        if body.len() >= self.compression_threshold as usize {
            let compressed = compression::compress(&body)?;
            let data_len = body.len() as i32;
            write_varint(dst, (varint_len(data_len) + compressed.len()) as i32);
            write_varint(dst, data_len);
            dst.extend_from_slice(&compressed);
        } else {
            // Below the threshold: data length of zero, raw body.
            write_varint(dst, body.len() as i32 + 1);
            write_varint(dst, 0);
            dst.extend_from_slice(&body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip_with_threshold(body: &[u8], threshold: i32) -> Frame {
        let mut codec = MinecraftCodec::new();
        codec.set_compression_threshold(threshold);
        let mut wire = BytesMut::new();
        codec
            .encode(
                Frame {
                    body: Bytes::copy_from_slice(body),
                },
                &mut wire,
            )
            .unwrap();
        let frame = codec.decode(&mut wire).unwrap().expect("complete frame");
        assert!(wire.is_empty(), "decoder must consume the whole frame");
        frame
    }

    #[test]
    fn uncompressed_roundtrip() {
        let frame = roundtrip_with_threshold(b"\x00hello", -1);
        assert_eq!(&frame.body[..], b"\x00hello");
    }

    #[test]
    fn compressed_mode_small_body_travels_raw() {
        let body = b"\x03tiny";
        let frame = roundtrip_with_threshold(body, 256);

        // Verify the wire form: frame_len, data_len == 0, raw body.
        let mut codec = MinecraftCodec::new();
        codec.set_compression_threshold(256);
        let mut wire = BytesMut::new();
        codec
            .encode(
                Frame {
                    body: Bytes::copy_from_slice(body),
                },
                &mut wire,
            )
            .unwrap();
        assert_eq!(wire[1], 0, "data length must be zero for raw bodies");

        assert_eq!(&frame.body[..], body);
    }

    #[test]
    fn compressed_mode_large_body_roundtrip() {
        let body = vec![0x42u8; 4096];
        let frame = roundtrip_with_threshold(&body, 256);
        assert_eq!(&frame.body[..], &body[..]);
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        // A body exactly at the threshold must be compressed.
        let body = vec![7u8; 64];
        let mut codec = MinecraftCodec::new();
        codec.set_compression_threshold(64);
        let mut wire = BytesMut::new();
        codec
            .encode(
                Frame {
                    body: Bytes::copy_from_slice(&body),
                },
                &mut wire,
            )
            .unwrap();
        // Second varint is the uncompressed data length, not zero.
        let (_, prefix) = peek_varint(&wire).unwrap().unwrap();
        let (data_len, _) = peek_varint(&wire[prefix..]).unwrap().unwrap();
        assert_eq!(data_len, 64);
    }

    #[test]
    fn partial_input_yields_none() {
        let mut codec = MinecraftCodec::new();
        let mut wire = BytesMut::new();
        codec
            .encode(
                Frame {
                    body: Bytes::from_static(b"\x00some packet body"),
                },
                &mut wire,
            )
            .unwrap();

        let mut partial = BytesMut::new();
        for &byte in wire.iter() {
            assert!(codec.decode(&mut partial.clone()).is_ok());
            partial.extend_from_slice(&[byte]);
        }
        let frame = codec.decode(&mut partial).unwrap().expect("complete");
        assert_eq!(&frame.body[..], b"\x00some packet body");
    }

    #[test]
    fn oversized_frame_rejected() {
        let mut codec = MinecraftCodec::new();
        let mut wire = BytesMut::new();
        // Claim a frame far past MAX_FRAME_SIZE.
        write_varint(&mut wire, (MAX_FRAME_SIZE as i32) + 1);
        assert!(matches!(
            codec.decode(&mut wire),
            Err(ProtocolError::OversizedFrame(_))
        ));
    }

    #[test]
    fn two_frames_in_one_read() {
        let mut codec = MinecraftCodec::new();
        let mut wire = BytesMut::new();
        for body in [&b"\x00first"[..], &b"\x01second"[..]] {
            codec
                .encode(
                    Frame {
                        body: Bytes::copy_from_slice(body),
                    },
                    &mut wire,
                )
                .unwrap();
        }
        let first = codec.decode(&mut wire).unwrap().unwrap();
        let second = codec.decode(&mut wire).unwrap().unwrap();
        assert_eq!(&first.body[..], b"\x00first");
        assert_eq!(&second.body[..], b"\x01second");
        assert!(codec.decode(&mut wire).unwrap().is_none());
    }
}
