//! Primitive readers and writers for the wire format.
//!
//! The protocol encodes everything from varints: packet identities, lengths,
//! string prefixes. `PacketReader` walks a decoded frame body with explicit
//! bounds checks; `PacketWriter` builds one into a [`BytesMut`].

use crate::error::{ProtocolError, Result};
use bytes::{Bytes, BytesMut};
use uuid::Uuid;

/// Longest legal varint encoding of an i32.
pub const MAX_VARINT_LEN: usize = 5;

/// A cursor over a packet body with bounds-checked reads.
pub struct PacketReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> PacketReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Number of unread bytes.
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    fn read_byte(&mut self) -> Result<u8> {
        let byte = *self
            .buf
            .get(self.pos)
            .ok_or_else(|| ProtocolError::MalformedPacket("unexpected end of packet".into()))?;
        self.pos += 1;
        Ok(byte)
    }

    /// Reads a variable-length i32: 7-bit groups, low group first,
    /// continuation high bit, at most five bytes.
    pub fn read_varint(&mut self) -> Result<i32> {
        let mut result: i32 = 0;
        for i in 0..MAX_VARINT_LEN {
            let byte = self.read_byte()?;
            result |= ((byte & 0x7F) as i32) << (7 * i);
            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }
        Err(ProtocolError::MalformedPacket("varint too long".into()))
    }

    /// Reads a big-endian u16.
    pub fn read_u16(&mut self) -> Result<u16> {
        let high = self.read_byte()?;
        let low = self.read_byte()?;
        Ok(((high as u16) << 8) | low as u16)
    }

    /// Reads `len` raw bytes.
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        if self.remaining() < len {
            return Err(ProtocolError::MalformedPacket(format!(
                "expected {len} more bytes, {} remain",
                self.remaining()
            )));
        }
        let slice = &self.buf[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    /// Reads a varint-length-prefixed UTF-8 string.
    pub fn read_string(&mut self) -> Result<String> {
        let len = self.read_varint()?;
        if len < 0 {
            return Err(ProtocolError::MalformedPacket(
                "negative string length".into(),
            ));
        }
        let bytes = self.read_bytes(len as usize)?;
        String::from_utf8(bytes.to_vec())
            .map_err(|_| ProtocolError::MalformedPacket("string is not valid UTF-8".into()))
    }

    /// Reads a 16-byte big-endian UUID.
    pub fn read_uuid(&mut self) -> Result<Uuid> {
        let bytes = self.read_bytes(16)?;
        let mut raw = [0u8; 16];
        raw.copy_from_slice(bytes);
        Ok(Uuid::from_bytes(raw))
    }

    /// Consumes and returns every unread byte.
    pub fn read_remaining(&mut self) -> &'a [u8] {
        let slice = &self.buf[self.pos..];
        self.pos = self.buf.len();
        slice
    }

    /// Fails unless the whole body has been consumed.
    pub fn expect_empty(&self) -> Result<()> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(ProtocolError::MalformedPacket(format!(
                "{} trailing bytes after packet body",
                self.remaining()
            )))
        }
    }
}

/// Builds a packet body.
#[derive(Default)]
pub struct PacketWriter {
    buf: BytesMut,
}

impl PacketWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_varint(&mut self, value: i32) {
        write_varint(&mut self.buf, value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub fn write_string(&mut self, value: &str) {
        self.write_varint(value.len() as i32);
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn write_uuid(&mut self, value: &Uuid) {
        self.buf.extend_from_slice(value.as_bytes());
    }

    pub fn write_bytes(&mut self, value: &[u8]) {
        self.buf.extend_from_slice(value);
    }

    pub fn into_bytes(self) -> Bytes {
        self.buf.freeze()
    }
}

/// Appends the varint encoding of `value` to `buf`.
pub fn write_varint(buf: &mut BytesMut, value: i32) {
    let mut value = value as u32;
    loop {
        let mut byte = (value & 0x7F) as u8;
        value >>= 7;
        if value != 0 {
            byte |= 0x80;
        }
        buf.extend_from_slice(&[byte]);
        if value == 0 {
            return;
        }
    }
}

/// Attempts to decode a varint from the front of `buf` without consuming it.
///
/// Returns `Ok(None)` when more bytes are needed, `Ok(Some((value, len)))`
/// once a complete encoding is present.
pub fn peek_varint(buf: &[u8]) -> Result<Option<(i32, usize)>> {
    let mut result: i32 = 0;
    for i in 0..MAX_VARINT_LEN {
        let Some(&byte) = buf.get(i) else {
            return Ok(None);
        };
        result |= ((byte & 0x7F) as i32) << (7 * i);
        if byte & 0x80 == 0 {
            return Ok(Some((result, i + 1)));
        }
    }
    Err(ProtocolError::MalformedPacket("varint too long".into()))
}

/// Size of the varint encoding of `value`.
pub fn varint_len(value: i32) -> usize {
    match value {
        0..=0x7F => 1,
        0x80..=0x3FFF => 2,
        0x4000..=0x1F_FFFF => 3,
        0x20_0000..=0xFFF_FFFF => 4,
        _ => 5,
    }
}
