use crate::error::{ProtocolError, Result};
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use std::io::{Read, Write};

/// Maximum output size for decompression. The protocol allows a compressed
/// frame to inflate to at most 8 MiB; anything claiming more is a
/// decompression bomb from a hostile server.
pub const MAX_DECOMPRESSION_SIZE: usize = 8 * 1024 * 1024;

/// Compresses data with zlib deflate at the default level.
///
/// # Errors
/// Returns `ProtocolError::Io` if the encoder fails.
pub fn compress(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// Decompresses zlib data whose uncompressed size was declared on the wire.
///
/// The declared size is validated before and during decompression so a frame
/// can never expand past `MAX_DECOMPRESSION_SIZE` or lie about its length.
///
/// # Errors
/// Returns `ProtocolError::DecompressionFailure` if:
/// - the declared size exceeds `MAX_DECOMPRESSION_SIZE`
/// - the stream is malformed
/// - the output size does not match the declared size
pub fn decompress(data: &[u8], declared_len: usize) -> Result<Vec<u8>> {
    if declared_len > MAX_DECOMPRESSION_SIZE {
        return Err(ProtocolError::DecompressionFailure(format!(
            "declared size {declared_len} exceeds limit {MAX_DECOMPRESSION_SIZE}"
        )));
    }

    let mut out = Vec::with_capacity(declared_len);
    let mut decoder = ZlibDecoder::new(data).take(declared_len as u64 + 1);
    decoder
        .read_to_end(&mut out)
        .map_err(|e| ProtocolError::DecompressionFailure(e.to_string()))?;

    if out.len() != declared_len {
        return Err(ProtocolError::DecompressionFailure(format!(
            "declared size {declared_len} but decompressed to {} bytes",
            out.len()
        )));
    }

    Ok(out)
}
