//! Persisting the captured registry blob.
//!
//! The payload is written verbatim: no header, no framing, no parsing. The
//! write goes to a temporary sibling first and is renamed over the
//! destination, so a crash mid-write never leaves a truncated file at the
//! final path.

use crate::error::Result;
use std::path::Path;
use tracing::{debug, instrument};

/// Writes `payload` to `path`, replacing any existing content atomically.
#[instrument(skip(payload), fields(bytes = payload.len()))]
pub async fn persist_blob(path: &Path, payload: &[u8]) -> Result<()> {
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = Path::new(&tmp);

    tokio::fs::write(tmp, payload).await?;
    tokio::fs::rename(tmp, path).await?;
    debug!(path = %path.display(), "Blob persisted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("nbt-dumper-test-{}-{name}", std::process::id()))
    }

    #[tokio::test]
    async fn writes_payload_verbatim() {
        let path = scratch_path("verbatim.bin");
        persist_blob(&path, b"\x0A\x00\x00").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"\x0A\x00\x00");
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let path = scratch_path("overwrite.bin");
        std::fs::write(&path, b"old stale content").unwrap();
        persist_blob(&path, b"new").await.unwrap();
        assert_eq!(std::fs::read(&path).unwrap(), b"new");
        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn leaves_no_temp_file_behind() {
        let path = scratch_path("clean.bin");
        persist_blob(&path, b"data").await.unwrap();
        let mut tmp = path.as_os_str().to_owned();
        tmp.push(".tmp");
        assert!(!Path::new(&tmp).exists());
        std::fs::remove_file(&path).ok();
    }
}
