//! The status document returned during the Status state.
//!
//! Only the nested protocol-version integer matters to this client; the rest
//! of the document (player counts, favicon, description) is ignored.

use crate::error::{ProtocolError, Result};
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct StatusDocument {
    pub version: StatusVersion,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatusVersion {
    pub protocol: i32,
}

/// Extracts `version.protocol` from a raw status response document.
///
/// # Errors
/// Returns `ProtocolError::MalformedStatus` when the document is not valid
/// JSON or the field is missing or the wrong type.
pub fn protocol_version(json: &str) -> Result<i32> {
    let document: StatusDocument = serde_json::from_str(json)
        .map_err(|e| ProtocolError::MalformedStatus(e.to_string()))?;
    Ok(document.version.protocol)
}
