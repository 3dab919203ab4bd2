//! # Core Wire Components
//!
//! Low-level framing and binary primitives.
//!
//! This module is the packet codec boundary: it turns typed packet bodies
//! into length-prefixed (optionally zlib-compressed) frames and back, and
//! provides the varint/string/UUID primitives the packet catalog is encoded
//! with. Nothing here knows what a packet *means*; that lives in
//! [`crate::protocol`].

pub mod buffer;
pub mod codec;
