//! # Utility Modules
//!
//! Supporting utilities for compression, logging, and timeouts.
//!
//! ## Components
//! - **Compression**: zlib with declared-size validation
//! - **Logging**: tracing subscriber initialization for the binary
//! - **Timeout**: async timeout wrappers

pub mod compression;
pub mod logging;
pub mod timeout;
