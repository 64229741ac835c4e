//! Tool-callable gateway for bucket and object operations on Cloudflare R2
//! (or any S3-compatible store).
//!
//! Uploads accept raw text, base64 or a local file path and are normalized
//! into bytes plus a content type. Downloads are returned inline as text or
//! written to a local file depending on the object's type and caller hints.

pub mod bucket;
pub mod config;
pub mod content;
pub mod error;
pub mod object;
pub mod state;
pub mod storage;

pub use crate::error::GatewayError;
pub use crate::state::AppState;

/// Install the `env_logger` backend with an `info` default, overridable via `RUST_LOG`.
/// Calling it more than once is harmless.
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();
}
