//! Content representation for object transfers.
//!
//! - [`mime`] maps file extensions to MIME types and classifies text vs binary
//! - [`normalizer`] turns upload payloads (text, base64, local path) into bytes
//! - [`selector`] decides whether a download is returned inline or written to a file

pub mod mime;
pub mod normalizer;
pub mod selector;

pub use mime::{infer_content_type, is_text_like, OCTET_STREAM};
pub use normalizer::{normalize, ContentEncoding, NormalizedPayload};
pub use selector::{deliver, select_mode, DownloadOutcome, ResponseMode};
