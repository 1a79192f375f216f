//! Upload proxy - forwards image uploads to the hidden solver backend
//!
//! The client never learns the backend origin; it talks to this gateway,
//! which buffers the upload and re-issues it as a fresh POST.

mod backend;
mod errors;
mod forwarder;
mod types;

pub use backend::BackendClient;
pub use errors::ProxyError;
pub use forwarder::UploadForwarder;
pub use types::{BodyError, InboundUpload, Relay, RelayBody, UploadBody};
