//! HTTP transport to the scoring service.

mod http;

pub use http::{HttpReply, HttpTransport, TransportError};
