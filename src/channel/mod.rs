//! Method-call channel
//!
//! The boundary a host application talks to: method calls with named
//! arguments in, typed results out, executed off the caller's context.

mod handler;
mod method;
mod service;
mod stdio;

pub use handler::{CertificateSource, MethodCallHandler};
pub use method::{Method, MethodCall, MethodResponse, MethodResult, GET_SERVER_CERTIFICATE};
pub use service::{spawn_channel, ChannelHandle, ChannelMessage};
pub use stdio::serve_json_lines;
