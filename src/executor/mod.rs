pub mod client;
pub mod envelope;
pub mod service;

pub use client::{
    execute_request, execute_with_cancel, proxied_url, send_curl_request, CredentialsMode,
    ExecuteOptions, DEFAULT_TIMEOUT,
};
pub use envelope::{ResponseEnvelope, MAX_BODY_BYTES};
pub use service::{CurlService, HttpCurlService};
