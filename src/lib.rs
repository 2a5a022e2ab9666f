pub mod config;
pub mod curl;
pub mod error;
pub mod executor;
pub mod routes;
pub mod shared;

pub use config::Config;
pub use curl::{parse_curl, ParseOutcome, RequestDescriptor};
pub use error::{ExecuteError, ParseError};
pub use executor::{execute_request, send_curl_request, ExecuteOptions, ResponseEnvelope};
