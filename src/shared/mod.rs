//! Helpers shared by the parser and the executor.

pub mod encoding;

pub use encoding::encode_uri_component;
