//! curl command interpretation.
//!
//! The pipeline is tokenizer → dispatcher → resolver; each stage hands its
//! output to the next by value and never calls back into an earlier one.

pub mod dispatcher;
pub mod resolver;
pub mod tokenizer;
pub mod types;

pub use dispatcher::dispatch;
pub use resolver::resolve;
pub use tokenizer::tokenize;
pub use types::*;

use crate::error::ParseError;

/// Parses a pasted curl command into a request descriptor.
pub fn parse_curl(input: &str) -> Result<RequestDescriptor, ParseError> {
    let tokens = tokenize(input.trim());
    let draft = dispatch(&tokens)?;
    resolve(draft)
}
