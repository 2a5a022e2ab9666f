//! Maps curl options onto a [`RequestDraft`].
//!
//! Tokens are consumed strictly left to right through a [`Cursor`]. An option
//! that takes an argument pulls it off the cursor, so an argument can never be
//! claimed a second time as the URL.

use super::types::{BodyType, FormField, FormValue, RequestDraft};
use crate::error::ParseError;
use crate::shared::encode_uri_component;

/// Positional reader over the token list.
struct Cursor<'a> {
    tokens: &'a [String],
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(tokens: &'a [String], pos: usize) -> Self {
        Self { tokens, pos }
    }

    fn next(&mut self) -> Option<&'a str> {
        let token = self.tokens.get(self.pos)?;
        self.pos += 1;
        Some(token.as_str())
    }

    /// Argument of the option just read. A missing argument reads as "".
    fn argument(&mut self) -> &'a str {
        self.next().unwrap_or("")
    }

    fn exhausted(&self) -> bool {
        self.pos >= self.tokens.len()
    }
}

/// Walks `tokens` and accumulates the request they describe.
///
/// The first token must be exactly `curl`. Unknown options are skipped
/// without consuming an argument.
pub fn dispatch(tokens: &[String]) -> Result<RequestDraft, ParseError> {
    match tokens.first() {
        None => return Err(ParseError::EmptyInput),
        Some(first) if first != "curl" => return Err(ParseError::InvalidCommand),
        Some(_) => {}
    }

    let mut draft = RequestDraft::default();
    let mut cursor = Cursor::new(tokens, 1);

    while let Some(token) = cursor.next() {
        match token {
            "-X" | "--request" => {
                let method = cursor.argument();
                draft.method = if method.is_empty() {
                    "GET".to_string()
                } else {
                    method.to_uppercase()
                };
                draft.explicit_method_set = true;
            }
            "-H" | "--header" => {
                if let Some((name, value)) = cursor.argument().split_once(':') {
                    draft.headers.set(name.trim(), value.trim());
                }
            }
            "-d" | "--data" | "--data-raw" | "--data-binary" => {
                let data = cursor.argument();
                draft.push_fragment("", data.to_string());
                draft.body_type = BodyType::Raw;
            }
            "--data-urlencode" => {
                let part = urlencode_argument(cursor.argument());
                draft.push_fragment("&", part);
                draft.body_type = BodyType::Urlencoded;
            }
            "-G" | "--get" => draft.get_mode = true,
            "-F" | "--form" => {
                if let Some(field) = form_field(cursor.argument()) {
                    draft.form_fields.push(field);
                }
                draft.body_type = BodyType::Multipart;
            }
            "-A" | "--user-agent" => draft.headers.set("User-Agent", cursor.argument()),
            "-e" | "--referer" => draft.headers.set("Referer", cursor.argument()),
            "-b" | "--cookie" => draft.headers.set("Cookie", cursor.argument()),
            "-u" | "--user" => draft.auth_credential = Some(cursor.argument().to_string()),
            _ if is_url(token, &draft, cursor.exhausted()) => draft.url = token.to_string(),
            _ => tracing::trace!(token, "ignoring unsupported curl argument"),
        }
    }

    if draft.url.is_empty() {
        return Err(ParseError::MissingUrl);
    }

    tracing::debug!(
        method = %draft.method,
        url = %draft.url,
        body_type = ?draft.body_type,
        "dispatched curl command"
    );

    Ok(draft)
}

/// Scheme-prefixed words are always the URL; otherwise the final bare word
/// is, provided no URL has been seen yet.
fn is_url(token: &str, draft: &RequestDraft, is_last: bool) -> bool {
    if token.starts_with("http://") || token.starts_with("https://") {
        return true;
    }
    is_last && draft.url.is_empty() && !is_option(token)
}

fn is_option(token: &str) -> bool {
    let mut chars = token.chars();
    chars.next() == Some('-') && matches!(chars.next(), Some(c) if c == '-' || c.is_ascii_alphabetic())
}

/// `name=value` keeps the name literal and encodes the value; anything else
/// is encoded whole.
fn urlencode_argument(arg: &str) -> String {
    match arg.split_once('=') {
        Some((name, value)) => format!("{}={}", name, encode_uri_component(value)),
        None => encode_uri_component(arg),
    }
}

fn form_field(arg: &str) -> Option<FormField> {
    let (key, value) = arg.split_once('=')?;
    let value = match value.strip_prefix('@') {
        Some(file) => FormValue::File {
            file: file.to_string(),
        },
        None => FormValue::Text(value.to_string()),
    };
    Some(FormField {
        key: key.to_string(),
        value,
    })
}
