//! Response normalization.
//!
//! Every execution produces exactly one [`ResponseEnvelope`], whether the
//! call completed or failed at the transport level.

use serde::Serialize;
use serde_json::Value;

/// Largest response text kept in an envelope, in bytes.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub success: bool,
    pub status: Option<u16>,
    pub text: String,
    pub data: Option<Value>,
    pub truncated: bool,
    pub non_json: bool,
    pub error: String,
}

impl Default for ResponseEnvelope {
    fn default() -> Self {
        Self {
            success: false,
            status: None,
            text: String::new(),
            data: None,
            truncated: false,
            non_json: false,
            error: String::new(),
        }
    }
}

impl ResponseEnvelope {
    /// Envelope for a call that never produced a response.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
            ..Default::default()
        }
    }

    /// Envelope for a completed response, whatever its status.
    ///
    /// Bodies over [`MAX_BODY_BYTES`] are cut and reported as non-JSON
    /// without a parse attempt.
    pub fn from_body(status: u16, body: &[u8]) -> Self {
        let mut text = String::from_utf8_lossy(body).into_owned();
        let mut envelope = Self {
            success: true,
            status: Some(status),
            ..Default::default()
        };

        if text.len() > MAX_BODY_BYTES {
            truncate_at_boundary(&mut text, MAX_BODY_BYTES);
            envelope.text = text;
            envelope.truncated = true;
            envelope.non_json = true;
            return envelope;
        }

        match serde_json::from_str::<Value>(&text) {
            Ok(data) => envelope.data = Some(data),
            Err(_) => envelope.non_json = true,
        }
        envelope.text = text;
        envelope
    }
}

/// Truncates to at most `max` bytes without splitting a character.
fn truncate_at_boundary(text: &mut String, max: usize) {
    let mut cut = max;
    while !text.is_char_boundary(cut) {
        cut -= 1;
    }
    text.truncate(cut);
}
