//! Turns a finished [`RequestDraft`] into a [`RequestDescriptor`].
//!
//! The steps run in a fixed order: body encoding, method defaulting, `-G`
//! query folding, then basic auth.

use base64::Engine;
use serde_json::Value;
use url::form_urlencoded;

use super::types::{BodyType, RequestBody, RequestDescriptor, RequestDraft};
use crate::error::ParseError;
use crate::shared::encode_uri_component;

const CONTENT_TYPE: &str = "Content-Type";

pub fn resolve(mut draft: RequestDraft) -> Result<RequestDescriptor, ParseError> {
    if draft.url.is_empty() {
        return Err(ParseError::MissingUrl);
    }

    let joined = draft.joined_body();
    let mut body = match draft.body_type {
        BodyType::Multipart => {
            draft.headers.set(CONTENT_TYPE, "multipart/form-data");
            Some(RequestBody::Form(std::mem::take(&mut draft.form_fields)))
        }
        BodyType::Urlencoded => {
            draft
                .headers
                .set_default(CONTENT_TYPE, "application/x-www-form-urlencoded");
            joined.map(RequestBody::Text)
        }
        BodyType::Raw => joined.map(|raw| match serde_json::from_str::<Value>(&raw) {
            Ok(json) => {
                draft.headers.set_default(CONTENT_TYPE, "application/json");
                RequestBody::Json(json)
            }
            Err(_) => RequestBody::Text(raw),
        }),
        BodyType::None => None,
    };

    if !draft.explicit_method_set && body.is_some() && !draft.get_mode {
        draft.method = "POST".to_string();
    }

    if draft.get_mode {
        body = match body {
            Some(RequestBody::Text(text)) => {
                append_query(&mut draft.url, &text);
                None
            }
            Some(RequestBody::Json(json)) => {
                append_query(&mut draft.url, &json_query(&json));
                None
            }
            other => other,
        };
    }

    if let Some(credential) = draft.auth_credential.as_deref().filter(|c| !c.is_empty()) {
        if !draft.headers.contains("Authorization") {
            let value = basic_auth(credential);
            draft.headers.set("Authorization", value);
        }
    }

    Ok(RequestDescriptor {
        method: draft.method,
        url: draft.url,
        headers: draft.headers,
        body,
        body_type: draft.body_type,
    })
}

fn append_query(url: &mut String, query: &str) {
    url.push(if url.contains('?') { '&' } else { '?' });
    url.push_str(query);
}

/// Objects become `key=value` pairs in document order, strings are used
/// verbatim, any other JSON value as its compact text.
fn json_query(json: &Value) -> String {
    match json {
        Value::Object(entries) => {
            let mut query = form_urlencoded::Serializer::new(String::new());
            for (key, value) in entries {
                match value {
                    Value::String(s) => query.append_pair(key, s),
                    other => query.append_pair(key, &other.to_string()),
                };
            }
            query.finish()
        }
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// `Basic base64(enc(user):enc(pass))`, splitting on the first `:`.
fn basic_auth(credential: &str) -> String {
    let (user, pass) = credential.split_once(':').unwrap_or((credential, ""));
    let pair = format!("{}:{}", encode_uri_component(user), encode_uri_component(pass));
    format!(
        "Basic {}",
        base64::engine::general_purpose::STANDARD.encode(pair)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curl::types::{FormField, FormValue};
    use serde_json::json;

    fn draft(url: &str) -> RequestDraft {
        RequestDraft {
            url: url.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_missing_url() {
        assert_eq!(resolve(RequestDraft::default()), Err(ParseError::MissingUrl));
    }

    #[test]
    fn test_no_body_stays_get() {
        let d = resolve(draft("https://a.b")).unwrap();
        assert_eq!(d.method, "GET");
        assert_eq!(d.body, None);
        assert_eq!(d.body_type, BodyType::None);
        assert!(d.headers.is_empty());
    }

    #[test]
    fn test_raw_json_body() {
        let mut d = draft("https://a.b");
        d.push_fragment("", r#"{"a":1}"#.to_string());
        d.body_type = BodyType::Raw;
        let r = resolve(d).unwrap();
        assert_eq!(r.body, Some(RequestBody::Json(json!({"a": 1}))));
        assert_eq!(r.headers.get("Content-Type"), Some("application/json"));
        assert_eq!(r.method, "POST");
    }

    #[test]
    fn test_raw_json_keeps_explicit_content_type() {
        let mut d = draft("https://a.b");
        d.headers.set("content-type", "application/vnd.api+json");
        d.push_fragment("", "[1,2]".to_string());
        d.body_type = BodyType::Raw;
        let r = resolve(d).unwrap();
        assert_eq!(r.headers.len(), 1);
        assert_eq!(r.headers.get("Content-Type"), Some("application/vnd.api+json"));
    }

    #[test]
    fn test_raw_text_body_has_no_content_type() {
        let mut d = draft("https://a.b");
        d.push_fragment("", "q=1".to_string());
        d.body_type = BodyType::Raw;
        let r = resolve(d).unwrap();
        assert_eq!(r.body, Some(RequestBody::Text("q=1".to_string())));
        assert!(!r.headers.contains("Content-Type"));
    }

    #[test]
    fn test_urlencoded_default_content_type() {
        let mut d = draft("https://a.b");
        d.push_fragment("&", "a=1".to_string());
        d.body_type = BodyType::Urlencoded;
        let r = resolve(d).unwrap();
        assert_eq!(r.body, Some(RequestBody::Text("a=1".to_string())));
        assert_eq!(
            r.headers.get("Content-Type"),
            Some("application/x-www-form-urlencoded")
        );
    }

    #[test]
    fn test_multipart_forces_content_type() {
        let mut d = draft("https://a.b");
        d.headers.set("Content-Type", "text/plain");
        d.form_fields.push(FormField {
            key: "a".to_string(),
            value: FormValue::Text("1".to_string()),
        });
        d.body_type = BodyType::Multipart;
        let r = resolve(d).unwrap();
        assert_eq!(r.headers.get("Content-Type"), Some("multipart/form-data"));
        assert_eq!(r.method, "POST");
        assert!(matches!(r.body, Some(RequestBody::Form(ref f)) if f.len() == 1));
    }

    #[test]
    fn test_explicit_method_is_kept() {
        let mut d = draft("https://a.b");
        d.method = "PUT".to_string();
        d.explicit_method_set = true;
        d.push_fragment("", "x".to_string());
        d.body_type = BodyType::Raw;
        assert_eq!(resolve(d).unwrap().method, "PUT");
    }

    #[test]
    fn test_get_mode_folds_text_body() {
        let mut d = draft("https://a.b/c?x=0");
        d.get_mode = true;
        d.push_fragment("", "q=1".to_string());
        d.body_type = BodyType::Raw;
        let r = resolve(d).unwrap();
        assert_eq!(r.url, "https://a.b/c?x=0&q=1");
        assert_eq!(r.body, None);
        assert_eq!(r.method, "GET");
    }

    #[test]
    fn test_get_mode_folds_json_object() {
        let mut d = draft("https://a.b");
        d.get_mode = true;
        d.push_fragment("", r#"{"q":"a b","n":2}"#.to_string());
        d.body_type = BodyType::Raw;
        let r = resolve(d).unwrap();
        assert_eq!(r.url, "https://a.b?q=a+b&n=2");
    }

    #[test]
    fn test_get_mode_folds_json_string_verbatim() {
        let mut d = draft("https://a.b");
        d.get_mode = true;
        d.push_fragment("", r#""abc""#.to_string());
        d.body_type = BodyType::Raw;
        let r = resolve(d).unwrap();
        assert_eq!(r.url, "https://a.b?abc");
        assert_eq!(r.body, None);
    }

    #[test]
    fn test_get_mode_leaves_multipart_alone() {
        let mut d = draft("https://a.b");
        d.get_mode = true;
        d.body_type = BodyType::Multipart;
        let r = resolve(d).unwrap();
        assert_eq!(r.url, "https://a.b");
        assert_eq!(r.body, Some(RequestBody::Form(Vec::new())));
        assert_eq!(r.method, "GET");
    }

    #[test]
    fn test_basic_auth() {
        let mut d = draft("https://a.b");
        d.auth_credential = Some("alice:secret".to_string());
        let r = resolve(d).unwrap();
        assert_eq!(r.headers.get("Authorization"), Some("Basic YWxpY2U6c2VjcmV0"));
    }

    #[test]
    fn test_basic_auth_without_password_and_with_reserved_chars() {
        let mut d = draft("https://a.b");
        d.auth_credential = Some("bob".to_string());
        let r = resolve(d).unwrap();
        // base64("bob:")
        assert_eq!(r.headers.get("Authorization"), Some("Basic Ym9iOg=="));

        let mut d = draft("https://a.b");
        d.auth_credential = Some("a@b:p:w".to_string());
        let r = resolve(d).unwrap();
        // base64("a%40b:p%3Aw")
        assert_eq!(r.headers.get("Authorization"), Some("Basic YSU0MGI6cCUzQXc="));
    }

    #[test]
    fn test_explicit_authorization_header_wins() {
        let mut d = draft("https://a.b");
        d.headers.set("authorization", "Bearer t");
        d.auth_credential = Some("alice:secret".to_string());
        let r = resolve(d).unwrap();
        assert_eq!(r.headers.get("Authorization"), Some("Bearer t"));
        assert_eq!(r.headers.len(), 1);
    }
}
