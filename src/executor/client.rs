//! Request execution.
//!
//! One descriptor becomes exactly one outbound call on a fresh client. The
//! call is bounded by a hard timeout and can be cancelled by the caller;
//! either way the in-flight future is dropped, which releases its timer and
//! socket.

use reqwest::{
    header::{HeaderName, HeaderValue, CONTENT_TYPE},
    multipart::{Form, Part},
    Client, Method, RequestBuilder,
};
use std::{path::Path, time::Duration};
use tokio_util::sync::CancellationToken;

use super::envelope::ResponseEnvelope;
use crate::curl::{parse_curl, FormField, FormValue, Headers, RequestBody, RequestDescriptor};
use crate::error::ExecuteError;
use crate::shared::encode_uri_component;

/// Default hard timeout for a single call.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Per-call execution settings.
#[derive(Debug, Clone)]
pub struct ExecuteOptions {
    /// Base URL the target is routed through, if any.
    pub proxy: Option<String>,
    pub timeout: Duration,
    /// Read `-F key=@path` files from local disk.
    pub allow_local_files: bool,
}

impl Default for ExecuteOptions {
    fn default() -> Self {
        Self {
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            allow_local_files: false,
        }
    }
}

/// Whether ambient cookies take part in the call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialsMode {
    Include,
    Omit,
}

impl CredentialsMode {
    pub fn for_headers(headers: &Headers) -> Self {
        if headers.contains("Cookie") {
            CredentialsMode::Include
        } else {
            CredentialsMode::Omit
        }
    }
}

/// Routes `target` through `proxy` as `<proxy>/<encoded target>`.
pub fn proxied_url(proxy: &str, target: &str) -> Result<String, ExecuteError> {
    let base = proxy.strip_suffix('/').unwrap_or(proxy);
    let base = url::Url::parse(&format!("{}/", base))
        .map_err(|e| ExecuteError::InvalidRequest(format!("invalid proxy URL {}: {}", proxy, e)))?;
    Ok(format!("{}{}", base, encode_uri_component(target)))
}

/// Targets typed without a scheme are dialled over plain HTTP.
fn dial_target(url: &str) -> String {
    if url.contains("://") {
        url.to_string()
    } else {
        format!("http://{}", url)
    }
}

/// Parses `command` and executes it. Parse failures come back as a failed
/// envelope carrying the parse message.
pub async fn send_curl_request(command: &str, options: &ExecuteOptions) -> ResponseEnvelope {
    match parse_curl(command) {
        Ok(request) => execute_request(&request, options).await,
        Err(e) => {
            tracing::debug!(code = e.code(), "curl command rejected");
            ResponseEnvelope::failure(e.to_string())
        }
    }
}

pub async fn execute_request(request: &RequestDescriptor, options: &ExecuteOptions) -> ResponseEnvelope {
    execute_with_cancel(request, options, &CancellationToken::new()).await
}

/// Executes `request`, giving up with an aborted envelope once `cancel` fires.
pub async fn execute_with_cancel(
    request: &RequestDescriptor,
    options: &ExecuteOptions,
    cancel: &CancellationToken,
) -> ResponseEnvelope {
    tracing::debug!(method = %request.method, url = %request.url, "Executing request");

    match run(request, options, cancel).await {
        Ok(envelope) => {
            tracing::debug!(
                status = ?envelope.status,
                truncated = envelope.truncated,
                non_json = envelope.non_json,
                "Request completed"
            );
            envelope
        }
        Err(e) => {
            tracing::warn!(code = e.code(), error = %e, "Request failed");
            ResponseEnvelope::failure(e.to_string())
        }
    }
}

async fn run(
    request: &RequestDescriptor,
    options: &ExecuteOptions,
    cancel: &CancellationToken,
) -> Result<ResponseEnvelope, ExecuteError> {
    // The proxy receives the URL exactly as typed; only direct calls need a scheme.
    let target = match options.proxy.as_deref().filter(|p| !p.is_empty()) {
        Some(proxy) => proxied_url(proxy, &request.url)?,
        None => dial_target(&request.url),
    };

    let client = build_client(CredentialsMode::for_headers(&request.headers))?;
    let builder = build_request(&client, request, &target, options.allow_local_files).await?;

    let call = async {
        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.bytes().await?;
        Ok::<_, ExecuteError>((status, body))
    };

    let (status, body) = tokio::select! {
        _ = cancel.cancelled() => return Err(ExecuteError::Aborted),
        outcome = tokio::time::timeout(options.timeout, call) => {
            outcome.map_err(|_| ExecuteError::Timeout(options.timeout))??
        }
    };

    Ok(ResponseEnvelope::from_body(status, &body))
}

fn build_client(credentials: CredentialsMode) -> Result<Client, ExecuteError> {
    Client::builder()
        .pool_max_idle_per_host(0)
        .cookie_store(credentials == CredentialsMode::Include)
        .build()
        .map_err(|e| ExecuteError::Transport(format!("failed to build HTTP client: {}", e)))
}

async fn build_request(
    client: &Client,
    request: &RequestDescriptor,
    target: &str,
    allow_local_files: bool,
) -> Result<RequestBuilder, ExecuteError> {
    let method = Method::from_bytes(request.method.as_bytes())
        .map_err(|_| ExecuteError::InvalidRequest(format!("invalid method: {}", request.method)))?;

    // GET and HEAD never carry a body.
    let body = request
        .body
        .as_ref()
        .filter(|_| method != Method::GET && method != Method::HEAD);
    let is_multipart = matches!(body, Some(RequestBody::Form(_)));

    let mut builder = client.request(method, target);

    for (name, value) in request.headers.iter() {
        // reqwest writes the multipart header itself, boundary included.
        if is_multipart && name.eq_ignore_ascii_case("content-type") {
            continue;
        }
        match (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            (Ok(name), Ok(value)) => builder = builder.header(name, value),
            _ => tracing::warn!(header = name, "Skipping invalid header"),
        }
    }

    let builder = match body {
        None => builder,
        Some(RequestBody::Text(text)) => builder.body(text.clone()),
        Some(RequestBody::Json(json)) => {
            let builder = builder.body(json.to_string());
            if request.headers.contains("Content-Type") {
                builder
            } else {
                builder.header(CONTENT_TYPE, "application/json")
            }
        }
        Some(RequestBody::Form(fields)) => builder.multipart(build_form(fields, allow_local_files).await?),
    };

    Ok(builder)
}

async fn build_form(fields: &[FormField], allow_local_files: bool) -> Result<Form, ExecuteError> {
    let mut form = Form::new();

    for field in fields {
        form = match &field.value {
            FormValue::Text(text) => form.text(field.key.clone(), text.clone()),
            FormValue::File { file } if allow_local_files => {
                let bytes = tokio::fs::read(file)
                    .await
                    .map_err(|source| ExecuteError::FormFile {
                        path: file.clone(),
                        source,
                    })?;
                let file_name = Path::new(file)
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file.clone());
                form.part(field.key.clone(), Part::bytes(bytes).file_name(file_name))
            }
            FormValue::File { file } => {
                tracing::warn!(file = %file, "Local files disabled, sending file name as text");
                form.text(field.key.clone(), file.clone())
            }
        };
    }

    Ok(form)
}
