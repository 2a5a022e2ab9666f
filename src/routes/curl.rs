use axum::{extract::State, Json};
use serde::Deserialize;

use super::SharedService;
use crate::curl::ParseOutcome;
use crate::error::ParseError;
use crate::executor::ResponseEnvelope;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurlCommand {
    pub curl_command: String,
    #[serde(default)]
    pub proxy: Option<String>,
}

pub async fn parse_command(
    State(service): State<SharedService>,
    Json(command): Json<CurlCommand>,
) -> Result<Json<ParseOutcome>, ParseError> {
    let request = service.parse(&command.curl_command)?;
    tracing::debug!(method = %request.method, url = %request.url, "Parsed curl command");
    Ok(Json(ParseOutcome::from(Ok(request))))
}

pub async fn execute_command(
    State(service): State<SharedService>,
    Json(command): Json<CurlCommand>,
) -> Json<ResponseEnvelope> {
    tracing::debug!(proxy = ?command.proxy, "Executing curl command");

    let response = service.execute(command.curl_command, command.proxy).await;

    if response.success {
        tracing::debug!(status = ?response.status, "Command succeeded");
    } else {
        tracing::warn!(error = %response.error, "Command failed");
    }

    Json(response)
}
