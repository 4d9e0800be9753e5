//! Request building and response decoding, free of I/O.
//!
//! # Design
//! `build_get` / `build_post` produce an `HttpRequest` for a route, adding
//! the JSON content type and, when asked, the bearer token. The `parse_*`
//! functions check the status and decode the drained body into wire
//! records. The session facade runs a `Transport` between the two, so
//! everything in here is deterministic and tested without a server.

use serde::Serialize;

use crate::error::{ApiError, MissingState};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{Channel, ChannelList, Team};

/// Response header carrying the session token after a successful login.
pub const TOKEN_HEADER: &str = "Token";

const CONTENT_TYPE: (&str, &str) = ("Content-Type", "application/json");

/// Whether a request carries the session's bearer token.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    None,
    Bearer(Option<&'a str>),
}

fn headers(auth: Auth<'_>) -> Result<Vec<(String, String)>, ApiError> {
    let mut headers = vec![(CONTENT_TYPE.0.to_string(), CONTENT_TYPE.1.to_string())];
    if let Auth::Bearer(token) = auth {
        let token = token.ok_or(MissingState::AuthToken)?;
        headers.push(("Authorization".to_string(), format!("Bearer {token}")));
    }
    Ok(headers)
}

pub fn build_get(path: String, auth: Auth<'_>) -> Result<HttpRequest, ApiError> {
    Ok(HttpRequest {
        method: HttpMethod::Get,
        path,
        headers: headers(auth)?,
        body: None,
    })
}

/// Build a POST carrying `body` as UTF-8 JSON text. An empty string is sent
/// as an empty body.
pub fn build_post(path: String, body: String, auth: Auth<'_>) -> Result<HttpRequest, ApiError> {
    Ok(HttpRequest {
        method: HttpMethod::Post,
        path,
        headers: headers(auth)?,
        body: Some(body),
    })
}

pub fn to_json<T: Serialize>(payload: &T) -> Result<String, ApiError> {
    serde_json::to_string(payload).map_err(|e| ApiError::SerializationError(e.to_string()))
}

/// Anything but 200 is a failure; the body is kept for diagnostics.
pub fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.status == 200 {
        return Ok(());
    }
    Err(ApiError::HttpError {
        status: response.status,
        body: response.body.clone(),
    })
}

/// Extract the session token from a login response.
pub fn parse_login(response: &HttpResponse) -> Result<String, ApiError> {
    if response.status != 200 {
        return Err(ApiError::Authentication {
            reason: format!("HTTP {}: {}", response.status, response.body),
        });
    }
    response
        .header(TOKEN_HEADER)
        .map(str::to_string)
        .ok_or_else(|| ApiError::Authentication {
            reason: format!("{TOKEN_HEADER} header is missing from the response"),
        })
}

/// Decode the team listing, an object keyed by team id, in server order.
pub fn parse_teams(response: &HttpResponse) -> Result<Vec<Team>, ApiError> {
    check_status(response)?;
    let map: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    map.into_iter()
        .map(|(key, value)| {
            serde_json::from_value(value)
                .map_err(|e| ApiError::DeserializationError(format!("team {key}: {e}")))
        })
        .collect()
}

/// Decode the `channels` array of a joined/more listing.
pub fn parse_channels(response: &HttpResponse) -> Result<Vec<Channel>, ApiError> {
    check_status(response)?;
    let list: ChannelList = serde_json::from_str(&response.body)
        .map_err(|e| ApiError::DeserializationError(e.to_string()))?;
    Ok(list.channels)
}
