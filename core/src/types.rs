//! Wire records for the v3 API.
//!
//! One record per response shape, decoded with serde. Required fields are
//! really required: a channel without `create_at` is a decode error, not a
//! channel with a missing timestamp. Unknown fields are ignored.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A channel visible to the logged-in user.
///
/// `create_at` and `update_at` travel as epoch milliseconds and are
/// converted to UTC timestamps on decode.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Channel {
    pub id: String,
    pub name: String,
    pub display_name: String,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub create_at: DateTime<Utc>,
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub update_at: DateTime<Utc>,
}

/// Body of the joined/more channel listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<Channel>,
}

/// A team as listed by `/teams/all`. Only used to resolve a name to an id.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Team {
    pub id: String,
    pub display_name: String,
}

/// Request payload for `/users/login`.
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub login_id: String,
    pub password: String,
}

/// Request payload for `/posts/create`.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePost {
    pub message: String,
    pub channel_id: String,
}
