//! Blocking client for the Mattermost v3 HTTP API.
//!
//! # Overview
//! Logs a user in, resolves teams and channels by name, lists the channels
//! the user can see, joins channels and posts messages.
//!
//! # Design
//! - `routes` derives every URL from {base URL, API version, team id,
//!   channel id}; missing ids are precondition errors, not bad URLs.
//! - `client` builds `HttpRequest` values and decodes `HttpResponse`
//!   values without I/O.
//! - `http::Transport` performs the round-trip; `UreqTransport` is the
//!   default, and each response body is drained before it returns.
//! - `MattermostClient` holds the session state and composes the above.
//!
//! ```no_run
//! use mattermost_client::MattermostClient;
//!
//! # fn main() -> mattermost_client::Result<()> {
//! let mut client = MattermostClient::new();
//! client.set_url("http://chat.example.com");
//! client.login("alice", "secret")?;
//! client.set_team_id_by_name("Engineering")?;
//! if let Some(channel_id) = client.channel_id_by_name("town-square")? {
//!     client.post(&channel_id, "hello")?;
//! }
//! client.close();
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod routes;
pub mod session;
pub mod types;

pub use config::ClientConfig;
pub use error::{ApiError, MissingState, Result};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport, UreqTransport};
pub use routes::{Routes, DEFAULT_API_VERSION};
pub use session::MattermostClient;
pub use types::{Channel, CreatePost, LoginRequest, Team};
