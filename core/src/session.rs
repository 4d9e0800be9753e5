//! Stateful session facade over the v3 API.
//!
//! # Design
//! `MattermostClient` owns the session state (base URL, team id, token) and
//! a `Transport`. Each public operation derives its route, builds the
//! request, runs exactly one exchange per request and decodes the result.
//! Missing state is reported as `ApiError::Precondition` before anything is
//! sent. There is no retry and no caching: listings re-fetch every time.
//!
//! Operations take `&mut self` only where they write session state
//! (`login`, `set_team_id_by_name`, `set_url`). Concurrent use needs
//! external synchronisation or one client per thread.

use log::{debug, info, warn};

use crate::client::{self, Auth};
use crate::config::ClientConfig;
use crate::error::Result;
use crate::http::{HttpRequest, HttpResponse, Transport, UreqTransport};
use crate::routes::Routes;
use crate::types::{Channel, CreatePost, LoginRequest};

/// A logged-in (or not yet logged-in) session against one server.
#[derive(Debug)]
pub struct MattermostClient<T: Transport = UreqTransport> {
    routes: Routes,
    token: Option<String>,
    transport: T,
}

impl MattermostClient<UreqTransport> {
    /// Session with no URL set, the default API version and a fresh agent.
    pub fn new() -> Self {
        Self::with_transport(UreqTransport::new())
    }

    pub fn from_config(config: &ClientConfig) -> Self {
        Self::with_config(config, UreqTransport::new())
    }
}

impl Default for MattermostClient<UreqTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> MattermostClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self::with_config(&ClientConfig::default(), transport)
    }

    pub fn with_config(config: &ClientConfig, transport: T) -> Self {
        Self {
            routes: Routes {
                base_url: config.base_url.clone(),
                api_version: config.api_version.clone(),
                team_id: None,
            },
            token: None,
            transport,
        }
    }

    /// Store the server address verbatim, e.g. `http://chat.example.com`.
    pub fn set_url(&mut self, url: impl Into<String>) {
        self.routes.base_url = Some(url.into());
    }

    pub fn url(&self) -> Option<&str> {
        self.routes.base_url.as_deref()
    }

    pub fn api_version(&self) -> &str {
        &self.routes.api_version
    }

    pub fn team_id(&self) -> Option<&str> {
        self.routes.team_id.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// Route inputs as they currently stand.
    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Log in and keep the token from the `Token` response header.
    ///
    /// On failure the previous token, if any, is kept.
    pub fn login(&mut self, login_id: &str, password: &str) -> Result<()> {
        let path = self.routes.login()?;
        let body = client::to_json(&LoginRequest {
            login_id: login_id.to_string(),
            password: password.to_string(),
        })?;
        let request = client::build_post(path, body, Auth::None)?;
        let response = self.dispatch(&request)?;

        match client::parse_login(&response) {
            Ok(token) => {
                info!("logged in as {login_id}");
                self.token = Some(token);
                Ok(())
            }
            Err(e) => {
                warn!("login failed for {login_id}: {e}");
                Err(e)
            }
        }
    }

    /// Resolve a team by display name and make it the session's team.
    ///
    /// The server has no lookup by name, so the full listing is fetched and
    /// scanned; the first match in listing order wins. Returns the resolved
    /// id, or `None` with the team id left untouched when nothing matched.
    pub fn set_team_id_by_name(&mut self, display_name: &str) -> Result<Option<&str>> {
        let request = client::build_get(self.routes.all_teams()?, Auth::None)?;
        let response = self.dispatch(&request)?;
        let teams = client::parse_teams(&response)?;

        match teams.into_iter().find(|team| team.display_name == display_name) {
            Some(team) => {
                info!("using team {display_name} ({})", team.id);
                self.routes.team_id = Some(team.id);
                Ok(self.team_id())
            }
            None => {
                warn!("no team named {display_name}");
                Ok(None)
            }
        }
    }

    /// Id of the channel whose slug is `name`, searching joined channels
    /// first and then the ones not yet joined.
    pub fn channel_id_by_name(&self, name: &str) -> Result<Option<String>> {
        Ok(self
            .all_channels()?
            .into_iter()
            .find(|channel| channel.name == name)
            .map(|channel| channel.id))
    }

    /// Joined channels followed by the ones not yet joined, without
    /// de-duplication. Fails as a whole if either listing fails.
    pub fn all_channels(&self) -> Result<Vec<Channel>> {
        let mut channels = self.joined_channels()?;
        channels.extend(self.more_channels()?);
        Ok(channels)
    }

    pub fn joined_channels(&self) -> Result<Vec<Channel>> {
        self.fetch_channels(self.routes.joined_channels()?)
    }

    /// Channels the user can see but has not joined.
    pub fn more_channels(&self) -> Result<Vec<Channel>> {
        self.fetch_channels(self.routes.more_channels()?)
    }

    pub fn join_channel(&self, channel_id: &str) -> Result<()> {
        let path = self.routes.join_channel(channel_id)?;
        self.execute_post(path, String::new())
    }

    pub fn post(&self, channel_id: &str, message: &str) -> Result<()> {
        let path = self.routes.create_post(channel_id)?;
        let body = client::to_json(&CreatePost {
            message: message.to_string(),
            channel_id: channel_id.to_string(),
        })?;
        self.execute_post(path, body)
    }

    /// End the session and release the transport's connections.
    pub fn close(self) {
        debug!("closing session for {}", self.url().unwrap_or("<unset>"));
        drop(self.transport);
    }

    fn fetch_channels(&self, path: String) -> Result<Vec<Channel>> {
        let request = client::build_get(path, self.auth())?;
        let response = self.dispatch(&request)?;
        client::parse_channels(&response)
    }

    fn execute_post(&self, path: String, body: String) -> Result<()> {
        let request = client::build_post(path, body, self.auth())?;
        let response = self.dispatch(&request)?;
        client::check_status(&response)?;
        debug!("{}", response.body);
        Ok(())
    }

    fn auth(&self) -> Auth<'_> {
        Auth::Bearer(self.token.as_deref())
    }

    fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse> {
        let response = self.transport.execute(request)?;
        debug!("{} {} -> {}", request.method.as_str(), request.path, response.status);
        Ok(response)
    }
}
