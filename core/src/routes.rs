//! Route derivation for the v3 resource hierarchy.
//!
//! Each route is built on top of its parent (base → teams → team → channels
//! → channel → posts), so a URL is never assembled from a partially known
//! hierarchy: if a segment's id is unset the derivation stops with a
//! `Precondition` error instead of producing a malformed path.

use crate::error::MissingState;

/// API version segment appended to the base URL.
pub const DEFAULT_API_VERSION: &str = "/api/v3";

/// Inputs to route derivation. Pure data; deriving a route never mutates it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub base_url: Option<String>,
    pub api_version: String,
    pub team_id: Option<String>,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            base_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            team_id: None,
        }
    }
}

impl Routes {
    pub fn base(&self) -> Result<String, MissingState> {
        let url = self.base_url.as_deref().ok_or(MissingState::Url)?;
        Ok(format!("{url}{}", self.api_version))
    }

    pub fn users(&self) -> Result<String, MissingState> {
        Ok(format!("{}/users", self.base()?))
    }

    pub fn teams(&self) -> Result<String, MissingState> {
        Ok(format!("{}/teams", self.base()?))
    }

    pub fn team(&self) -> Result<String, MissingState> {
        let team_id = self.team_id.as_deref().ok_or(MissingState::TeamId)?;
        Ok(format!("{}/{team_id}", self.teams()?))
    }

    pub fn channels(&self) -> Result<String, MissingState> {
        Ok(format!("{}/channels", self.team()?))
    }

    pub fn channel(&self, channel_id: &str) -> Result<String, MissingState> {
        let channels = self.channels()?;
        if channel_id.is_empty() {
            return Err(MissingState::ChannelId);
        }
        Ok(format!("{channels}/{channel_id}"))
    }

    pub fn posts(&self, channel_id: &str) -> Result<String, MissingState> {
        Ok(format!("{}/posts", self.channel(channel_id)?))
    }

    pub fn login(&self) -> Result<String, MissingState> {
        Ok(format!("{}/login", self.users()?))
    }

    pub fn all_teams(&self) -> Result<String, MissingState> {
        Ok(format!("{}/all", self.teams()?))
    }

    /// Joined-channel listing. The trailing slash is part of the server's route.
    pub fn joined_channels(&self) -> Result<String, MissingState> {
        Ok(format!("{}/", self.channels()?))
    }

    pub fn more_channels(&self) -> Result<String, MissingState> {
        Ok(format!("{}/more", self.channels()?))
    }

    pub fn join_channel(&self, channel_id: &str) -> Result<String, MissingState> {
        Ok(format!("{}/join", self.channel(channel_id)?))
    }

    pub fn create_post(&self, channel_id: &str) -> Result<String, MissingState> {
        Ok(format!("{}/create", self.posts(channel_id)?))
    }
}
