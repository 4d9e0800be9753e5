use std::{
    collections::{HashMap, HashSet},
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{Path, State},
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use uuid::Uuid;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub display_name: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    pub team_id: String,
    pub name: String,
    pub display_name: String,
    pub create_at: i64,
    pub update_at: i64,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Post {
    pub id: String,
    pub channel_id: String,
    pub user_id: String,
    pub message: String,
    pub create_at: i64,
}

#[derive(Clone, Debug)]
pub struct User {
    pub id: String,
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct Login {
    pub login_id: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct CreatePost {
    pub message: String,
    pub channel_id: String,
}

#[derive(Serialize, Deserialize)]
pub struct ChannelList {
    pub channels: Vec<Channel>,
}

/// In-memory server state. Teams and channels keep insertion order, which
/// is the order the listings return them in.
#[derive(Debug, Default)]
pub struct MockState {
    pub users: Vec<User>,
    /// token -> user id
    pub sessions: HashMap<String, String>,
    pub teams: Vec<Team>,
    pub channels: Vec<Channel>,
    /// (channel id, user id)
    pub members: HashSet<(String, String)>,
    pub posts: Vec<Post>,
}

impl MockState {
    /// User `alice`/`secret`, teams "Engineering" (`t1`) and "Sales" (`t2`),
    /// and two `t1` channels: `town-square` (alice is a member) and
    /// `off-topic` (she is not).
    pub fn seeded() -> Self {
        let mut state = Self::default();
        state.add_user("u1", "alice", "secret");
        state.add_team("t1", "engineering", "Engineering");
        state.add_team("t2", "sales", "Sales");
        state.add_channel("c1", "t1", "town-square", "Town Square", 1_473_206_400_000);
        state.add_channel("c2", "t1", "off-topic", "Off-Topic", 1_473_206_400_500);
        state.members.insert(("c1".to_string(), "u1".to_string()));
        state
    }

    pub fn add_user(&mut self, id: &str, username: &str, password: &str) {
        self.users.push(User {
            id: id.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        });
    }

    pub fn add_team(&mut self, id: &str, name: &str, display_name: &str) {
        self.teams.push(Team {
            id: id.to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
        });
    }

    pub fn add_channel(&mut self, id: &str, team_id: &str, name: &str, display_name: &str, create_at: i64) {
        self.channels.push(Channel {
            id: id.to_string(),
            team_id: team_id.to_string(),
            name: name.to_string(),
            display_name: display_name.to_string(),
            create_at,
            update_at: create_at,
        });
    }

    pub fn shared(self) -> Db {
        Arc::new(RwLock::new(self))
    }

    /// Resolve the bearer token in `headers` to a user id.
    fn user_for(&self, headers: &HeaderMap) -> Result<String, StatusCode> {
        headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .and_then(|token| self.sessions.get(token))
            .cloned()
            .ok_or(StatusCode::UNAUTHORIZED)
    }

    fn has_team(&self, team_id: &str) -> bool {
        self.teams.iter().any(|t| t.id == team_id)
    }

    fn channel(&self, team_id: &str, channel_id: &str) -> Option<&Channel> {
        self.channels
            .iter()
            .find(|c| c.team_id == team_id && c.id == channel_id)
    }

    fn team_channels(&self, team_id: &str, user_id: &str, joined: bool) -> Vec<Channel> {
        self.channels
            .iter()
            .filter(|c| c.team_id == team_id)
            .filter(|c| {
                self.members.contains(&(c.id.clone(), user_id.to_string())) == joined
            })
            .cloned()
            .collect()
    }
}

pub type Db = Arc<RwLock<MockState>>;

pub fn app() -> Router {
    app_with_state(MockState::seeded().shared())
}

pub fn app_with_state(db: Db) -> Router {
    Router::new()
        .route("/api/v3/users/login", post(login))
        .route("/api/v3/teams/all", get(all_teams))
        .route("/api/v3/teams/{team_id}/channels/", get(joined_channels))
        .route("/api/v3/teams/{team_id}/channels/more", get(more_channels))
        .route(
            "/api/v3/teams/{team_id}/channels/{channel_id}/join",
            post(join_channel),
        )
        .route(
            "/api/v3/teams/{team_id}/channels/{channel_id}/posts/create",
            post(create_post),
        )
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with_state(listener: TcpListener, db: Db) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with_state(db)).await
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

async fn login(State(db): State<Db>, Json(input): Json<Login>) -> Response {
    let mut state = db.write().await;
    let user_id = state
        .users
        .iter()
        .find(|u| u.username == input.login_id && u.password == input.password)
        .map(|u| u.id.clone());

    match user_id {
        Some(user_id) => {
            log::info!("login ok for {}", input.login_id);
            let token = Uuid::new_v4().simple().to_string();
            state.sessions.insert(token.clone(), user_id.clone());
            (
                StatusCode::OK,
                [("Token", token)],
                Json(serde_json::json!({ "id": user_id, "username": input.login_id })),
            )
                .into_response()
        }
        None => {
            log::info!("login rejected for {}", input.login_id);
            (
                StatusCode::UNAUTHORIZED,
                Json(serde_json::json!({ "message": "invalid login_id or password" })),
            )
                .into_response()
        }
    }
}

async fn all_teams(State(db): State<Db>) -> Json<serde_json::Map<String, serde_json::Value>> {
    let state = db.read().await;
    let teams = state
        .teams
        .iter()
        .map(|t| {
            let value = serde_json::to_value(t).unwrap_or_default();
            (t.id.clone(), value)
        })
        .collect();
    Json(teams)
}

async fn joined_channels(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ChannelList>, StatusCode> {
    list_channels(db, team_id, headers, true).await
}

async fn more_channels(
    State(db): State<Db>,
    Path(team_id): Path<String>,
    headers: HeaderMap,
) -> Result<Json<ChannelList>, StatusCode> {
    list_channels(db, team_id, headers, false).await
}

async fn list_channels(
    db: Db,
    team_id: String,
    headers: HeaderMap,
    joined: bool,
) -> Result<Json<ChannelList>, StatusCode> {
    let state = db.read().await;
    let user_id = state.user_for(&headers)?;
    if !state.has_team(&team_id) {
        return Err(StatusCode::NOT_FOUND);
    }
    Ok(Json(ChannelList {
        channels: state.team_channels(&team_id, &user_id, joined),
    }))
}

async fn join_channel(
    State(db): State<Db>,
    Path((team_id, channel_id)): Path<(String, String)>,
    headers: HeaderMap,
) -> Result<Json<Channel>, StatusCode> {
    let mut state = db.write().await;
    let user_id = state.user_for(&headers)?;
    let channel = state
        .channel(&team_id, &channel_id)
        .cloned()
        .ok_or(StatusCode::NOT_FOUND)?;
    state.members.insert((channel_id, user_id));
    Ok(Json(channel))
}

async fn create_post(
    State(db): State<Db>,
    Path((team_id, channel_id)): Path<(String, String)>,
    headers: HeaderMap,
    Json(input): Json<CreatePost>,
) -> Result<Json<Post>, StatusCode> {
    let mut state = db.write().await;
    let user_id = state.user_for(&headers)?;
    if state.channel(&team_id, &channel_id).is_none() {
        return Err(StatusCode::NOT_FOUND);
    }
    if input.channel_id != channel_id {
        return Err(StatusCode::BAD_REQUEST);
    }
    let post = Post {
        id: Uuid::new_v4().simple().to_string(),
        channel_id,
        user_id,
        message: input.message,
        create_at: now_millis(),
    };
    state.posts.push(post.clone());
    Ok(Json(post))
}
