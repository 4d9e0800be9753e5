//! End-to-end session tests against the live mock server.
//!
//! # Design
//! Each test starts the mock server on a random port in a background thread
//! and drives `MattermostClient` over real HTTP with the default
//! `UreqTransport`. The server state handle stays with the test so it can
//! check what the client actually wrote.

use mattermost_client::{ApiError, MattermostClient, MissingState};
use mock_server::{Db, MockState};

/// Start the mock server with `state` and return its base URL and state.
fn start_server(state: MockState) -> (String, Db) {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    let db = state.shared();
    let server_db = db.clone();
    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run_with_state(listener, server_db).await
        })
        .unwrap();
    });

    (format!("http://{addr}"), db)
}

/// Serve every connection a fixed raw HTTP response with `body` as bytes.
fn start_raw_server(status_line: &'static str, body: &'static [u8]) -> String {
    use std::io::{BufRead, BufReader, Write};

    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    std::thread::spawn(move || {
        for stream in listener.incoming() {
            let mut stream = stream.unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            let head = format!(
                "HTTP/1.1 {status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(head.as_bytes()).unwrap();
            stream.write_all(body).unwrap();
        }
    });
    format!("http://{addr}")
}

fn client_for(url: &str) -> MattermostClient {
    let mut client = MattermostClient::new();
    client.set_url(url);
    client
}

#[test]
fn session_lifecycle() {
    let (url, db) = start_server(MockState::seeded());
    let mut client = client_for(&url);

    // Step 1: log in and pick the team.
    client.login("alice", "secret").unwrap();
    assert!(client.is_authenticated());
    assert_eq!(client.set_team_id_by_name("Engineering").unwrap(), Some("t1"));

    // Step 2: joined first, then the rest.
    let joined = client.joined_channels().unwrap();
    assert_eq!(joined.len(), 1);
    assert_eq!(joined[0].name, "town-square");
    assert_eq!(joined[0].create_at.timestamp_millis(), 1_473_206_400_000);

    let all = client.all_channels().unwrap();
    let names: Vec<&str> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["town-square", "off-topic"]);

    // Step 3: resolve and join the channel we are not in yet.
    let off_topic = client.channel_id_by_name("off-topic").unwrap().unwrap();
    assert_eq!(off_topic, "c2");
    client.join_channel(&off_topic).unwrap();
    assert!(client.more_channels().unwrap().is_empty());
    assert_eq!(client.joined_channels().unwrap().len(), 2);

    // Step 4: post to it.
    client.post(&off_topic, "hello").unwrap();
    {
        let state = db.blocking_read();
        assert_eq!(state.posts.len(), 1);
        assert_eq!(state.posts[0].channel_id, "c2");
        assert_eq!(state.posts[0].message, "hello");
        assert_eq!(state.posts[0].user_id, "u1");
    }

    // Step 5: unknown names resolve to nothing.
    assert_eq!(client.channel_id_by_name("nope").unwrap(), None);

    client.close();
}

#[test]
fn unknown_team_leaves_team_unset() {
    let (url, _db) = start_server(MockState::seeded());
    let mut client = client_for(&url);

    assert_eq!(client.set_team_id_by_name("Nonexistent").unwrap(), None);
    assert_eq!(client.team_id(), None);
    client.close();
}

#[test]
fn bad_credentials_are_authentication_failure() {
    let (url, _db) = start_server(MockState::seeded());
    let mut client = client_for(&url);

    let err = client.login("alice", "wrong").unwrap_err();
    assert!(matches!(err, ApiError::Authentication { .. }), "got {err:?}");
    assert!(!client.is_authenticated());

    client.set_team_id_by_name("Engineering").unwrap();
    let err = client.joined_channels().unwrap_err();
    assert!(matches!(err, ApiError::Precondition(MissingState::AuthToken)));
    client.close();
}

#[test]
fn post_to_unknown_channel_is_http_404() {
    let (url, db) = start_server(MockState::seeded());
    let mut client = client_for(&url);
    client.login("alice", "secret").unwrap();
    client.set_team_id_by_name("Engineering").unwrap();

    let err = client.post("missing", "hello").unwrap_err();
    assert_eq!(err.status(), Some(404));

    // The pooled connection is still usable after the failed call.
    client.post("c1", "still works").unwrap();
    assert_eq!(db.blocking_read().posts.len(), 1);
    client.close();
}

#[test]
fn stale_token_is_http_401() {
    let (url, db) = start_server(MockState::seeded());
    let mut client = client_for(&url);
    client.login("alice", "secret").unwrap();
    client.set_team_id_by_name("Engineering").unwrap();

    db.blocking_write().sessions.clear();
    let err = client.all_channels().unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 401, .. }));
    client.close();
}

#[test]
fn unreachable_server_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };
    let mut client = client_for(&format!("http://127.0.0.1:{port}"));

    let err = client.login("alice", "secret").unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)), "got {err:?}");
}

#[test]
fn non_utf8_error_page_keeps_http_status() {
    let url = start_raw_server("404 Not Found", &[0xff, 0xfe, 0x00]);
    let mut client = client_for(&url);

    let err = client.set_team_id_by_name("Engineering").unwrap_err();
    assert!(matches!(err, ApiError::HttpError { status: 404, .. }), "got {err:?}");
}

#[test]
fn non_utf8_success_body_is_decode_failure() {
    let url = start_raw_server("200 OK", &[0xff, 0xfe, 0x00]);
    let mut client = client_for(&url);

    let err = client.set_team_id_by_name("Engineering").unwrap_err();
    assert!(matches!(err, ApiError::DeserializationError(_)), "got {err:?}");
}
