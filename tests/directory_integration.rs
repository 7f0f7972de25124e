//! Integration tests for the Bitbucket directory.
//!
//! These tests run the real HTTP client against a local wiremock server and
//! check pagination, malformed responses and authentication.

use serde_json::{json, Value};
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use git_all::directory::bitbucket::encode_credential;
use git_all::directory::{BitbucketDirectory, Directory, DirectoryError};

const CREDENTIAL: &str = "YWxpY2U6cHc=";

// =============================================================================
// Test Fixtures
// =============================================================================

/// A page body with `size` as the reported total.
fn page(size: usize, values: Vec<Value>) -> Value {
    json!({ "size": size, "pagelen": 10, "values": values })
}

fn repos(range: std::ops::Range<usize>) -> Vec<Value> {
    range
        .map(|i| json!({ "full_name": format!("acme/repo-{:02}", i) }))
        .collect()
}

async fn directory() -> (MockServer, BitbucketDirectory) {
    let server = MockServer::start().await;
    let directory = BitbucketDirectory::with_api_base(format!("{}/2.0", server.uri()));
    (server, directory)
}

// =============================================================================
// Pagination
// =============================================================================

#[tokio::test]
async fn repositories_walk_every_page() {
    let (server, directory) = directory().await;

    for (page_no, range) in [(1, 0..10), (2, 10..20), (3, 20..25)] {
        Mock::given(method("GET"))
            .and(path("/2.0/repositories/acme"))
            .and(query_param("q", "project.key=\"API\""))
            .and(query_param("page", page_no.to_string()))
            .respond_with(ResponseTemplate::new(200).set_body_json(page(25, repos(range))))
            .expect(1)
            .mount(&server)
            .await;
    }

    let found = directory
        .list_repositories("acme", "API", CREDENTIAL)
        .await
        .unwrap()
        .unwrap();

    assert_eq!(found.len(), 25);
    assert_eq!(found[0].as_str(), "acme/repo-00");
    assert_eq!(found[24].as_str(), "acme/repo-24");
    assert_eq!(server.received_requests().await.unwrap().len(), 3);
}

#[tokio::test]
async fn teams_are_paginated_with_role_filter() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/teams"))
        .and(query_param("role", "member"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            3,
            vec![json!({ "username": "acme" }), json!({ "username": "beta" })],
        )))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/teams"))
        .and(query_param("page", "2"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(3, vec![json!({ "username": "corp" })])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let teams = directory.list_teams(CREDENTIAL).await.unwrap().unwrap();
    assert_eq!(teams, vec!["acme", "beta", "corp"]);
}

#[tokio::test]
async fn projects_use_key_field() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/teams/acme/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            2,
            vec![
                json!({ "key": "WEB", "name": "Website" }),
                json!({ "key": "API", "name": "Services" }),
            ],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let projects = directory.list_projects("acme", CREDENTIAL).await.unwrap().unwrap();
    assert_eq!(projects, vec!["WEB", "API"]);
}

#[tokio::test]
async fn empty_page_stops_walk() {
    let (server, directory) = directory().await;

    // The server claims more than it delivers.
    Mock::given(method("GET"))
        .and(path("/2.0/teams"))
        .and(query_param("page", "1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(page(50, vec![json!({ "username": "acme" })])),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/teams"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(50, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let teams = directory.list_teams(CREDENTIAL).await.unwrap().unwrap();
    assert_eq!(teams, vec!["acme"]);
}

#[tokio::test]
async fn zero_size_is_empty() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/teams/acme/projects/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    let projects = directory.list_projects("acme", CREDENTIAL).await.unwrap();
    assert_eq!(projects, Some(vec![]));
}

// =============================================================================
// Malformed responses and errors
// =============================================================================

#[tokio::test]
async fn malformed_body_is_none() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/repositories/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let found = directory.list_repositories("acme", "API", CREDENTIAL).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn malformed_later_page_is_none() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/repositories/acme"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(20, repos(0..10))))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/2.0/repositories/acme"))
        .and(query_param("page", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "values": [] })))
        .mount(&server)
        .await;

    let found = directory.list_repositories("acme", "API", CREDENTIAL).await.unwrap();
    assert!(found.is_none());
}

#[tokio::test]
async fn unusable_full_names_are_dropped() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/repositories/acme"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(
            3,
            vec![
                json!({ "full_name": "acme/.." }),
                json!({ "full_name": "acme/api" }),
                json!({ "full_name": "acme/nested/api" }),
            ],
        )))
        .mount(&server)
        .await;

    let found = directory
        .list_repositories("acme", "API", CREDENTIAL)
        .await
        .unwrap()
        .unwrap();
    let names: Vec<_> = found.iter().map(|r| r.as_str()).collect();
    assert_eq!(names, vec!["acme/api"]);
}

#[tokio::test]
async fn unauthorized_is_auth_error() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/teams"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let err = directory.list_teams(CREDENTIAL).await.unwrap_err();
    assert!(matches!(err, DirectoryError::AuthFailed(_)));
    assert!(!err.to_string().contains(CREDENTIAL));
}

#[tokio::test]
async fn not_found_carries_api_message() {
    let (server, directory) = directory().await;

    Mock::given(method("GET"))
        .and(path("/2.0/teams/ghost/projects/"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "type": "error",
            "error": { "message": "Team ghost not found" }
        })))
        .mount(&server)
        .await;

    match directory.list_projects("ghost", CREDENTIAL).await {
        Err(DirectoryError::NotFound(message)) => assert_eq!(message, "Team ghost not found"),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let directory = BitbucketDirectory::with_api_base("http://127.0.0.1:1");
    let err = directory.list_teams(CREDENTIAL).await.unwrap_err();
    assert!(matches!(err, DirectoryError::NetworkError(_)));
}

// =============================================================================
// Authentication
// =============================================================================

#[tokio::test]
async fn sends_basic_auth_and_user_agent() {
    let (server, directory) = directory().await;
    let credential = encode_credential("alice", "pw");

    Mock::given(method("GET"))
        .and(path("/2.0/teams"))
        .and(header("Authorization", "Basic YWxpY2U6cHc="))
        .and(header("User-Agent", "git-all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page(0, vec![])))
        .expect(1)
        .mount(&server)
        .await;

    directory.list_teams(&credential).await.unwrap();
}
